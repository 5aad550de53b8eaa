//! Shared helpers for the BDD suite

pub mod documents;
pub mod tags;
