//! Tags available to every scenario that asks for the standard set
//!
//! | tag        | behaviour                                         |
//! |------------|---------------------------------------------------|
//! | `%double%` | doubles its numeric argument                      |
//! | `%offset%` | adds 100 to its numeric argument                  |
//! | `%sum%`    | sums a sequence of numbers                        |
//! | `%echo%`   | returns its arguments, `"<none>"` when absent     |
//! | `%get%`    | reads a context field, null when absent           |
//! | `%fail%`   | fails with its string argument as message         |

use tagwalk_engine::{EngineError, Node, Registry};

use crate::world::Context;

fn number(args: Option<&Node>, tag: &str) -> Result<i64, EngineError> {
    args.and_then(Node::as_int)
        .ok_or_else(|| EngineError::failed(format!("{tag} expects a number")))
}

pub fn standard_tags() -> Registry<Context> {
    Registry::new()
        .with_function("%double%", |args, _| {
            Ok(Node::from(number(args.as_ref(), "%double%")? * 2))
        })
        .with_function("%offset%", |args, _| {
            Ok(Node::from(number(args.as_ref(), "%offset%")? + 100))
        })
        .with_function("%sum%", |args, _| {
            let items = args
                .as_ref()
                .and_then(Node::as_sequence)
                .ok_or_else(|| EngineError::failed("%sum% expects a sequence"))?;
            let total = items
                .iter()
                .map(|item| number(Some(item), "%sum%"))
                .sum::<Result<i64, EngineError>>()?;
            Ok(Node::from(total))
        })
        .with_function("%echo%", |args, _| {
            Ok(args.unwrap_or_else(|| Node::from("<none>")))
        })
        .with_function("%get%", |args, ctx: &mut Context| {
            let key = args.as_ref().and_then(Node::as_str).unwrap_or_default();
            Ok(ctx.get(key).cloned().unwrap_or_default())
        })
        .with_function("%fail%", |args, _| {
            let message = args.as_ref().and_then(Node::as_str).unwrap_or("failed");
            Err(EngineError::failed(message))
        })
}
