//! Raw request passthrough.

use crate::cli::{RawArgs, RawCommand};
use crate::error::CliError;

use super::Context;

pub async fn handle(args: RawArgs, ctx: &mut Context) -> Result<(), CliError> {
    let fetched = match args.command {
        RawCommand::Get { path } => ctx.session.get_raw(&path).await,
        RawCommand::Post { path, body } => {
            let payload: serde_json::Value =
                serde_json::from_str(&body).map_err(|e| CliError::Validation {
                    field: "body".into(),
                    reason: format!("invalid JSON: {e}"),
                })?;
            ctx.session.post_raw(&path, &payload).await
        }
    };
    let body = fetched.map_err(|e| ctx.session_error(&e))?;

    // Non-JSON answers are passed through as a string.
    let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
    let options = ctx.options;
    ctx.render(&value, options)
}
