//! Event command handlers.

use tabled::Tabled;
use tracing::debug;

use unictl_core::ordering::events;
use unictl_core::{Event, Mac, decode_events};

use crate::cli::{EventsArgs, EventsCommand};
use crate::error::CliError;
use crate::output::{self, Render, RenderOptions};

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Who")]
    who: String,
    #[tabled(rename = "Where")]
    place: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl EventRow {
    fn new(e: &Event, options: &RenderOptions) -> Self {
        Self {
            time: e.time.render(options.time_style, options.now),
            kind: e.event_type.to_string(),
            who: output::or_dash(e.who().map_or("", Mac::as_str)),
            place: output::or_dash(e.where_().map_or("", Mac::as_str)),
            message: e.msg.clone(),
        }
    }
}

impl Render for [Event] {
    fn render_table(&self, options: &RenderOptions) -> Option<String> {
        let rows: Vec<EventRow> = self.iter().map(|e| EventRow::new(e, options)).collect();
        Some(output::table(&rows))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: EventsArgs, ctx: &mut Context) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { all, limit } => {
            let fetched = if all {
                ctx.session.list_all_events().await
            } else {
                ctx.session.list_events().await
            };
            let body = fetched.map_err(|e| ctx.session_error(&e))?;
            let mut list = decode_events(&body)?;
            debug!(count = list.len(), all, "fetched events");

            events::newest_first().sort(&mut list);
            if let Some(limit) = limit {
                list.truncate(limit);
            }

            let options = ctx.options;
            ctx.render(list.as_slice(), options)
        }
    }
}
