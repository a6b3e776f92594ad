//! Client command handlers.

use tabled::builder::Builder;
use tracing::{debug, warn};

use unictl_api::StationCommand;
use unictl_core::humanize::{fmt_bytes, fmt_rate, fmt_uptime};
use unictl_core::ordering::clients;
use unictl_core::{Client, ClientSortKey, Mac, decode, decode_clients, decode_devices};

use crate::cli::{ClientsArgs, ClientsCommand};
use crate::error::CliError;
use crate::output::{self, Render, RenderOptions};

use super::Context;

// ── Table ───────────────────────────────────────────────────────────

fn header(options: &RenderOptions) -> Vec<String> {
    let mut cols = vec!["Name", "MAC", "IP", "Type", "Upstream", "Rx", "Tx"];
    if options.show_rate {
        cols.extend(["Rx Rate", "Tx Rate"]);
    }
    cols.extend(["Uptime", "Last Seen", "Flags"]);
    cols.into_iter().map(String::from).collect()
}

fn flags(c: &Client) -> String {
    let mut flags = Vec::new();
    if c.is_blocked {
        flags.push("blocked");
    }
    if c.is_guest {
        flags.push("guest");
    }
    if c.is_authorized {
        flags.push("auth");
    }
    flags.join(",")
}

fn row(c: &Client, options: &RenderOptions) -> Vec<String> {
    let mut cells = vec![
        c.display_name().to_owned(),
        c.mac.to_string(),
        output::or_dash(&c.ip.to_string()),
        if c.is_wired { "wired" } else { "wireless" }.to_owned(),
        output::or_dash(c.upstream()),
        fmt_bytes(c.received_bytes()),
        fmt_bytes(c.sent_bytes()),
    ];
    if options.show_rate {
        cells.push(fmt_rate(c.receive_rate()));
        cells.push(fmt_rate(c.send_rate()));
    }
    cells.push(fmt_uptime(c.uptime.get()));
    cells.push(c.last_seen.render(options.time_style, options.now));
    cells.push(flags(c));
    cells
}

impl Render for [Client] {
    fn render_table(&self, options: &RenderOptions) -> Option<String> {
        let mut builder = Builder::default();
        builder.push_record(header(options));
        for client in self {
            builder.push_record(row(client, options));
        }
        Some(output::styled(builder.build()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ClientsArgs, ctx: &mut Context) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List { all, sort, rate } => {
            let order = match sort.as_deref() {
                Some(keys) => ClientSortKey::parse_order(keys)?,
                None if all => clients::historical(),
                None => clients::default(),
            };

            let mut list = fetch(ctx, all).await?;
            order.sort(&mut list);

            let options = RenderOptions {
                show_rate: rate,
                ..ctx.options
            };
            ctx.render(list.as_slice(), options)
        }

        ClientsCommand::Kick { mac } => station(ctx, StationCommand::Kick, &mac).await,
        ClientsCommand::Block { mac } => station(ctx, StationCommand::Block, &mac).await,
        ClientsCommand::Unblock { mac } => station(ctx, StationCommand::Unblock, &mac).await,
    }
}

async fn fetch(ctx: &mut Context, all: bool) -> Result<Vec<Client>, CliError> {
    let fetched = if all {
        ctx.session.list_users().await
    } else {
        ctx.session.list_clients().await
    };
    let body = fetched.map_err(|e| ctx.session_error(&e))?;

    let mut list = decode_clients(&body)?;
    debug!(count = list.len(), all, "fetched clients");

    // Known-client history carries no upstream placement.
    if !all {
        match ctx.session.list_devices().await {
            Ok(body) => match decode_devices(&body) {
                Ok(devices) => unictl_core::enrich_upstream(&mut list, &devices),
                Err(e) => warn!("upstream names unavailable: {e}"),
            },
            Err(e) => warn!("upstream names unavailable: {e}"),
        }
    }
    Ok(list)
}

async fn station(ctx: &mut Context, command: StationCommand, mac: &str) -> Result<(), CliError> {
    let mac = Mac::new(mac);
    if mac.is_empty() {
        return Err(CliError::Validation {
            field: "mac".into(),
            reason: "MAC address is empty".into(),
        });
    }

    let (sent, verb) = match command {
        StationCommand::Kick => (ctx.session.kick(mac.as_str()).await, "Kicked"),
        StationCommand::Block => (ctx.session.block(mac.as_str()).await, "Blocked"),
        StationCommand::Unblock => (ctx.session.unblock(mac.as_str()).await, "Unblocked"),
    };
    let body = sent.map_err(|e| ctx.session_error(&e))?;
    decode::<serde_json::Value>(&body)?;

    ctx.note(&format!("{verb} {mac}"))
}
