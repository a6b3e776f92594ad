//! Device command handlers.

use tabled::Tabled;
use tracing::debug;

use unictl_core::humanize::fmt_uptime;
use unictl_core::ordering::devices;
use unictl_core::{Device, DeviceSortKey, decode_devices};

use crate::cli::{DevicesArgs, DevicesCommand};
use crate::error::CliError;
use crate::output::{self, Render, RenderOptions};

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Clients")]
    clients: i64,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl DeviceRow {
    fn new(d: &Device, options: &RenderOptions) -> Self {
        Self {
            name: d.display_name().to_owned(),
            mac: d.mac.to_string(),
            ip: output::or_dash(&d.ip.to_string()),
            model: output::or_dash(&d.model),
            kind: d.kind().to_string(),
            state: d.status().to_string(),
            version: output::or_dash(&d.version),
            clients: d.num_sta.get(),
            uptime: fmt_uptime(d.uptime.get()),
            last_seen: d.last_seen.render(options.time_style, options.now),
        }
    }
}

impl Render for [Device] {
    fn render_table(&self, options: &RenderOptions) -> Option<String> {
        let rows: Vec<DeviceRow> = self.iter().map(|d| DeviceRow::new(d, options)).collect();
        Some(output::table(&rows))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, ctx: &mut Context) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { sort } => {
            let order = match sort.as_deref() {
                Some(keys) => DeviceSortKey::parse_order(keys)?,
                None => devices::default(),
            };

            let body = ctx
                .session
                .list_devices()
                .await
                .map_err(|e| ctx.session_error(&e))?;
            let mut list = decode_devices(&body)?;
            debug!(count = list.len(), "fetched devices");
            order.sort(&mut list);

            let options = ctx.options;
            ctx.render(list.as_slice(), options)
        }
    }
}
