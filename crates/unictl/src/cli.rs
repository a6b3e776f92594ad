//! Clap derive structures for the `unictl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use unictl_core::TimeStyle;

use crate::output::Format;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unictl -- command-line client for UniFi network controllers
#[derive(Debug, Parser)]
#[command(
    name = "unictl",
    version,
    about = "Inspect and manage UniFi network clients and devices",
    long_about = "Talks to the UniFi Network controller REST API with a cookie and\n\
        CSRF-token session: list clients, devices and events, kick or block\n\
        stations, and pass raw requests through.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "UNICTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "UNICTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'e', env = "UNICTL_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Controller username (overrides UNICTL_USERNAME and profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Controller password (prefer UNICTL_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Site name
    #[arg(long, short = 's', env = "UNICTL_SITE", global = true)]
    pub site: Option<String>,

    /// Output format: table (tab, t), json (js, j), yaml (yml, y)
    #[arg(long, short = 'o', env = "UNICTL_OUTPUT", global = true)]
    pub output: Option<Format>,

    /// How times are shown in tables: relative or absolute
    #[arg(long, env = "UNICTL_TIME", global = true)]
    pub time: Option<TimeStyle>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "UNICTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and manage network clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// List infrastructure devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show the controller event log
    Events(EventsArgs),

    /// Send a request to an arbitrary controller path
    Raw(RawArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List connected clients
    #[command(alias = "ls")]
    List {
        /// Every client the controller has seen, oldest activity first
        #[arg(long, short = 'a')]
        all: bool,

        /// Comma-separated sort keys; prefix with '-' to reverse
        /// (wired, ip, mac, name, hostname, last-seen, first-seen,
        /// uptime, upstream, rx, tx)
        #[arg(long)]
        sort: Option<String>,

        /// Show current receive and transmit rates
        #[arg(long)]
        rate: bool,
    },

    /// Disconnect a client, forcing it to reconnect
    Kick {
        /// Client MAC address
        mac: String,
    },

    /// Block a client from the network
    Block {
        /// Client MAC address
        mac: String,
    },

    /// Lift a block
    Unblock {
        /// Client MAC address
        mac: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List adopted devices
    #[command(alias = "ls")]
    List {
        /// Comma-separated sort keys; prefix with '-' to reverse
        /// (name, ip, mac, model)
        #[arg(long)]
        sort: Option<String>,
    },
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events, newest first
    #[command(alias = "ls")]
    List {
        /// Include the full archived event history
        #[arg(long, short = 'a')]
        all: bool,

        /// Max results
        #[arg(long, short = 'l')]
        limit: Option<usize>,
    },
}

// ── Raw ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RawArgs {
    #[command(subcommand)]
    pub command: RawCommand,
}

#[derive(Debug, Subcommand)]
pub enum RawCommand {
    /// GET a path; relative paths are site-scoped, '/' paths are absolute
    Get {
        /// e.g. `stat/health` or `/proxy/network/api/self`
        path: String,
    },

    /// POST a JSON body to a path
    Post {
        path: String,

        /// JSON request body
        body: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the loaded configuration (passwords masked)
    Show,

    /// Print the configuration file path
    Path,

    /// Save a profile built from --endpoint, --username, --password,
    /// --site and --timeout
    Init {
        /// Profile name
        name: String,

        /// Make it the default profile
        #[arg(long)]
        default: bool,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
