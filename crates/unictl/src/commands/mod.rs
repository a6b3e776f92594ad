//! Command handlers.
//!
//! Each handler follows the same flow: fetch through the session, decode,
//! enrich, sort, then render to the session's stdout stream.

pub mod clients;
pub mod config_cmd;
pub mod devices;
pub mod events;
pub mod raw;

use tracing::debug;

use unictl_api::Session;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{Format, Formatter, Render, RenderOptions};

/// Everything a session-backed command needs.
pub struct Context {
    pub session: Session,
    pub format: Format,
    pub options: RenderOptions,
    pub quiet: bool,
    profile: String,
    config_path: String,
}

impl Context {
    /// Load configuration, resolve the profile and open the session.
    ///
    /// Validation problems stay inside the session and surface on first use.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let (cfg, path) = config::load(global)?;
        let (profile_name, profile) =
            unictl_config::select_profile(&cfg, global.profile.as_deref(), &path)?;
        debug!(profile = %profile_name, "resolved profile");

        let session_config = unictl_config::resolve_session_config(
            &profile,
            &cfg.defaults,
            &config::overrides(global),
        );

        Ok(Self {
            session: Session::initialize(session_config, Vec::new()),
            format: config::format(global, &cfg)?,
            options: config::render_options(global, &cfg)?,
            quiet: global.quiet,
            profile: profile_name,
            config_path: path.display().to_string(),
        })
    }

    /// Translate an accumulated session error for this invocation.
    pub fn session_error(&self, err: &unictl_api::Error) -> CliError {
        CliError::from_session(err, &self.profile, &self.config_path)
    }

    /// Render `value` to the session's stdout unless `--quiet`.
    pub fn render<T: Render + ?Sized>(
        &mut self,
        value: &T,
        options: RenderOptions,
    ) -> Result<(), CliError> {
        if self.quiet {
            return Ok(());
        }
        let mut formatter = Formatter::new(self.format, self.session.stdout(), options);
        formatter.write(value)?;
        Ok(())
    }

    /// One-line confirmation on the session's stderr unless `--quiet`.
    pub fn note(&mut self, message: &str) -> Result<(), CliError> {
        if !self.quiet {
            writeln!(self.session.stderr(), "{message}")?;
        }
        Ok(())
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────

pub async fn dispatch(cmd: Command, ctx: &mut Context) -> Result<(), CliError> {
    match cmd {
        Command::Clients(args) => clients::handle(args, ctx).await,
        Command::Devices(args) => devices::handle(args, ctx).await,
        Command::Events(args) => events::handle(args, ctx).await,
        Command::Raw(args) => raw::handle(args, ctx).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
