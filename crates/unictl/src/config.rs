//! CLI configuration: thin wrapper around `unictl_config`.
//!
//! Adds the `GlobalOpts`-aware pieces: which file to read, which flags
//! override the profile, and the output settings.

use std::path::PathBuf;

use secrecy::SecretString;

use unictl_config::{Config, Overrides};
use unictl_core::TimeStyle;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{Format, RenderOptions};

/// The config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(unictl_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<(Config, PathBuf), CliError> {
    let path = config_file(global);
    let config = unictl_config::load_config_from(&path)?;
    Ok((config, path))
}

/// Session settings given as flags.
pub fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        endpoint: global.endpoint.clone(),
        username: global.username.clone(),
        password: global.password.clone().map(SecretString::from),
        site: global.site.clone(),
        timeout: global.timeout,
        insecure: None,
    }
}

/// `--output`, else `defaults.output` from the config file.
pub fn format(global: &GlobalOpts, config: &Config) -> Result<Format, CliError> {
    match global.output {
        Some(format) => Ok(format),
        None => config
            .defaults
            .output
            .parse()
            .map_err(|e: crate::output::FormatError| CliError::Validation {
                field: "defaults.output".into(),
                reason: e.to_string(),
            }),
    }
}

/// `--time`, else `defaults.time`.
pub fn time_style(global: &GlobalOpts, config: &Config) -> Result<TimeStyle, CliError> {
    match global.time {
        Some(style) => Ok(style),
        None => config
            .defaults
            .time
            .parse()
            .map_err(|_| CliError::Validation {
                field: "defaults.time".into(),
                reason: format!(
                    "expected 'relative' or 'absolute', got '{}'",
                    config.defaults.time
                ),
            }),
    }
}

pub fn render_options(global: &GlobalOpts, config: &Config) -> Result<RenderOptions, CliError> {
    Ok(RenderOptions {
        show_rate: false,
        time_style: time_style(global, config)?,
        now: chrono::Utc::now(),
    })
}
