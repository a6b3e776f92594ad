//! Config command handlers (no controller session needed).

use std::io::{self, Write};

use tracing::debug;

use unictl_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{Formatter, Render, RenderOptions};

/// Tables show the file as it would be written.
impl Render for Config {
    fn render_table(&self, _options: &RenderOptions) -> Option<String> {
        toml::to_string_pretty(self).ok()
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let (cfg, _path) = config::load(global)?;
            if global.quiet {
                return Ok(());
            }
            let format = config::format(global, &cfg)?;
            let options = config::render_options(global, &cfg)?;
            Formatter::new(format, io::stdout().lock(), options).write(&cfg.redacted())?;
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::config_file(global);
            writeln!(io::stdout().lock(), "{}", path.display())?;
            Ok(())
        }

        ConfigCommand::Init {
            name,
            default,
            force,
        } => init(global, &name, default, force),
    }
}

fn init(global: &GlobalOpts, name: &str, default: bool, force: bool) -> Result<(), CliError> {
    let Some(endpoint) = global.endpoint.clone() else {
        return Err(CliError::Validation {
            field: "endpoint".into(),
            reason: "pass --endpoint to create a profile".into(),
        });
    };

    let (mut cfg, path) = config::load(global)?;
    if cfg.profiles.contains_key(name) && !force {
        return Err(CliError::Validation {
            field: "profile".into(),
            reason: format!("'{name}' already exists; pass --force to replace it"),
        });
    }

    let profile = Profile {
        endpoint,
        site: global.site.clone().unwrap_or_else(|| "default".into()),
        username: global.username.clone(),
        password: global.password.clone(),
        insecure: None,
        timeout: global.timeout,
    };
    cfg.profiles.insert(name.to_owned(), profile);

    // A default that names no saved profile is replaced.
    let dangling = cfg
        .default_profile
        .as_ref()
        .is_none_or(|current| !cfg.profiles.contains_key(current));
    if default || dangling {
        cfg.default_profile = Some(name.to_owned());
    }

    unictl_config::save_config_to(&cfg, &path)?;
    debug!(profile = name, path = %path.display(), "profile saved");
    if !global.quiet {
        writeln!(io::stderr().lock(), "Saved profile '{name}' to {}", path.display())?;
    }
    Ok(())
}
