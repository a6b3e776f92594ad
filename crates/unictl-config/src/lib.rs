//! Configuration for unictl.
//!
//! TOML profiles merged with `UNICTL_`-prefixed environment variables,
//! and resolution of a profile plus command-line overrides into the
//! `SessionConfig` that `unictl_api::Session` is built from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use unictl_api::SessionConfig;

/// Environment variable consulted for the username when no flag is given.
pub const USERNAME_ENV: &str = "UNICTL_USERNAME";
/// Environment variable consulted for the password when no flag is given.
pub const PASSWORD_ENV: &str = "UNICTL_PASSWORD";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile '{name}' not found in {path}")]
    UnknownProfile { name: String, path: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Copy with every stored password masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for profile in copy.profiles.values_mut() {
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
        }
        copy
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// `relative` or `absolute`.
    #[serde(default = "default_time")]
    pub time: String,

    /// Accept self-signed controller certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            time: default_time(),
            insecure: default_insecure(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_time() -> String {
    "relative".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    60
}

/// A named controller profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1").
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_site")]
    pub site: String,

    pub username: Option<String>,

    /// Plaintext password; prefer `UNICTL_PASSWORD`.
    pub password: Option<String>,

    /// Override `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,
}

fn default_site() -> String {
    "default".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unictl", "unictl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("unictl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from a specific file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UNICTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session settings resolution ─────────────────────────────────────

/// Values given on the command line; each one beats the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub site: Option<String>,
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
}

/// Pick the active profile: `--profile`, then `default_profile`.
///
/// An explicitly requested profile must exist. A missing default profile
/// resolves to an empty one so that the session reports what is absent.
pub fn select_profile(
    config: &Config,
    requested: Option<&str>,
    path: &Path,
) -> Result<(String, Profile), ConfigError> {
    if let Some(name) = requested {
        return config
            .profiles
            .get(name)
            .map(|p| (name.to_owned(), p.clone()))
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_owned(),
                path: path.display().to_string(),
            });
    }

    let name = config
        .default_profile
        .clone()
        .unwrap_or_else(|| "default".into());
    let profile = config.profiles.get(&name).cloned().unwrap_or_default();
    Ok((name, profile))
}

/// Merge overrides > environment > profile > defaults into a `SessionConfig`.
///
/// Missing endpoint or credentials are passed through empty: the session
/// reports them as validation errors.
pub fn resolve_session_config(
    profile: &Profile,
    defaults: &Defaults,
    overrides: &Overrides,
) -> SessionConfig {
    resolve_session_config_with(profile, defaults, overrides, |key| std::env::var(key).ok())
}

/// As [`resolve_session_config`], reading the environment through `env`.
pub fn resolve_session_config_with(
    profile: &Profile,
    defaults: &Defaults,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> SessionConfig {
    let endpoint = overrides
        .endpoint
        .clone()
        .unwrap_or_else(|| profile.endpoint.clone());

    let username = overrides
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .or_else(|| profile.username.clone())
        .unwrap_or_default();

    let password = overrides
        .password
        .clone()
        .or_else(|| env(PASSWORD_ENV).map(SecretString::from))
        .or_else(|| profile.password.clone().map(SecretString::from))
        .unwrap_or_else(|| SecretString::from(String::new()));

    let site = overrides
        .site
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| profile.site.clone());

    let timeout = overrides
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);

    let accept_invalid_certs = overrides
        .insecure
        .or(profile.insecure)
        .unwrap_or(defaults.insecure);

    SessionConfig {
        endpoint,
        username,
        password,
        site,
        timeout: Duration::from_secs(timeout),
        accept_invalid_certs,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"
timeout = 15

[profiles.home]
endpoint = "https://192.168.1.1"
username = "admin"
password = "from-file"

[profiles.lab]
endpoint = "https://10.0.0.1"
site = "lab"
insecure = false
timeout = 5
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("home"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 15);
        assert_eq!(config.defaults.time, "relative");
        assert!(config.defaults.insecure);
        assert_eq!(config.profiles["home"].site, "default");
        assert_eq!(config.profiles["lab"].site, "lab");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.defaults, Defaults::default());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();

        let out = path.with_file_name("nested").join("saved.toml");
        save_config_to(&config, &out).unwrap();
        assert_eq!(load_config_from(&out).unwrap(), config);
    }

    #[test]
    fn profile_selection() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();

        let (name, profile) = select_profile(&config, None, &path).unwrap();
        assert_eq!(name, "home");
        assert_eq!(profile.endpoint, "https://192.168.1.1");

        let (_, lab) = select_profile(&config, Some("lab"), &path).unwrap();
        assert_eq!(lab.site, "lab");

        let err = select_profile(&config, Some("nope"), &path).unwrap_err();
        assert!(err.to_string().contains("profile 'nope' not found"));

        let empty = Config {
            default_profile: None,
            ..Config::default()
        };
        let (name, profile) = select_profile(&empty, None, &path).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn overrides_beat_env_beat_profile() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();
        let home = &config.profiles["home"];

        let from_profile =
            resolve_session_config_with(home, &config.defaults, &Overrides::default(), no_env);
        assert_eq!(from_profile.endpoint, "https://192.168.1.1");
        assert_eq!(from_profile.username, "admin");
        assert_eq!(from_profile.password.expose_secret(), "from-file");
        assert_eq!(from_profile.timeout, Duration::from_secs(15));

        let env = |key: &str| (key == PASSWORD_ENV).then(|| "from-env".to_owned());
        let from_env = resolve_session_config_with(home, &config.defaults, &Overrides::default(), env);
        assert_eq!(from_env.password.expose_secret(), "from-env");

        let overrides = Overrides {
            endpoint: Some("https://ctrl.example".into()),
            password: Some(SecretString::from("from-flag".to_owned())),
            site: Some("branch".into()),
            timeout: Some(3),
            ..Overrides::default()
        };
        let from_flags = resolve_session_config_with(home, &config.defaults, &overrides, env);
        assert_eq!(from_flags.endpoint, "https://ctrl.example");
        assert_eq!(from_flags.password.expose_secret(), "from-flag");
        assert_eq!(from_flags.site, "branch");
        assert_eq!(from_flags.timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_credentials_pass_through_empty() {
        let session = resolve_session_config_with(
            &Profile::default(),
            &Defaults::default(),
            &Overrides::default(),
            no_env,
        );
        assert!(session.endpoint.is_empty());
        assert!(session.username.is_empty());
        assert!(session.password.expose_secret().is_empty());
        assert!(session.accept_invalid_certs);
        assert_eq!(session.timeout, Duration::from_secs(60));
    }

    #[test]
    fn profile_insecure_overrides_default() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap();
        let lab = resolve_session_config_with(
            &config.profiles["lab"],
            &config.defaults,
            &Overrides::default(),
            no_env,
        );
        assert!(!lab.accept_invalid_certs);
        assert_eq!(lab.timeout, Duration::from_secs(5));
    }

    #[test]
    fn redacted_masks_passwords() {
        let (_dir, path) = write_sample();
        let config = load_config_from(&path).unwrap().redacted();
        assert_eq!(config.profiles["home"].password.as_deref(), Some(REDACTED));
        assert_eq!(config.profiles["lab"].password, None);
    }
}
