//! Output formatting: table, JSON, YAML.
//!
//! A [`Formatter`] fixes the format, the destination and the
//! [`RenderOptions`] once; every `write` call is independent. Types that
//! know how to draw themselves as a table implement [`Render::render_table`];
//! everything else falls back to compact single-line JSON in table mode,
//! or to its `Debug` form when it has no JSON form.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};
use thiserror::Error;
use tracing::debug;

use unictl_core::TimeStyle;

const SUPPORTED: &str = "table, json, yaml";

// ── Format ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
    /// Nested maps indent by two spaces. Sequences under a key stay at the
    /// key's column; that is the encoder's fixed style.
    Yaml,
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "table" | "tab" | "t" => Ok(Self::Table),
            "json" | "js" | "j" => Ok(Self::Json),
            "yaml" | "yml" | "y" => Ok(Self::Yaml),
            _ => Err(FormatError::Unsupported(name.to_owned())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported format '{0}' (supported: {SUPPORTED})")]
    Unsupported(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

// ── Render capability ────────────────────────────────────────────────

/// Presentation settings threaded through every table rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Add receive/transmit rate columns to client tables.
    pub show_rate: bool,
    pub time_style: TimeStyle,
    /// Reference point for relative times.
    pub now: DateTime<Utc>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_rate: false,
            time_style: TimeStyle::default(),
            now: Utc::now(),
        }
    }
}

/// Anything the formatter can write. Structured formats go through serde;
/// table output uses `render_table` when it returns `Some`.
pub trait Render: Serialize + fmt::Debug {
    fn render_table(&self, _options: &RenderOptions) -> Option<String> {
        None
    }
}

impl Render for serde_json::Value {}

// ── Formatter ────────────────────────────────────────────────────────

pub struct Formatter<W: Write> {
    format: Format,
    out: W,
    options: RenderOptions,
}

impl<W: Write> Formatter<W> {
    pub fn new(format: Format, out: W, options: RenderOptions) -> Self {
        Self {
            format,
            out,
            options,
        }
    }

    /// Encode `value` completely, then write it in one piece.
    pub fn write<T: Render + ?Sized>(&mut self, value: &T) -> Result<(), FormatError> {
        let mut text = match self.format {
            Format::Json => serde_json::to_string_pretty(value)?,
            Format::Yaml => serde_yaml::to_string(value)?,
            Format::Table => match value.render_table(&self.options) {
                Some(table) => table,
                None => serde_json::to_string(value).unwrap_or_else(|e| {
                    debug!(error = %e, "no single-line JSON form, using Debug");
                    format!("{value:?}")
                }),
            },
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

// ── Table helpers ────────────────────────────────────────────────────

pub fn table<R: Tabled>(rows: &[R]) -> String {
    styled(Table::new(rows))
}

pub fn styled(mut table: Table) -> String {
    table.with(Style::rounded()).to_string()
}

/// `-` for an empty cell.
pub fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug)]
    struct Labeled(Vec<&'static str>);

    impl Serialize for Labeled {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.0.serialize(serializer)
        }
    }

    impl Render for Labeled {
        fn render_table(&self, _options: &RenderOptions) -> Option<String> {
            Some(self.0.join(" | "))
        }
    }

    fn render(format: Format, value: &impl Render) -> String {
        let mut buf = Vec::new();
        Formatter::new(format, &mut buf, RenderOptions::default())
            .write(value)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn format_names_and_aliases() {
        for (name, want) in [
            ("table", Format::Table),
            ("TAB", Format::Table),
            ("t", Format::Table),
            ("json", Format::Json),
            ("Js", Format::Json),
            ("j", Format::Json),
            ("yaml", Format::Yaml),
            ("YML", Format::Yaml),
            ("y", Format::Yaml),
        ] {
            assert_eq!(name.parse::<Format>().unwrap(), want, "{name}");
        }
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let text = "csv".parse::<Format>().unwrap_err().to_string();
        assert!(text.contains("unsupported format"), "{text}");
        assert!(text.contains("table, json, yaml"), "{text}");
    }

    #[test]
    fn json_round_trips_nested_maps_and_integers() {
        let record = json!({
            "name": "office-ap",
            "counters": { "rx": 1_234_567_890_123_i64, "tx": -5 },
            "ports": [{ "idx": 1, "poe": { "watts": 7 } }],
        });
        let text = render(Format::Json, &record);
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert!(text.contains("\n  \"counters\""), "two-space indent:\n{text}");
    }

    #[test]
    fn yaml_uses_two_space_indent() {
        let text = render(Format::Yaml, &json!({ "outer": { "inner": 1 } }));
        assert_eq!(text, "outer:\n  inner: 1\n");
    }

    #[test]
    fn table_delegates_to_self_renderer() {
        let text = render(Format::Table, &Labeled(vec!["a", "b"]));
        assert_eq!(text, "a | b\n");
    }

    #[test]
    fn table_falls_back_to_single_line() {
        let text = render(Format::Table, &json!({ "k": [1, 2] }));
        assert_eq!(text, "{\"k\":[1,2]}\n");
    }

    #[test]
    fn table_falls_back_to_debug_without_json_form() {
        #[derive(Debug, Serialize)]
        struct Grid(BTreeMap<(u8, u8), u8>);
        impl Render for Grid {}

        let grid = Grid(BTreeMap::from([((1, 2), 3)]));
        assert_eq!(render(Format::Table, &grid), "Grid({(1, 2): 3})\n");
    }

    #[test]
    fn writes_are_independent() {
        let mut buf = Vec::new();
        let mut formatter = Formatter::new(Format::Json, &mut buf, RenderOptions::default());
        formatter.write(&json!(1)).unwrap();
        formatter.write(&json!("two")).unwrap();
        drop(formatter);
        assert_eq!(String::from_utf8(buf).unwrap(), "1\n\"two\"\n");
    }
}
