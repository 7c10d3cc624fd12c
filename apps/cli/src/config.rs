use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::RenderOptions;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "combo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub preview_limit: usize,
    pub show_stats: bool,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5001".into(),
            preview_limit: client_core::render::DEFAULT_PREVIEW_LIMIT,
            show_stats: false,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            preview_limit: self.preview_limit,
            show_stats: self.show_stats,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    preview_limit: Option<usize>,
    show_stats: Option<bool>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicit `config_path` must exist; the default `combo.toml` is only
/// read when present in the working directory.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    debug!(?settings, "settings loaded");
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.preview_limit {
        settings.preview_limit = v;
    }
    if let Some(v) = file_cfg.show_stats {
        settings.show_stats = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = (v > 0).then_some(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("COMBO_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__PREVIEW_LIMIT") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.preview_limit = parsed;
        }
    }

    if let Some(v) = lookup("APP__SHOW_STATS") {
        if let Some(parsed) = parse_flag(&v) {
            settings.show_stats = parsed;
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = (parsed > 0).then_some(parsed);
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
