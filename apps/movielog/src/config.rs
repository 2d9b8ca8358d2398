use std::{fs, path::Path};

use anyhow::Context;
use movie_core::{LogOptions, DEFAULT_PREVIEW_CHARS};
use serde::Deserialize;
use shared::protocol::{GenreFilter, SortOrder};

pub const DEFAULT_CONFIG_PATH: &str = "movielog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub default_sort: SortOrder,
    pub default_genre_filter: GenreFilter,
    pub preview_chars: usize,
    pub log_level: String,
    pub confirm_deletes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sort: SortOrder::Newest,
            default_genre_filter: GenreFilter::All,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            log_level: "info".into(),
            confirm_deletes: true,
        }
    }
}

impl Settings {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            genre_filter: self.default_genre_filter,
            sort_order: self.default_sort,
            preview_chars: self.preview_chars,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    default_sort: Option<String>,
    default_genre_filter: Option<String>,
    preview_chars: Option<usize>,
    log_level: Option<String>,
    confirm_deletes: Option<bool>,
}

/// Defaults, then the TOML file if present, then `MOVIELOG__*` variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg)?;
        }
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) -> anyhow::Result<()> {
    if let Some(v) = file_cfg.default_sort {
        settings.default_sort = SortOrder::from_key(&v);
    }
    if let Some(v) = file_cfg.default_genre_filter {
        settings.default_genre_filter =
            GenreFilter::parse(&v).context("invalid default_genre_filter in config file")?;
    }
    if let Some(v) = file_cfg.preview_chars {
        settings.preview_chars = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    if let Some(v) = file_cfg.confirm_deletes {
        settings.confirm_deletes = v;
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("MOVIELOG__DEFAULT_SORT") {
        settings.default_sort = SortOrder::from_key(&v);
    }
    if let Some(v) = var("MOVIELOG__DEFAULT_GENRE_FILTER") {
        settings.default_genre_filter =
            GenreFilter::parse(&v).context("invalid MOVIELOG__DEFAULT_GENRE_FILTER")?;
    }
    if let Some(v) = var("MOVIELOG__PREVIEW_CHARS") {
        settings.preview_chars = v
            .trim()
            .parse()
            .with_context(|| format!("invalid MOVIELOG__PREVIEW_CHARS '{v}'"))?;
    }
    if let Some(v) = var("MOVIELOG__LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = var("MOVIELOG__CONFIRM_DELETES") {
        settings.confirm_deletes = v
            .trim()
            .parse()
            .with_context(|| format!("invalid MOVIELOG__CONFIRM_DELETES '{v}'"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
