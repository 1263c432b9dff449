use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::parser::ParseOptions;
use crate::report::DayWindow;

const CONFIG_FILE: &str = "cru";
const ENV_PREFIX: &str = "CRU";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub show_errors: bool,
    pub filter_noise: bool,
    pub data_dir: PathBuf,
    pub day_start: u32,
    pub day_end: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            show_errors: true,
            filter_noise: true,
            data_dir: PathBuf::from("data"),
            day_start: 8,
            day_end: 18,
        }
    }
}

impl Settings {
    /// Load `cru.toml` (optional) overlaid by `CRU_*` environment variables.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?;
        let settings: Settings = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.day_start < self.day_end && self.day_end <= 24,
            "day_start ({}) must be before day_end ({}) within 0..=24",
            self.day_start,
            self.day_end
        );
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            show_errors: self.show_errors,
            filter_noise: self.filter_noise,
        }
    }

    pub fn day_window(&self) -> DayWindow {
        DayWindow::from_hours(self.day_start, self.day_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.parse_options(), ParseOptions::default());
        assert_eq!(s.day_window(), DayWindow { start: 480, end: 1080 });
    }

    #[test]
    fn rejects_inverted_day() {
        let s = Settings {
            day_start: 18,
            day_end: 8,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let s: Settings = Config::builder()
            .set_override("filter_noise", false)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(!s.filter_noise);
        assert!(s.show_errors);
        assert_eq!(s.day_end, 18);
    }
}
