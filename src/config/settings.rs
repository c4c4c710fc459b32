use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TICK_MS: u64 = 1000;
pub const MIN_TICK_MS: u64 = 100;
pub const DEFAULT_LOG_FILE: &str = "deskwatch.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tick_interval: Duration,
    pub debug_logs: bool,
    pub log_file: PathBuf,
    pub headless: bool,
    pub json_summary: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            debug_logs: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            headless: false,
            json_summary: false,
        }
    }
}

impl Settings {
    fn get_env_path() -> Result<PathBuf> {
        Ok(env::current_dir()?.join(".env"))
    }

    /// Loads `.env` from the working directory (if any) and reads settings
    /// from the process environment.
    pub fn new() -> Result<Self> {
        let env_path = Self::get_env_path()?;
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("Failed to load {}", env_path.display()))?;
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup("DESKWATCH_TICK_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("DESKWATCH_TICK_MS must be a number of milliseconds, got '{}'", raw))?;
            settings.set_tick_ms(ms)?;
        }

        settings.debug_logs = lookup("DEBUG_LOGS_ENABLED")
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        if let Some(path) = lookup("DESKWATCH_LOG_FILE").filter(|p| !p.trim().is_empty()) {
            settings.log_file = PathBuf::from(path.trim());
        }

        Ok(settings)
    }

    pub fn set_tick_ms(&mut self, ms: u64) -> Result<()> {
        if ms < MIN_TICK_MS {
            bail!("Sampling interval must be at least {}ms, got {}ms", MIN_TICK_MS, ms);
        }
        self.tick_interval = Duration::from_millis(ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.log_file, PathBuf::from("deskwatch.log"));
    }

    #[test]
    fn test_reads_environment() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DESKWATCH_TICK_MS", "250"),
            ("DEBUG_LOGS_ENABLED", "true"),
            ("DESKWATCH_LOG_FILE", "/tmp/dw.log"),
        ]))
        .unwrap();

        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert!(settings.debug_logs);
        assert_eq!(settings.log_file, PathBuf::from("/tmp/dw.log"));
    }

    #[test]
    fn test_unparseable_debug_flag_is_off() {
        let settings = Settings::from_lookup(lookup_from(&[("DEBUG_LOGS_ENABLED", "yes")])).unwrap();
        assert!(!settings.debug_logs);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(Settings::from_lookup(lookup_from(&[("DESKWATCH_TICK_MS", "fast")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("DESKWATCH_TICK_MS", "10")])).is_err());

        let mut settings = Settings::default();
        assert!(settings.set_tick_ms(99).is_err());
        assert!(settings.set_tick_ms(100).is_ok());
        assert_eq!(settings.tick_interval, Duration::from_millis(100));
    }
}
