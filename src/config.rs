use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub struct Config {
    pub poll_file: PathBuf,
    pub bind_addr: String,
    pub port: u16,
}

impl Config {
    /// Reads settings from the environment.
    pub fn load() -> Result<Self, String> {
        Ok(Self {
            poll_file: try_load("POLL_FILE", "polls.yml")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0")?,
            port: try_load("PORT", "5001")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        format!("invalid {key} value {raw:?}: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_unset_keys() {
        let port: u16 = try_load("CLASSROOM_POLLS_TEST_UNSET_PORT", "5001").unwrap();
        assert_eq!(port, 5001);
    }

    #[test]
    fn unparsable_defaults_are_reported() {
        let result: Result<u16, String> = try_load("CLASSROOM_POLLS_TEST_UNSET_PORT", "not-a-port");
        assert!(result.unwrap_err().contains("CLASSROOM_POLLS_TEST_UNSET_PORT"));
    }
}
