//! Runtime settings, read from the environment.

use crate::clients::DEFAULT_MAX_ATTEMPTS;
use crate::dispatch::DEFAULT_SAMPLE_LIMIT;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// At most this many active riders are considered per order.
    pub sample_limit: usize,
    /// Dispatch-and-commit rounds before `RiderNoLongerAvailable` is returned.
    pub max_attempts: u32,
    /// Capacity of every actor mailbox.
    pub channel_buffer: usize,
    /// Fixes the rider-sampling RNG when set.
    pub sample_seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            channel_buffer: 32,
            sample_seed: None,
        }
    }
}

impl DispatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            sample_limit: try_load(&lookup, "DISPATCH_SAMPLE_LIMIT", defaults.sample_limit)?,
            max_attempts: try_load(&lookup, "DISPATCH_MAX_ATTEMPTS", defaults.max_attempts)?,
            channel_buffer: try_load(&lookup, "DISPATCH_CHANNEL_BUFFER", defaults.channel_buffer)?,
            sample_seed: lookup("DISPATCH_SAMPLE_SEED")
                .map(|raw| parse("DISPATCH_SAMPLE_SEED", &raw))
                .transpose()?,
        };

        if config.sample_limit == 0 {
            return Err(ConfigError::Zero("DISPATCH_SAMPLE_LIMIT"));
        }
        if config.max_attempts == 0 {
            return Err(ConfigError::Zero("DISPATCH_MAX_ATTEMPTS"));
        }
        if config.channel_buffer == 0 {
            return Err(ConfigError::Zero("DISPATCH_CHANNEL_BUFFER"));
        }
        Ok(config)
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
