//! Rule-layer configuration.

use thiserror::Error;

pub const FANOUT_CONCURRENCY_ENV: &str = "TRADETALK_FANOUT_CONCURRENCY";
pub const PREVIEW_LEN_ENV: &str = "TRADETALK_PREVIEW_LEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesConfig {
    /// Max in-flight store calls for per-item loops (message reassignment,
    /// receipt creation and marking). 1 keeps them strictly sequential.
    pub fanout_concurrency: usize,

    /// Characters of a message body kept as the thread's last-message preview.
    pub preview_len: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fanout_concurrency: 1,
            preview_len: 100,
        }
    }
}

impl RulesConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            fanout_concurrency: positive(&lookup, FANOUT_CONCURRENCY_ENV)?
                .unwrap_or(defaults.fanout_concurrency),
            preview_len: positive(&lookup, PREVIEW_LEN_ENV)?.unwrap_or(defaults.preview_len),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fanout_concurrency == 0 {
            return Err(ConfigError::NotPositive {
                var: FANOUT_CONCURRENCY_ENV,
                value: "0".into(),
            });
        }
        if self.preview_len == 0 {
            return Err(ConfigError::NotPositive {
                var: PREVIEW_LEN_ENV,
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn positive<F>(lookup: &F, var: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::NotPositive { var, value: raw }),
    }
}
