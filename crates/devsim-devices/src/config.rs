use core::fmt;
use core::str::FromStr;

use thiserror::Error;

pub const OVERLAP_POLICY_ENV: &str = "DEVSIM_OVERLAP_POLICY";

/// How [`crate::DeviceRegistry::create`] treats region descriptors that overlap each other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Accept overlaps; an address resolves to the first matching region in creation order.
    #[default]
    FirstMatch,
    /// Refuse the device with `InvalidArgument`.
    Reject,
}

impl OverlapPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlapPolicy::FirstMatch => "first-match",
            OverlapPolicy::Reject => "reject",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first-match" => Ok(OverlapPolicy::FirstMatch),
            "reject" => Ok(OverlapPolicy::Reject),
            other => Err(ConfigError::InvalidValue {
                key: OVERLAP_POLICY_ENV,
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub overlap_policy: OverlapPolicy,
}

impl RegistryConfig {
    /// Reads `DEVSIM_OVERLAP_POLICY` (`first-match` | `reject`); unset means the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`RegistryConfig::from_env`], but with an explicit variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let overlap_policy = match lookup(OVERLAP_POLICY_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => OverlapPolicy::default(),
        };
        Ok(Self { overlap_policy })
    }
}
