use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfMode {
    /// ln(N / df); a term found in every document weighs 0
    #[default]
    Standard,
    /// ln(1 + N / df)
    Smoothed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub idf: IdfMode,
}

impl EngineConfig {
    pub fn smoothed(smoothed_idf: bool) -> Self {
        Self { idf: if smoothed_idf { IdfMode::Smoothed } else { IdfMode::Standard } }
    }
}

/// When the indexing pipeline rebuilds. The engine never rebuilds on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Only when `build_index` is called explicitly.
    #[default]
    Manual,
    /// After every mutating write.
    WriteThrough,
    /// On a timer, whenever the engine is ACCUMULATING or STALE.
    Interval(Duration),
}

impl RebuildPolicy {
    /// Parse a policy name plus the interval used by `interval`.
    pub fn from_name(name: &str, interval_secs: u64) -> Result<Self> {
        match name.parse::<PolicyName>()? {
            PolicyName::Manual => Ok(RebuildPolicy::Manual),
            PolicyName::WriteThrough => Ok(RebuildPolicy::WriteThrough),
            PolicyName::Interval if interval_secs == 0 => bail!("rebuild interval must be at least one second"),
            PolicyName::Interval => Ok(RebuildPolicy::Interval(Duration::from_secs(interval_secs))),
        }
    }
}

impl fmt::Display for RebuildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildPolicy::Manual => write!(f, "manual"),
            RebuildPolicy::WriteThrough => write!(f, "write-through"),
            RebuildPolicy::Interval(d) => write!(f, "interval({}s)", d.as_secs()),
        }
    }
}

enum PolicyName { Manual, WriteThrough, Interval }

impl FromStr for PolicyName {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(PolicyName::Manual),
            "write-through" | "write_through" => Ok(PolicyName::WriteThrough),
            "interval" => Ok(PolicyName::Interval),
            other => bail!("unknown rebuild policy: {other}"),
        }
    }
}
