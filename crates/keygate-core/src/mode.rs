use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the front-end is running.
///
/// `Desktop` means the native shell owns the process and talks to the backend
/// over IPC, so the gate always passes. `Hosted` covers browser, Docker and
/// headless deployments, where every request carries the admin credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Desktop,
    #[default]
    Hosted,
}

impl ExecutionMode {
    pub fn is_desktop(&self) -> bool {
        matches!(self, ExecutionMode::Desktop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Desktop => "desktop",
            ExecutionMode::Hosted => "hosted",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desktop" | "native" => Ok(ExecutionMode::Desktop),
            "hosted" | "web" | "browser" | "docker" | "headless" => Ok(ExecutionMode::Hosted),
            other => Err(anyhow::anyhow!("Unknown execution mode: {}", other)),
        }
    }
}
