// SPDX-License-Identifier: GPL-3.0-only

//! Booth state types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What one press of the shutter produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// One card per capture
    #[default]
    Single,
    /// Four captures stacked into one strip
    Strip,
}

impl CaptureMode {
    pub const ALL: [CaptureMode; 2] = [CaptureMode::Single, CaptureMode::Strip];

    pub fn name(&self) -> &'static str {
        match self {
            CaptureMode::Single => "single",
            CaptureMode::Strip => "strip",
        }
    }
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaptureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown capture mode '{}' (expected single or strip)", s))
    }
}

/// Result of one capture attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Camera was off; nothing happened
    CameraOff,
    /// A single card was added to the gallery
    Photo,
    /// A strip frame was buffered; `frames` are waiting
    StripPending { frames: usize },
    /// The fourth frame completed a strip, which was added to the gallery
    Strip,
}
