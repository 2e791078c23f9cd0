//! Optional JSON parameter files
//!
//! A parameter file carries the tunables a lab shares across runs, so a
//! batch can be reproduced without replaying flags. Flags still win when
//! given explicitly.
//!
//! ```json
//! { "window": 9, "order": 3, "workers": 16 }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::CliError;

/// Smoothing and scheduling parameters loadable from JSON.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobParams {
    /// Smoothing window length, in frames.
    pub window: Option<usize>,
    /// Polynomial order of the smoothing fit.
    pub order: Option<usize>,
    /// Worker-pool size; 0 means all available cores.
    pub workers: Option<usize>,
}

impl JobParams {
    /// Load parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
