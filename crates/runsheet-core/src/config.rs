// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::types::RenderOptions;

/// Persistent engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Defaults applied to every generation call.
    pub render: RenderOptions,
    /// Where downloaded artifacts are written by the headless host.
    pub output_dir: PathBuf,
    /// Refuse to finish the workflow unless a signed document was appended.
    pub require_signed_attachment: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            output_dir: PathBuf::from("."),
            require_signed_attachment: false,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            ReportError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Load a config file if given, falling back to defaults when it is absent
    /// or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load(p).unwrap_or_else(|e| {
                warn!(error = %e, "using default engine config");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaperSize;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runsheet.json");

        let mut config = EngineConfig::default();
        config.render.format = PaperSize::Letter;
        config.render.max_transposed_columns = 10;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.render.format, PaperSize::Letter);
        assert_eq!(loaded.render.max_transposed_columns, 10);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load_or_default(Some(Path::new("/nonexistent/runsheet.json")));
        assert_eq!(config.render.format, PaperSize::A4);
        assert!(!config.require_signed_attachment);
    }
}
