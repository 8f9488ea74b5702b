// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Presentation host — whatever shows the finished report to the operator.
//
// The workflow only knows that a host can preview and download an artifact;
// how it does so (browser tab, native viewer, a file on disk) is the host's
// business.

use std::path::PathBuf;
use std::sync::Mutex;

use runsheet_core::error::{ReportError, Result};
use runsheet_layout::artifact::{Artifact, ObjectUrlRegistry};
use tracing::{debug, info, instrument};

/// Preview and download surface for finished reports.
pub trait PresentationHost: Send + Sync {
    /// Show the artifact to the operator. Returns once it has been presented.
    fn present_preview(&self, artifact: &Artifact) -> Result<()>;

    /// Hand the artifact's bytes to the operator under its filename.
    fn save_download(&self, artifact: &Artifact) -> Result<()>;
}

/// Host for batch and command-line use: previews resolve the object URL,
/// downloads write `<output_dir>/<filename>`.
pub struct HeadlessHost {
    output_dir: PathBuf,
    registry: ObjectUrlRegistry,
    saved: Mutex<Vec<PathBuf>>,
}

impl HeadlessHost {
    pub fn new(output_dir: impl Into<PathBuf>, registry: ObjectUrlRegistry) -> Self {
        Self {
            output_dir: output_dir.into(),
            registry,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Paths written by [`PresentationHost::save_download`], oldest first.
    pub fn saved(&self) -> Vec<PathBuf> {
        self.saved
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl PresentationHost for HeadlessHost {
    #[instrument(skip_all, fields(url = %artifact.url()))]
    fn present_preview(&self, artifact: &Artifact) -> Result<()> {
        let bytes = self.registry.resolve(artifact.url()).ok_or_else(|| {
            ReportError::Host(format!("{} is no longer available", artifact.url()))
        })?;
        info!(
            filename = artifact.filename(),
            bytes = bytes.len(),
            pages = artifact.page_count(),
            "preview presented"
        );
        Ok(())
    }

    #[instrument(skip_all, fields(filename = artifact.filename()))]
    fn save_download(&self, artifact: &Artifact) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            ReportError::Host(format!(
                "cannot create {}: {e}",
                self.output_dir.display()
            ))
        })?;
        let path = self.output_dir.join(artifact.filename());
        std::fs::write(&path, artifact.bytes())
            .map_err(|e| ReportError::Host(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = artifact.size(), "download saved");

        match self.saved.lock() {
            Ok(mut saved) => saved.push(path),
            Err(poisoned) => poisoned.into_inner().push(path),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runsheet_core::{RenderOptions, ReportRecord};

    async fn artifact(registry: &ObjectUrlRegistry) -> Artifact {
        let mut record = ReportRecord::default();
        record.basic.date = "2026-03-14".into();
        record.basic.incident_number = "INC-4".into();
        record.basic.unit_number = "M12".into();
        record.patient.name = "Jo Bloggs".into();
        runsheet_layout::generate(&record, &RenderOptions::default(), registry)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn download_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ObjectUrlRegistry::new();
        let host = HeadlessHost::new(dir.path().join("out"), registry.clone());
        let artifact = artifact(&registry).await;

        host.save_download(&artifact).unwrap();
        let path = dir.path().join("out").join("PCR_2026_03_14_INC_4_Jo_Bloggs.pdf");
        assert_eq!(host.saved(), vec![path.clone()]);
        assert_eq!(std::fs::read(path).unwrap(), artifact.bytes());
    }

    #[tokio::test]
    async fn preview_of_revoked_url_fails() {
        let registry = ObjectUrlRegistry::new();
        let host = HeadlessHost::new(".", registry.clone());
        let artifact = artifact(&registry).await;

        host.present_preview(&artifact).unwrap();
        registry.revoke(artifact.url());
        let err = host.present_preview(&artifact).unwrap_err();
        assert!(matches!(err, ReportError::Host(_)));
    }
}
