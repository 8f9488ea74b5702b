// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifacts — the finished PDF bytes plus the handle a presentation host uses
// to show them, the download filename, and an integrity digest.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

/// Compute the SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// `PCR_<date>_<incident>_<patient>.pdf`, with every character outside
/// `[A-Za-z0-9]` in each fragment replaced by `_`.
pub fn report_filename(date: &str, incident_number: &str, patient_name: &str) -> String {
    format!(
        "PCR_{}_{}_{}.pdf",
        sanitize(date),
        sanitize(incident_number),
        sanitize(patient_name)
    )
}

fn sanitize(fragment: &str) -> String {
    fragment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Handle under which an artifact's bytes are reachable by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Live object URLs and the bytes behind them.
///
/// Cloning shares the same table. Whoever holds an artifact last is
/// responsible for [`ObjectUrlRegistry::revoke`].
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    live: Arc<Mutex<HashMap<ObjectUrl, Arc<Vec<u8>>>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ObjectUrl, Arc<Vec<u8>>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self, bytes: Arc<Vec<u8>>) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:runsheet/{}", Uuid::new_v4()));
        self.table().insert(url.clone(), bytes);
        debug!(url = %url, "object URL created");
        url
    }

    /// Release `url`. Returns `false` if it was already revoked.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        let removed = self.table().remove(url).is_some();
        if removed {
            debug!(url = %url, "object URL revoked");
        } else {
            warn!(url = %url, "object URL revoked twice");
        }
        removed
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Option<Arc<Vec<u8>>> {
        self.table().get(url).cloned()
    }

    pub fn is_live(&self, url: &ObjectUrl) -> bool {
        self.table().contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.table().len()
    }
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct Artifact {
    bytes: Arc<Vec<u8>>,
    url: ObjectUrl,
    filename: String,
    sha256: String,
    page_count: usize,
}

impl Artifact {
    pub(crate) fn new(
        bytes: Vec<u8>,
        filename: String,
        page_count: usize,
        registry: &ObjectUrlRegistry,
    ) -> Self {
        let sha256 = hash_bytes(&bytes);
        let bytes = Arc::new(bytes);
        let url = registry.create(Arc::clone(&bytes));
        Self {
            bytes,
            url,
            filename,
            sha256,
            page_count,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_replaces_non_alphanumerics() {
        assert_eq!(
            report_filename("2026-03-14", "INC/0042", "O'Brien, Siobhán"),
            "PCR_2026_03_14_INC_0042_O_Brien__Siobh_n.pdf"
        );
    }

    #[test]
    fn filename_depends_only_on_its_inputs() {
        let a = report_filename("2026-03-14", "17", "Jo Bloggs");
        let b = report_filename("2026-03-14", "17", "Jo Bloggs");
        assert_eq!(a, b);
        assert_ne!(a, report_filename("2026-03-14", "18", "Jo Bloggs"));
    }

    #[test]
    fn hash_known_value() {
        assert_eq!(
            hash_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn registry_tracks_live_urls() {
        let registry = ObjectUrlRegistry::new();
        let artifact = Artifact::new(b"%PDF-1.7".to_vec(), "x.pdf".into(), 1, &registry);
        assert!(registry.is_live(artifact.url()));
        assert_eq!(
            registry.resolve(artifact.url()).as_deref().map(Vec::as_slice),
            Some(artifact.bytes())
        );
        assert_eq!(artifact.size(), 8);

        assert!(registry.revoke(artifact.url()));
        assert!(!registry.revoke(artifact.url()));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn clones_share_one_table() {
        let registry = ObjectUrlRegistry::new();
        let other = registry.clone();
        let url = registry.create(Arc::new(vec![1, 2, 3]));
        assert!(other.is_live(&url));
        assert!(url.as_str().starts_with("blob:runsheet/"));
    }
}
