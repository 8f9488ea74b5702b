// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print-confirm workflow — gates submission of a generated report on the
// operator having previewed or downloaded it and then explicitly confirmed.
//
//   Idle → GeneratingArtifact → AwaitingPreviewOrDownload → AwaitingConfirmation
//        → Confirmed(timestamp) | Cancelled
//
// Any generation or host failure lands in `Failed`. Cancelled and Failed
// workflows may generate again. The artifact's object URL is revoked on every
// exit path, including drop.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{SecondsFormat, Utc};
use runsheet_core::error::{ReportError, Result};
use runsheet_core::{RenderOptions, ReportRecord};
use runsheet_layout::artifact::{Artifact, ObjectUrlRegistry};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::host::PresentationHost;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "camelCase")]
pub enum WorkflowState {
    Idle,
    GeneratingArtifact,
    AwaitingPreviewOrDownload,
    AwaitingConfirmation,
    /// ISO-8601 time of confirmation.
    Confirmed { timestamp: String },
    Cancelled,
    Failed(String),
}

impl WorkflowState {
    fn can_generate(&self) -> bool {
        matches!(self, Self::Idle | Self::Cancelled | Self::Failed(_))
    }

    fn has_artifact(&self) -> bool {
        matches!(
            self,
            Self::AwaitingPreviewOrDownload | Self::AwaitingConfirmation
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::GeneratingArtifact => write!(f, "generating"),
            Self::AwaitingPreviewOrDownload => write!(f, "awaiting preview or download"),
            Self::AwaitingConfirmation => write!(f, "awaiting confirmation"),
            Self::Confirmed { timestamp } => write!(f, "confirmed at {timestamp}"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Outcome handed to the confirm callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmDecision {
    Confirmed { timestamp: String },
    Declined,
}

impl ConfirmDecision {
    pub fn confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// The confirmation time, or `""` when declined.
    pub fn timestamp(&self) -> &str {
        match self {
            Self::Confirmed { timestamp } => timestamp,
            Self::Declined => "",
        }
    }
}

type ConfirmCallback = Box<dyn FnMut(&ConfirmDecision) + Send>;

struct Inner {
    state: WorkflowState,
    artifact: Option<Artifact>,
    on_confirm: Option<ConfirmCallback>,
    registry: ObjectUrlRegistry,
}

impl Inner {
    fn release_artifact(&mut self) -> Option<Artifact> {
        let artifact = self.artifact.take()?;
        self.registry.revoke(artifact.url());
        Some(artifact)
    }

    fn invalid(&self, action: &str) -> ReportError {
        ReportError::InvalidTransition {
            from: self.state.to_string(),
            action: action.into(),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.release_artifact().is_some() {
            warn!(state = %self.state, "workflow dropped while holding a report");
        }
    }
}

/// One operator's print-confirm session.
///
/// Clones share the same session, so a UI can hand one clone to the preview
/// button and another to the confirm button.
#[derive(Clone)]
pub struct PrintWorkflow {
    inner: Arc<Mutex<Inner>>,
    host: Arc<dyn PresentationHost>,
    registry: ObjectUrlRegistry,
    require_signed_attachment: bool,
}

impl PrintWorkflow {
    pub fn new(host: Arc<dyn PresentationHost>, registry: ObjectUrlRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: WorkflowState::Idle,
                artifact: None,
                on_confirm: None,
                registry: registry.clone(),
            })),
            host,
            registry,
            require_signed_attachment: false,
        }
    }

    /// Refuse to generate unless a signed document is supplied for appending.
    pub fn requiring_signed_attachment(mut self, required: bool) -> Self {
        self.require_signed_attachment = required;
        self
    }

    /// Register the callback told about confirm / cancel decisions.
    ///
    /// The callback is owned by the session. One that needs to look at the
    /// workflow should capture a [`WorkflowHandle`] from [`Self::downgrade`];
    /// a captured clone keeps the session, and its object URL, alive forever.
    pub fn on_confirm(&self, callback: impl FnMut(&ConfirmDecision) + Send + 'static) {
        self.lock().on_confirm = Some(Box::new(callback));
    }

    /// A handle that does not keep the session alive.
    pub fn downgrade(&self) -> WorkflowHandle {
        WorkflowHandle {
            inner: Arc::downgrade(&self.inner),
            host: Arc::clone(&self.host),
            registry: self.registry.clone(),
            require_signed_attachment: self.require_signed_attachment,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    /// The artifact currently awaiting preview / confirmation.
    pub fn artifact(&self) -> Option<Artifact> {
        self.lock().artifact.clone()
    }

    /// Generate the report and wait for the operator.
    ///
    /// Records missing required fields are rejected without leaving the
    /// current state.
    #[instrument(skip_all, fields(incident = %record.basic.incident_number))]
    pub async fn generate(
        &self,
        record: &ReportRecord,
        options: &RenderOptions,
    ) -> Result<Artifact> {
        self.begin_generation(record, options)?;

        match runsheet_layout::generate(record, options, &self.registry).await {
            Ok(artifact) => {
                let mut inner = self.lock();
                inner.artifact = Some(artifact.clone());
                inner.state = WorkflowState::AwaitingPreviewOrDownload;
                info!(filename = artifact.filename(), "awaiting preview or download");
                Ok(artifact)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Check every precondition and enter `GeneratingArtifact` under one lock.
    fn begin_generation(&self, record: &ReportRecord, options: &RenderOptions) -> Result<()> {
        let mut inner = self.lock();
        if inner.state == WorkflowState::GeneratingArtifact {
            return Err(ReportError::GenerationInProgress);
        }
        if !inner.state.can_generate() {
            return Err(inner.invalid("generate a report"));
        }
        record.validate()?;
        if self.require_signed_attachment && options.append_document.is_none() {
            return Err(ReportError::MissingRequiredFields(vec![
                "signed document".into(),
            ]));
        }
        inner.state = WorkflowState::GeneratingArtifact;
        Ok(())
    }

    fn fail(&self, err: &ReportError) {
        let mut inner = self.lock();
        inner.release_artifact();
        inner.state = WorkflowState::Failed(err.to_string());
        warn!(error = %err, "workflow failed");
    }

    /// Run one host action against the current artifact, unlocking
    /// confirmation on success.
    fn present(
        &self,
        action: &str,
        run: impl FnOnce(&dyn PresentationHost, &Artifact) -> Result<()>,
    ) -> Result<()> {
        let artifact = {
            let inner = self.lock();
            match (&inner.artifact, inner.state.has_artifact()) {
                (Some(artifact), true) => artifact.clone(),
                _ => return Err(inner.invalid(action)),
            }
        };

        if let Err(err) = run(self.host.as_ref(), &artifact) {
            self.fail(&err);
            return Err(err);
        }

        let mut inner = self.lock();
        let same = inner.artifact.as_ref().map(Artifact::url) == Some(artifact.url());
        if same && inner.state == WorkflowState::AwaitingPreviewOrDownload {
            inner.state = WorkflowState::AwaitingConfirmation;
            info!(action, "confirmation unlocked");
        }
        Ok(())
    }

    pub fn preview(&self) -> Result<()> {
        self.present("preview", |host, artifact| host.present_preview(artifact))
    }

    pub fn download(&self) -> Result<()> {
        self.present("download", |host, artifact| host.save_download(artifact))
    }

    /// Check, release and transition under one lock, then tell the callback.
    fn decide(
        &self,
        decision: ConfirmDecision,
        next: WorkflowState,
        check: impl FnOnce(&Inner) -> Result<()>,
    ) -> Result<Option<Artifact>> {
        let (artifact, callback) = {
            let mut inner = self.lock();
            check(&inner)?;
            let artifact = inner.release_artifact();
            inner.state = next;
            (artifact, inner.on_confirm.take())
        };

        // Unlocked, so a callback holding a `WorkflowHandle` may query state.
        if let Some(mut callback) = callback {
            callback(&decision);
            let mut inner = self.lock();
            if inner.on_confirm.is_none() {
                inner.on_confirm = Some(callback);
            }
        }
        Ok(artifact)
    }

    /// Confirm the previewed report. Returns the artifact for submission; its
    /// object URL has already been revoked but the bytes remain readable.
    #[instrument(skip_all)]
    pub fn confirm(&self) -> Result<Artifact> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let decision = ConfirmDecision::Confirmed {
            timestamp: timestamp.clone(),
        };
        let next = WorkflowState::Confirmed {
            timestamp: timestamp.clone(),
        };
        let artifact = self.decide(decision, next, |inner| match (&inner.state, &inner.artifact) {
            (WorkflowState::AwaitingConfirmation, Some(_)) => Ok(()),
            (WorkflowState::AwaitingPreviewOrDownload, _) => Err(ReportError::ConfirmationLocked),
            _ => Err(inner.invalid("confirm")),
        })?;

        match artifact {
            Some(artifact) => {
                info!(%timestamp, filename = artifact.filename(), "report confirmed");
                Ok(artifact)
            }
            None => Err(ReportError::InvalidTransition {
                from: "awaiting confirmation".into(),
                action: "confirm without a report".into(),
            }),
        }
    }

    /// Discard the report without submitting it.
    #[instrument(skip_all)]
    pub fn cancel(&self) -> Result<()> {
        self.decide(ConfirmDecision::Declined, WorkflowState::Cancelled, |inner| {
            if inner.state.has_artifact() {
                Ok(())
            } else {
                Err(inner.invalid("cancel"))
            }
        })?;
        info!("report discarded");
        Ok(())
    }
}

/// Weak reference to a [`PrintWorkflow`] session, for use inside its own
/// callbacks.
#[derive(Clone)]
pub struct WorkflowHandle {
    inner: Weak<Mutex<Inner>>,
    host: Arc<dyn PresentationHost>,
    registry: ObjectUrlRegistry,
    require_signed_attachment: bool,
}

impl WorkflowHandle {
    /// The session, unless every [`PrintWorkflow`] for it has been dropped.
    pub fn upgrade(&self) -> Option<PrintWorkflow> {
        Some(PrintWorkflow {
            inner: self.inner.upgrade()?,
            host: Arc::clone(&self.host),
            registry: self.registry.clone(),
            require_signed_attachment: self.require_signed_attachment,
        })
    }
}
