// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages.
//
// Crews read these on a tablet in the back of an ambulance; every technical
// error is mapped to a plain sentence and one concrete next step.

use crate::error::ReportError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operator can fix it in the form and try again.
    ActionRequired,
    /// Retrying the same action may succeed.
    Transient,
    /// The report cannot be produced as-is; escalate.
    Permanent,
}

/// A plain-language error with a suggested next step.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ReportError` into something an operator can act on.
pub fn humanize_error(err: &ReportError) -> HumanError {
    match err {
        ReportError::MissingRequiredFields(fields) => HumanError {
            message: "The report is missing required information.".into(),
            suggestion: format!("Fill in: {}.", fields.join(", ")),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ReportError::Annotation(_) => HumanError {
            message: "The body diagram could not be read.".into(),
            suggestion: "Redraw the diagram, or print without it.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        ReportError::Merge(detail) => HumanError {
            message: "The signed form could not be attached.".into(),
            suggestion: format!(
                "The report was NOT produced. Re-scan or re-export the signed form as a PDF. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        ReportError::PdfError(_) | ReportError::Serialization(_) => HumanError {
            message: "The report could not be created.".into(),
            suggestion: "Try again. If it keeps failing, contact your supervisor.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ReportError::Join(_) => HumanError {
            message: "Report generation stopped unexpectedly.".into(),
            suggestion: "Try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ReportError::GenerationInProgress => HumanError {
            message: "The report is still being prepared.".into(),
            suggestion: "Wait for the preview to appear.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ReportError::ConfirmationLocked => HumanError {
            message: "Please open or download the report first.".into(),
            suggestion: "Preview or download the report, check it, then confirm.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ReportError::InvalidTransition { .. } => HumanError {
            message: "That step is not available right now.".into(),
            suggestion: "Start again from the report screen.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ReportError::Host(detail) => HumanError {
            message: "The report could not be shown or saved.".into(),
            suggestion: format!("Check storage space and try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        ReportError::Config(detail) => HumanError {
            message: "The report settings are invalid.".into(),
            suggestion: format!("Ask an administrator to check the settings file. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ReportError::Io(io_err) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check the file location and permissions. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        ReportError::Json(json_err) => HumanError {
            message: "The report data is damaged.".into(),
            suggestion: format!("Re-open the record from the list and try again. ({json_err})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
