// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Runsheet.

use thiserror::Error;

/// Top-level error type for all Runsheet operations.
#[derive(Debug, Error)]
pub enum ReportError {
    // -- Precondition --
    #[error("record is missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    // -- Rendering --
    #[error("annotation could not be decoded: {0}")]
    Annotation(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("appending the external document failed: {0}")]
    Merge(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("background task failed: {0}")]
    Join(String),

    // -- Workflow --
    #[error("cannot {action} while the workflow is {from}")]
    InvalidTransition { from: String, action: String },

    #[error("a report is already being generated for this workflow")]
    GenerationInProgress,

    #[error("confirmation is locked until the report has been previewed or downloaded")]
    ConfirmationLocked,

    #[error("presentation host error: {0}")]
    Host(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReportError>;
