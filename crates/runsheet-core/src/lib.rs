// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runsheet — Core record types, render options, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod record;
pub mod types;

pub use config::EngineConfig;
pub use error::{ReportError, Result};
pub use record::ReportRecord;
pub use types::*;
