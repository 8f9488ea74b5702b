// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runsheet Workflow — the print-confirm state machine that sits between the
// layout engine and the caller's submission step, plus the presentation host
// boundary it drives.

pub mod host;
pub mod workflow;

pub use host::{HeadlessHost, PresentationHost};
pub use runsheet_layout::artifact::{Artifact, ObjectUrl, ObjectUrlRegistry};
pub use workflow::{ConfirmDecision, PrintWorkflow, WorkflowHandle, WorkflowState};
