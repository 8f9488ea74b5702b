// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations. Each returns a JSON summary for stdout.

use std::path::Path;
use std::sync::Arc;

use runsheet_core::error::{ReportError, Result};
use runsheet_core::{EngineConfig, ReportRecord};
use runsheet_workflow::{HeadlessHost, ObjectUrlRegistry, PrintWorkflow, WorkflowState};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::cli::{InitConfigArgs, RenderArgs, ValidateArgs};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub path: String,
    pub pages: usize,
    pub bytes: usize,
    pub sha256: String,
    pub state: WorkflowState,
}

fn load_record(path: &Path) -> Result<ReportRecord> {
    let data = std::fs::read_to_string(path)?;
    let record: ReportRecord = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "record loaded");
    Ok(record)
}

pub async fn render(config: &EngineConfig, args: &RenderArgs) -> Result<RenderSummary> {
    let record = load_record(&args.record)?;

    let mut options = config.render.clone();
    args.apply(&mut options);
    if let Some(signed) = &args.signed {
        let bytes = std::fs::read(signed).map_err(|e| {
            ReportError::Merge(format!("cannot read {}: {e}", signed.display()))
        })?;
        options = options.with_append_document(bytes);
    }

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let registry = ObjectUrlRegistry::new();
    let host = Arc::new(HeadlessHost::new(out_dir, registry.clone()));
    let workflow = PrintWorkflow::new(host.clone(), registry)
        .requiring_signed_attachment(config.require_signed_attachment);
    workflow.on_confirm(|decision| {
        info!(
            confirmed = decision.confirmed(),
            timestamp = decision.timestamp(),
            "operator decision"
        );
    });

    let artifact = workflow.generate(&record, &options).await?;
    workflow.download()?;
    if args.confirm {
        workflow.confirm()?;
    }

    let path = host
        .saved()
        .last()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    Ok(RenderSummary {
        path,
        pages: artifact.page_count(),
        bytes: artifact.size(),
        sha256: artifact.sha256().to_string(),
        state: workflow.state(),
    })
}

pub fn validate(args: &ValidateArgs) -> Result<serde_json::Value> {
    let record = load_record(&args.record)?;
    record.validate()?;
    Ok(json!({ "valid": true }))
}

pub fn init_config(config: &EngineConfig, args: &InitConfigArgs) -> Result<serde_json::Value> {
    config.save(&args.path)?;
    info!(path = %args.path.display(), "config written");
    Ok(json!({ "written": args.path.display().to_string() }))
}
