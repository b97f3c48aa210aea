//! Curator dashboard controller.
//!
//! Pipeline per invocation: access gate with the curator policy →
//! group list fetch → statistics fetch for the selected group →
//! aggregation → render. Protected fetches are only issued after the
//! gate grants.

use crate::api::ApiClient;
use crate::auth::{self, AccessDecision, CURATOR_POLICY};
use crate::dashboard::{report_gate_failure, Output, EXIT_OK};
use crate::report::{self, CuratorView};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

/// Run the curator view. Returns the process exit code.
pub async fn run(
    client: &ApiClient,
    group: Option<i64>,
    report_file: Option<&Path>,
    output: &Output,
) -> Result<i32> {
    let decision = auth::authorize(client, &CURATOR_POLICY, "/curator").await;

    let identity = match decision {
        AccessDecision::Granted(ref identity) => identity.clone(),
        ref other => return Ok(report_gate_failure(other, client)),
    };
    info!(subject = %identity.subject_id, "curator access granted");

    let spinner = output.spinner("Загрузка групп...");
    let groups = client
        .curator_groups()
        .await
        .context("Failed to load curator groups")?
        .groups;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let group_id = match group {
        Some(id) => {
            if !groups.iter().any(|g| g.id == id) {
                bail!("Group {} is not among your curated groups", id);
            }
            id
        }
        None => match groups.first() {
            Some(first) => first.id,
            None => {
                println!("У вас нет курируемых групп.");
                return Ok(EXIT_OK);
            }
        },
    };

    let spinner = output.spinner("Загрузка статистики...");
    let statistics = client
        .group_statistics(group_id)
        .await
        .with_context(|| format!("Failed to load statistics for group {}", group_id))?;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let view = CuratorView::from_statistics(statistics);
    let markdown = report::generate_curator_markdown(&view);
    output.emit(&view, markdown)?;

    // The rendered report is an opaque HTML blob; save it untouched.
    if let Some(path) = report_file {
        let html = client
            .group_report_html(group_id)
            .await
            .with_context(|| format!("Failed to fetch report for group {}", group_id))?;
        std::fs::write(path, &html)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if !output.quiet {
            println!("📄 Report saved to: {}", path.display());
        }
    }

    Ok(EXIT_OK)
}
