//! Admin dashboard controller and faculty/group management.
//!
//! The dashboard runs as a two-phase pipeline: one awaited
//! authorization check, then a fixed fan-out of independent fetches
//! joined before rendering. A failed dataset is logged and its section
//! rendered as unavailable; it never takes the other sections down.

use crate::api::ApiClient;
use crate::auth::{self, AccessDecision, ADMIN_POLICY};
use crate::cli::AdminCommand;
use crate::dashboard::{report_gate_failure, Output, EXIT_OK};
use crate::report::{self, AdminView};
use anyhow::{Context, Result};
use futures::join;
use serde_json::json;
use std::io::Write;
use tracing::{info, warn};

/// Run an admin action (dashboard by default). Returns the exit code.
pub async fn run(client: &ApiClient, action: Option<AdminCommand>, output: &Output) -> Result<i32> {
    let decision = auth::authorize(client, &ADMIN_POLICY, "/admin").await;

    let identity = match decision {
        AccessDecision::Granted(ref identity) => identity.clone(),
        ref other => return Ok(report_gate_failure(other, client)),
    };
    info!(subject = %identity.subject_id, "admin access granted");

    match action {
        None => show_dashboard(client, output).await,
        Some(command) => manage(client, command, output).await,
    }
}

/// Fetch the three admin datasets concurrently and render them together.
async fn show_dashboard(client: &ApiClient, output: &Output) -> Result<i32> {
    let spinner = output.spinner("Загрузка данных...");

    let (statistics, faculties, groups) = join!(
        client.admin_statistics(),
        client.admin_faculties(),
        client.admin_groups(),
    );

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    // Partial-failure isolation: a failed dataset only blanks its section.
    let view = AdminView {
        statistics: statistics
            .map_err(|e| warn!("failed to load overall statistics: {}", e))
            .ok(),
        faculties: faculties
            .map_err(|e| warn!("failed to load faculties: {}", e))
            .ok()
            .map(|list| list.faculties),
        groups: groups
            .map_err(|e| warn!("failed to load groups: {}", e))
            .ok()
            .map(|list| list.groups),
    };

    let markdown = report::generate_admin_markdown(&view);
    output.emit(&view, markdown)?;

    Ok(EXIT_OK)
}

/// Execute a CRUD command against the admin endpoints.
async fn manage(client: &ApiClient, command: AdminCommand, output: &Output) -> Result<i32> {
    match command {
        AdminCommand::CreateFaculty { name, description } => {
            client
                .create_faculty(&json!({ "name": name, "description": description }))
                .await
                .context("Failed to create faculty")?;
            done(output, "Faculty created");
        }
        AdminCommand::UpdateFaculty {
            id,
            name,
            description,
        } => {
            client
                .update_faculty(id, &json!({ "name": name, "description": description }))
                .await
                .with_context(|| format!("Failed to update faculty {}", id))?;
            done(output, "Faculty updated");
        }
        AdminCommand::DeleteFaculty { id, yes } => {
            if !confirm(&format!("Удалить факультет {}?", id), yes)? {
                println!("Отменено.");
                return Ok(EXIT_OK);
            }
            client
                .delete_faculty(id)
                .await
                .with_context(|| format!("Failed to delete faculty {}", id))?;
            done(output, "Faculty deleted");
        }
        AdminCommand::CreateGroup {
            name,
            faculty_id,
            year,
        } => {
            client
                .create_group(&json!({ "name": name, "faculty_id": faculty_id, "year": year }))
                .await
                .context("Failed to create group")?;
            done(output, "Group created");
        }
        AdminCommand::UpdateGroup {
            id,
            name,
            faculty_id,
            year,
        } => {
            client
                .update_group(
                    id,
                    &json!({ "name": name, "faculty_id": faculty_id, "year": year }),
                )
                .await
                .with_context(|| format!("Failed to update group {}", id))?;
            done(output, "Group updated");
        }
        AdminCommand::DeleteGroup { id, yes } => {
            if !confirm(&format!("Удалить группу {}?", id), yes)? {
                println!("Отменено.");
                return Ok(EXIT_OK);
            }
            client
                .delete_group(id)
                .await
                .with_context(|| format!("Failed to delete group {}", id))?;
            done(output, "Group deleted");
        }
    }

    Ok(EXIT_OK)
}

fn done(output: &Output, message: &str) {
    if !output.quiet {
        println!("✅ {}", message);
    }
}

/// Synchronous confirmation gating destructive requests. The request is
/// not issued unless the user answers yes (or passed --yes).
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;

    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes" || answer == "д" || answer == "да")
}
