//! Dashboard view controllers.
//!
//! Each controller is one protected-view "mount": it runs the access
//! gate, fetches its datasets only after a grant, and renders through
//! the report module. Nothing is shared or cached across invocations.

pub mod admin;
pub mod curator;
pub mod survey;

use crate::api::ApiClient;
use crate::auth::AccessDecision;
use crate::cli::OutputFormat;
use crate::report;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Exit code for success.
pub const EXIT_OK: i32 = 0;
/// Exit code when the access gate denies the view.
pub const EXIT_DENIED: i32 = 2;
/// Exit code when a login is required first.
pub const EXIT_LOGIN_REQUIRED: i32 = 3;

/// Where and how rendered views are written.
#[derive(Debug, Clone)]
pub struct Output {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
    pub quiet: bool,
}

impl Output {
    /// Write a rendered view: markdown as built, or the view serialized
    /// as JSON, to the configured file or stdout.
    pub fn emit<T: Serialize>(&self, view: &T, markdown: String) -> Result<()> {
        let text = match self.format {
            OutputFormat::Markdown => markdown,
            OutputFormat::Json => report::generate_json(view)?,
        };

        match &self.file {
            Some(path) => {
                std::fs::write(path, &text)
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                if !self.quiet {
                    println!("✅ Output saved to: {}", path.display());
                }
            }
            None => println!("{}", text),
        }

        Ok(())
    }

    /// Spinner shown while network fetches run (suppressed in quiet mode).
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Handle a non-granted gate decision. Returns the process exit code.
///
/// Denial renders an access-denied message without redirecting; a
/// missing session prints the login URL for the view's return path.
pub fn report_gate_failure(decision: &AccessDecision, client: &ApiClient) -> i32 {
    match decision {
        AccessDecision::Granted(_) => EXIT_OK,
        AccessDecision::Denied => {
            eprintln!("⛔ Доступ запрещён: у вашего аккаунта нет необходимой роли.");
            eprintln!("   Обратитесь к администратору.");
            EXIT_DENIED
        }
        AccessDecision::RedirectToLogin { return_path } => {
            eprintln!("🔑 Требуется вход. Откройте в браузере:");
            eprintln!("   {}", client.login_url(return_path));
            EXIT_LOGIN_REQUIRED
        }
    }
}
