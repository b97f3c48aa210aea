//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pulsecheck - survey dashboard client
///
/// Submit anonymous group-climate answers, view curator statistics,
/// and manage faculties/groups as an administrator.
///
/// Examples:
///   pulsecheck questions
///   pulsecheck submit --group 3 --answer comfort=4 --answer open_feedback="всё отлично"
///   pulsecheck curator --group 3
///   pulsecheck admin
///   pulsecheck admin delete-group 7 --yes
///   pulsecheck init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the survey service API
    ///
    /// Can also be set via PULSECHECK_API_URL or .pulsecheck.toml.
    #[arg(long, value_name = "URL", env = "PULSECHECK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .pulsecheck.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the survey questions
    Questions,

    /// List the groups a survey can be submitted for
    Groups,

    /// Submit survey answers for a group (anonymous)
    Submit {
        /// Group id to submit for
        #[arg(short, long, value_name = "ID")]
        group: i64,

        /// Answer as code=value; repeat per question
        ///
        /// Numeric questions take 1..=5, text questions take free text.
        /// Example: --answer comfort=4 --answer open_feedback="текст"
        #[arg(short, long = "answer", value_name = "CODE=VALUE")]
        answers: Vec<String>,
    },

    /// Curator dashboard: aggregated statistics for one of your groups
    Curator {
        /// Group id to show (defaults to your first group)
        #[arg(short, long, value_name = "ID")]
        group: Option<i64>,

        /// Also fetch the rendered HTML report and save it to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Admin dashboard and faculty/group management
    Admin {
        #[command(subcommand)]
        action: Option<AdminCommand>,
    },

    /// Generate a default .pulsecheck.toml configuration file
    InitConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Create a faculty
    CreateFaculty {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a faculty
    UpdateFaculty {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a faculty (asks for confirmation)
    DeleteFaculty {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Create a group
    CreateGroup {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "ID")]
        faculty_id: i64,
        /// Year of study (1..=6)
        #[arg(long)]
        year: i32,
    },

    /// Update a group
    UpdateGroup {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_name = "ID")]
        faculty_id: Option<i64>,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete a group (asks for confirmation)
    DeleteGroup {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Output format for rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Submit { answers, .. } => {
                if answers.is_empty() {
                    return Err("At least one --answer is required".to_string());
                }
                for answer in answers {
                    if !answer.contains('=') {
                        return Err(format!(
                            "Answer '{}' is not in code=value form",
                            answer
                        ));
                    }
                }
            }
            Command::Admin {
                action: Some(AdminCommand::CreateGroup { year, .. }),
            } => {
                if !(1..=6).contains(year) {
                    return Err("Year must be between 1 and 6".to_string());
                }
            }
            Command::Admin {
                action:
                    Some(AdminCommand::UpdateGroup {
                        year: Some(year), ..
                    }),
            } => {
                if !(1..=6).contains(year) {
                    return Err("Year must be between 1 and 6".to_string());
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
