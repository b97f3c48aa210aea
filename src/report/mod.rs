//! Rendering of dashboard views to Markdown and JSON.

pub mod generator;

pub use generator::{
    generate_admin_markdown, generate_curator_markdown, generate_groups_markdown,
    generate_json, generate_questions_markdown, AdminView, CuratorView,
};
