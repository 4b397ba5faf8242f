use console::style;

use crate::types::{Project, ProjectStatus};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `key: value` line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(format!("{}:", key)).dim(), value);
    }

    /// One checkpoint line: `[ 40%] index.html`
    pub fn checkpoint(&self, progress: u8, label: &str) {
        println!("  {} {}", style(format!("[{:>3}%]", progress)).cyan(), label);
    }

    pub fn status_badge(&self, status: ProjectStatus) -> String {
        match status {
            ProjectStatus::Processing => style(status.as_str()).yellow().to_string(),
            ProjectStatus::Completed => style(status.as_str()).green().to_string(),
            ProjectStatus::Failed => style(status.as_str()).red().to_string(),
        }
    }

    /// Summary table row for `list`
    pub fn project_row(&self, project: &Project) {
        println!(
            "  {:<32} {:<20} {:>4}%  {}",
            project.project_name,
            self.status_badge(project.status),
            project.progress,
            style(project.updated_at.format("%Y-%m-%d %H:%M").to_string()).dim()
        );
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
