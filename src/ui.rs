//! Terminal output helpers

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{Width, Height, terminal_size};

use crate::agent::ProgressSink;

pub fn print_header(title: &str, model: &str, profile: &str) {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    let width = width.0 as usize;

    let line = "─".repeat(width);
    println!("{}", line.black().bold());

    let name = title.yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}", name, version);

    let info = format!("  {}  •  {} profile", model, profile).cyan();
    println!("{}", info);

    println!("{}", line.black().bold());
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠️ ".yellow().bold(), msg.yellow());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "❌".red().bold(), msg.red());
}

fn format_notice(msg: &str) -> String {
    format!("  {} {}", "ℹ".blue().bold(), msg.dimmed())
}

/// Spinner shown while a submission is processed.
///
/// Progress notices are printed above the spinner line.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(msg: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for Spinner {
    fn notice(&self, text: &str) {
        self.bar.println(format_notice(text));
    }
}
