//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use backoffice_core::AppError;
use backoffice_service::{Notice, NoticeLevel};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("Sin resultados.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a notice with a level marker
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("✓ {}", notice.message),
        NoticeLevel::Info => println!("• {}", notice.message),
        NoticeLevel::Error => eprintln!("✗ {}", notice.message),
    }
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("\n{title}");
    println!("{}", "─".repeat(title.chars().count()));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Map an error to the notice shown for it, logging it.
pub fn fail(fallback: &'static str) -> impl Fn(AppError) -> Notice {
    move |e| Notice::from_error(fallback, &e)
}

/// Ask for confirmation unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, Notice> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Notice::error(format!("No se pudo leer la confirmación: {e}")))
}
