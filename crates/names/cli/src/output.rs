//! Output formatting utilities

use colored::*;
use names_registry::{NameRecord, Namespace};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Table row for record display
#[derive(Debug, Tabled)]
pub struct RecordRow {
    /// Registration index
    pub id: u64,
    /// Fully qualified name
    pub name: String,
    pub owner: String,
    pub record: String,
    pub avatar: String,
    /// Registration time
    pub registered: String,
}

impl RecordRow {
    pub fn new(record: &NameRecord, namespace: &Namespace) -> Self {
        Self {
            id: record.id,
            name: namespace.qualified(&record.name),
            owner: record.owner.to_string(),
            record: record.record.clone(),
            avatar: record.avatar.clone(),
            registered: record.registered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Two-column row for summaries
#[derive(Debug, Tabled)]
pub struct FieldRow {
    pub field: &'static str,
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &'static str, value: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Print table rows, or `data` as JSON.
pub fn print_output<T, R>(data: &T, rows: Vec<R>, format: OutputFormat) -> CliResult<()>
where
    T: Serialize + ?Sized,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(data),
    }
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
