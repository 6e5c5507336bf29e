//! Journal replay

use colored::*;
use names_registry::{EventEnvelope, NameRegistry, Namespace, RegistryEvent};

use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};

/// Print every journaled event after `since`.
pub async fn execute(registry: &NameRegistry, since: u64, format: OutputFormat) -> CliResult<()> {
    let events = registry.events_since(since).await;
    match format {
        OutputFormat::Json => print_json(&events),
        OutputFormat::Table => {
            if events.is_empty() {
                println!("{}", "No events".dimmed());
            }
            for envelope in &events {
                print_event(envelope, registry.namespace());
            }
            Ok(())
        }
    }
}

fn print_event(envelope: &EventEnvelope, namespace: &Namespace) {
    let time = envelope.emitted_at.format("%Y-%m-%d %H:%M:%S");
    let subject = envelope
        .event
        .name()
        .map(|name| namespace.qualified(name))
        .unwrap_or_default();
    let detail = match &envelope.event {
        RegistryEvent::Registered { owner, .. } => format!("{} -> {}", subject, owner),
        RegistryEvent::Updated { record, avatar, .. } => {
            format!("{} record={:?} avatar={:?}", subject, record, avatar)
        }
        RegistryEvent::Withdrawn { amount, to } => format!("{} -> {}", amount, to),
    };

    println!(
        "{:>6} {} {:<10} {}",
        envelope.sequence,
        time.to_string().dimmed(),
        envelope.event.kind().blue(),
        detail
    );
}
