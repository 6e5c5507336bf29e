//! Custodied balance commands

use names_registry::{Identity, NameRegistry};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{print_json, print_output, print_success, FieldRow, OutputFormat};

#[derive(Serialize)]
struct WithdrawOutput {
    amount: names_registry::Amount,
    to: Identity,
}

pub async fn balance(registry: &NameRegistry, format: OutputFormat) -> CliResult<()> {
    let custody = registry.custody().await;
    let rows = vec![
        FieldRow::new("balance", custody.balance),
        FieldRow::new("total received", custody.total_received),
        FieldRow::new("total withdrawn", custody.total_withdrawn),
    ];
    print_output(&custody, rows, format)
}

pub async fn withdraw(
    registry: &NameRegistry,
    caller: Identity,
    format: OutputFormat,
) -> CliResult<()> {
    let amount = registry.withdraw(caller.clone()).await?;
    match format {
        OutputFormat::Table => {
            print_success(&format!("Withdrew {} to {}", amount, caller));
            println!(
                "  Total withdrawn: {} (payout credited in-process only)",
                registry.custody().await.total_withdrawn
            );
            Ok(())
        }
        OutputFormat::Json => print_json(&WithdrawOutput { amount, to: caller }),
    }
}
