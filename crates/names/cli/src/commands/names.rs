//! Name registration and lookup commands

use clap::Args;
use names_registry::{Amount, Identity, NameRegistry, RegisterRequest, UpdateRecordRequest};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{print_json, print_output, print_success, OutputFormat, RecordRow};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Name to claim, without the namespace suffix
    pub name: String,

    /// Identity claiming the name
    #[arg(long = "as")]
    pub caller: Identity,

    #[arg(long, default_value = "")]
    pub record: String,

    #[arg(long, default_value = "")]
    pub avatar: String,

    /// Payment to attach (default: the name's price)
    #[arg(long)]
    pub value: Option<Amount>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub name: String,

    /// Owner of the name
    #[arg(long = "as")]
    pub caller: Identity,

    #[arg(long)]
    pub record: String,

    #[arg(long)]
    pub avatar: String,
}

#[derive(Serialize)]
struct PriceOutput<'a> {
    name: &'a str,
    qualified: String,
    price: Amount,
}

#[derive(Serialize)]
struct OwnerOutput<'a> {
    name: &'a str,
    owner: Identity,
}

pub async fn register(
    registry: &NameRegistry,
    args: RegisterArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let value = match args.value {
        Some(value) => value,
        None => registry.price(&args.name)?,
    };

    let request = RegisterRequest::new(args.name, value, args.caller)
        .with_record(args.record)
        .with_avatar(args.avatar);
    let record = registry.register(request).await?;

    match format {
        OutputFormat::Table => {
            print_success(&format!(
                "Registered {} to {} for {}",
                registry.namespace().qualified(&record.name),
                record.owner,
                value
            ));
            Ok(())
        }
        OutputFormat::Json => print_json(&record),
    }
}

pub async fn update(registry: &NameRegistry, args: UpdateArgs, format: OutputFormat) -> CliResult<()> {
    let record = registry
        .update_record(UpdateRecordRequest {
            name: args.name,
            record: args.record,
            avatar: args.avatar,
            caller: args.caller,
        })
        .await?;

    match format {
        OutputFormat::Table => {
            print_success(&format!(
                "Updated {}",
                registry.namespace().qualified(&record.name)
            ));
            Ok(())
        }
        OutputFormat::Json => print_json(&record),
    }
}

pub async fn get(registry: &NameRegistry, name: &str, format: OutputFormat) -> CliResult<()> {
    let record = registry.get_record(name).await?;
    let rows = vec![RecordRow::new(&record, registry.namespace())];
    print_output(&record, rows, format)
}

pub async fn owner(registry: &NameRegistry, name: &str, format: OutputFormat) -> CliResult<()> {
    let owner = registry.owner_of(name).await?;
    match format {
        OutputFormat::Table => {
            println!("{}", owner);
            Ok(())
        }
        OutputFormat::Json => print_json(&OwnerOutput { name, owner }),
    }
}

pub async fn list(registry: &NameRegistry, format: OutputFormat) -> CliResult<()> {
    let records = registry.list_all().await;
    let rows = records
        .iter()
        .map(|record| RecordRow::new(record, registry.namespace()))
        .collect();
    print_output(&records, rows, format)
}

pub fn price(registry: &NameRegistry, name: &str, format: OutputFormat) -> CliResult<()> {
    let price = registry.price(name)?;
    match format {
        OutputFormat::Table => {
            println!("{}", price);
            Ok(())
        }
        OutputFormat::Json => print_json(&PriceOutput {
            name,
            qualified: registry.namespace().qualified(name),
            price,
        }),
    }
}
