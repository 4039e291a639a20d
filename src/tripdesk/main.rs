use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use flexi_logger::Logger;
use serde_json::Value;
use tripdesk::codec::RawRecord;
use tripdesk::error::{Result, TripdeskError};
use tripdesk::model::RecordType;
use tripdesk::store::{RecordStore, RECORDS_FILE};

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .ok();

    let cli = Cli::parse();
    let mut store = open_store(&cli)?;

    match cli.command {
        Some(Commands::Create { kind, fields }) => handle_create(&mut store, &kind, &fields),
        Some(Commands::Update { id, fields }) => handle_update(&mut store, id, &fields),
        Some(Commands::Delete { id }) => handle_delete(&mut store, id),
        Some(Commands::Search { id }) => handle_search(&store, &id),
        Some(Commands::List { kind }) => handle_list(&store, kind.as_deref()),
        None => handle_list(&store, None),
    }
}

fn open_store(cli: &Cli) -> Result<RecordStore> {
    let path = match &cli.data_file {
        Some(path) => path.clone(),
        None => {
            let proj_dirs = ProjectDirs::from("com", "tripdesk", "tripdesk")
                .ok_or_else(|| TripdeskError::Api("Could not determine data dir".into()))?;
            proj_dirs.data_dir().join(RECORDS_FILE)
        }
    };
    RecordStore::open(path)
}

fn handle_create(store: &mut RecordStore, kind: &str, fields: &[String]) -> Result<()> {
    let data = parse_fields(fields)?;
    let record = store.create_record(kind, data)?;
    println!(
        "{}",
        format!("Created {} record with id {}", record.record_type(), record.id()).green()
    );
    Ok(())
}

fn handle_update(store: &mut RecordStore, id: i64, fields: &[String]) -> Result<()> {
    let data = parse_fields(fields)?;
    if store.update_record(id, data)? {
        println!("{}", format!("Updated record {}", id).green());
    } else {
        println!("{}", format!("No record with id {}", id).yellow());
    }
    Ok(())
}

fn handle_delete(store: &mut RecordStore, id: i64) -> Result<()> {
    store.delete_record(id)?;
    println!("{}", format!("Deleted record {}", id).green());
    Ok(())
}

fn handle_search(store: &RecordStore, id: &str) -> Result<()> {
    match store.search_record(id) {
        Some(record) => print_record(record)?,
        None => println!("{}", format!("No record with id {}", id).yellow()),
    }
    Ok(())
}

fn handle_list(store: &RecordStore, kind: Option<&str>) -> Result<()> {
    let filter = kind.map(str::parse::<RecordType>).transpose()?;
    let records = store.get_all_records(filter);

    for record in &records {
        print_record(record)?;
    }
    let label = match filter {
        Some(kind) => format!("{} {} record(s)", records.len(), kind),
        None => format!("{} record(s)", records.len()),
    };
    println!("{}", label.dimmed());
    Ok(())
}

fn print_record(record: &RawRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Parse `key=value` arguments into a record payload. Values stay strings;
/// the store coerces id fields to integers itself.
fn parse_fields(fields: &[String]) -> Result<RawRecord> {
    let mut data = RawRecord::new();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(TripdeskError::Api(format!(
                "Invalid field '{}' (expected key=value)",
                field
            )));
        };
        data.insert(key.trim().to_string(), Value::String(value.to_string()));
    }
    Ok(data)
}
