use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tripdesk")]
#[command(about = "Travel agency record management: clients, airlines, flights", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the records file (defaults to the user data directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new record
    #[command(alias = "c")]
    Create {
        /// Record kind: client, airline, or flight
        kind: String,

        /// Field values as key=value pairs (e.g. name="John Doe")
        #[arg(value_name = "KEY=VALUE", num_args = 0..)]
        fields: Vec<String>,
    },

    /// Update fields of an existing record
    #[command(alias = "u")]
    Update {
        /// Id of the record to update
        id: i64,

        /// Field values as key=value pairs (the record's type cannot change)
        #[arg(value_name = "KEY=VALUE", required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Delete a record by id
    #[command(alias = "rm")]
    Delete {
        /// Id of the record to delete
        id: i64,
    },

    /// Look up a single record by id
    #[command(alias = "s")]
    Search {
        /// Id of the record (non-numeric input reports not found)
        id: String,
    },

    /// List records
    #[command(alias = "ls")]
    List {
        /// Only show records of this kind
        #[arg(short, long)]
        kind: Option<String>,
    },
}
