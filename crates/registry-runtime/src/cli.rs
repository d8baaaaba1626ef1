//! Command-line interface of `stockroom-registry`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stockroom-registry")]
#[command(about = "Administer the Stockroom client registry")]
#[command(version)]
pub struct Cli {
    /// Snapshot file for the file backend, or directory for RocksDB
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    /// Identity recorded as the acting user (falls back to SR_ACTING_USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Emit JSON formatted logs on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Print Prometheus metrics on stderr after the command
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// JSON snapshot rewritten after every commit
    File,
    /// Nothing persisted; useful for dry runs
    Memory,
    /// RocksDB optimistic transactions (requires the `rocksdb` feature)
    Rocksdb,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new client and print its ID
    Create(CreateArgs),
    /// Edit fields of an existing client
    Update(UpdateArgs),
    /// Mark a client active
    Activate(ReasonArgs),
    /// Mark a client inactive
    Deactivate(ReasonArgs),
    /// Delete a client; its ID is never reissued
    Delete(ReasonArgs),
    /// Show one client
    Show { client_id: String },
    /// Look a client up by legal ID, in any formatting
    Find { legal_id: String },
    /// List clients ordered by name
    List(ListArgs),
    /// Show the audit trail of a client
    Audit { client_id: String },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub legal_id: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub client_id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub legal_id: Option<String>,
    #[arg(long, conflicts_with = "clear_email")]
    pub email: Option<String>,
    #[arg(long)]
    pub clear_email: bool,
    #[arg(long, conflicts_with = "clear_phone")]
    pub phone: Option<String>,
    #[arg(long)]
    pub clear_phone: bool,
    #[arg(long, conflicts_with = "clear_address")]
    pub address: Option<String>,
    #[arg(long)]
    pub clear_address: bool,
    #[arg(long, conflicts_with = "clear_contact")]
    pub contact: Option<String>,
    #[arg(long)]
    pub clear_contact: bool,
}

#[derive(Args, Debug)]
pub struct ReasonArgs {
    pub client_id: String,
    #[arg(long, default_value = "")]
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only active clients
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    /// Only inactive clients
    #[arg(long)]
    pub inactive: bool,
    /// Only names starting with this prefix (accents and case ignored)
    #[arg(long)]
    pub prefix: Option<String>,
}

impl Command {
    /// Whether the command writes to the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Create(_)
                | Command::Update(_)
                | Command::Activate(_)
                | Command::Deactivate(_)
                | Command::Delete(_)
        )
    }
}
