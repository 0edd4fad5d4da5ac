use std::path::PathBuf;

use clap::{Parser, Subcommand};
use regula_core::Role;

use crate::commands::{
    CatalogCommands, DocumentCommands, LedgerCommands, PropertyCommands, ReportCommands,
};

/// Track properties through the regularization workflow
///
/// Regula keeps a catalog of regularization steps, registers properties and
/// tracks the progress of every step on every property, flagging work that
/// runs past its estimated duration.
#[derive(Parser)]
#[command(version, about, name = "regula")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/regula/regula.db
    #[arg(long, global = true, env = "REGULA_DATABASE_FILE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// ID of the user performing the operation, recorded on created records
    #[arg(long, global = true, env = "REGULA_ACTOR", default_value_t = 1)]
    pub actor: u64,

    /// Role of the acting user (admin, manager, operator, viewer)
    #[arg(long, global = true, env = "REGULA_ROLE", default_value = "admin")]
    pub role: Role,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Command groups of the Regula CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage registered properties
    #[command(alias = "p")]
    Property {
        #[command(subcommand)]
        command: PropertyCommands,
    },
    /// Manage the catalog of workflow steps
    #[command(alias = "c")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Track step progress on properties
    #[command(alias = "l")]
    Ledger {
        #[command(subcommand)]
        command: LedgerCommands,
    },
    /// Manage documents attached to step records
    #[command(alias = "d")]
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Progress, overdue and dashboard reports
    #[command(alias = "r")]
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}
