//! Regula CLI Application
//!
//! Command-line interface for the property regularization workflow.

mod args;
mod cli;
mod commands;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use regula_core::{params::ListProperties, Actor, WorkflowBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        json,
        actor,
        role,
        command,
    } = Args::parse();

    let workflow = WorkflowBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize workflow")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(workflow, renderer, Actor::new(actor, role), json);

    info!("Regula started as user {actor} ({role})");

    match command {
        Some(Property { command }) => cli.handle_property_command(command).await,
        Some(Catalog { command }) => cli.handle_catalog_command(command).await,
        Some(Ledger { command }) => cli.handle_ledger_command(command).await,
        Some(Document { command }) => cli.handle_document_command(command).await,
        Some(Report { command }) => cli.handle_report_command(command).await,
        None => cli.list_properties(ListProperties::default()).await,
    }
}
