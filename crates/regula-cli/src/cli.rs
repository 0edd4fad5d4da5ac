//! Command handlers of the Regula CLI.
//!
//! Every handler checks the acting user's capability, converts its clap
//! arguments into core parameters, calls the [`Workflow`] and prints the
//! result either as markdown through the [`TerminalRenderer`] or as JSON.

use std::fmt::Display;

use anyhow::{Context, Result};
use log::debug;
use regula_core::{
    display::{
        Documents, MonthlyCompletions, NeighborhoodCounts, OverdueEntries, Properties,
        RecentActivities, StepDefinitions, StepRecords,
    },
    params::{Id, ImportCatalog, ListOverdue, ListProperties},
    Actor, Capability, CreateResult, DeleteResult, OperationStatus, Role, UpdateResult, Workflow,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    commands::{CatalogCommands, DocumentCommands, LedgerCommands, PropertyCommands, ReportCommands},
    renderer::TerminalRenderer,
};

/// The acting user's role lacks the capability an operation needs.
#[derive(Debug, Error)]
#[error("Access denied: role '{role}' cannot {action}")]
pub struct AccessDenied {
    pub role: Role,
    pub action: &'static str,
}

pub struct Cli {
    workflow: Workflow,
    renderer: TerminalRenderer,
    actor: Actor,
    json: bool,
}

impl Cli {
    pub fn new(workflow: Workflow, renderer: TerminalRenderer, actor: Actor, json: bool) -> Self {
        Self {
            workflow,
            renderer,
            actor,
            json,
        }
    }

    fn require(&self, capability: Capability, action: &'static str) -> Result<()> {
        if self.actor.can(capability) {
            Ok(())
        } else {
            debug!(
                "Actor {} ({}) denied: {action}",
                self.actor.id, self.actor.role
            );
            Err(AccessDenied {
                role: self.actor.role,
                action,
            }
            .into())
        }
    }

    /// Prints `data` as JSON, or `markdown` through the renderer.
    fn output<T: Serialize>(&self, data: &T, markdown: impl Display) -> Result<()> {
        if self.json {
            let json =
                serde_json::to_string_pretty(data).context("Failed to serialize output")?;
            println!("{json}");
            Ok(())
        } else {
            self.renderer.render(&markdown.to_string())
        }
    }

    pub async fn handle_property_command(self, command: PropertyCommands) -> Result<()> {
        match command {
            PropertyCommands::Create(args) => {
                self.require(Capability::EditProperties, "create properties")?;
                let property = self
                    .workflow
                    .create_property(&args.into(), Some(self.actor.id))
                    .await
                    .context("Failed to create property")?;
                self.output(&property, CreateResult::new(property.clone()))
            }
            PropertyCommands::List(args) => self.list_properties(args.into()).await,
            PropertyCommands::Show(args) => {
                self.require(Capability::Read, "read properties")?;
                let id: Id = args.into();
                let property = self
                    .workflow
                    .get_property(&id)
                    .await
                    .context("Failed to get property")?
                    .with_context(|| format!("Property with ID {} not found", id.id))?;
                self.output(&property, &property)
            }
            PropertyCommands::Update(args) => {
                self.require(Capability::EditProperties, "update properties")?;
                let property = self
                    .workflow
                    .update_property(&args.into())
                    .await
                    .context("Failed to update property")?;
                self.output(&property, UpdateResult::new(property.clone()))
            }
            PropertyCommands::Delete(args) => {
                self.require(Capability::DeleteProperties, "delete properties")?;
                let property = self
                    .workflow
                    .delete_property(&args.into())
                    .await
                    .context("Failed to delete property")?;
                self.output(&property, DeleteResult::new(property.clone()))
            }
            PropertyCommands::Neighborhoods => {
                self.require(Capability::Read, "read properties")?;
                let neighborhoods = self
                    .workflow
                    .list_neighborhoods()
                    .await
                    .context("Failed to list neighborhoods")?;
                let markdown = if neighborhoods.is_empty() {
                    "No neighborhoods found.\n".to_string()
                } else {
                    neighborhoods.iter().map(|n| format!("- {n}\n")).collect()
                };
                self.output(&neighborhoods, markdown)
            }
        }
    }

    /// Lists properties; also the default when no command is given.
    pub async fn list_properties(self, params: ListProperties) -> Result<()> {
        self.require(Capability::Read, "read properties")?;
        let properties = self
            .workflow
            .list_properties(&params)
            .await
            .context("Failed to list properties")?;
        self.output(&properties, Properties(properties.clone()))
    }

    pub async fn handle_catalog_command(self, command: CatalogCommands) -> Result<()> {
        match command {
            CatalogCommands::Add(args) => {
                self.require(Capability::ManageCatalog, "edit the step catalog")?;
                let definition = self
                    .workflow
                    .create_step_definition(&args.into())
                    .await
                    .context("Failed to create step definition")?;
                self.output(&definition, CreateResult::new(definition.clone()))
            }
            CatalogCommands::List(args) => {
                self.require(Capability::Read, "read the step catalog")?;
                let definitions = self
                    .workflow
                    .list_step_definitions(&args.into())
                    .await
                    .context("Failed to list step definitions")?;
                self.output(&definitions, StepDefinitions(definitions.clone()))
            }
            CatalogCommands::Show(args) => {
                self.require(Capability::Read, "read the step catalog")?;
                let id: Id = args.into();
                let definition = self
                    .workflow
                    .get_step_definition(&id)
                    .await
                    .context("Failed to get step definition")?
                    .with_context(|| format!("Step definition with ID {} not found", id.id))?;
                self.output(&definition, &definition)
            }
            CatalogCommands::Update(args) => {
                self.require(Capability::ManageCatalog, "edit the step catalog")?;
                let definition = self
                    .workflow
                    .update_step_definition(&args.into())
                    .await
                    .context("Failed to update step definition")?;
                self.output(&definition, UpdateResult::new(definition.clone()))
            }
            CatalogCommands::Delete(args) => {
                self.require(Capability::DeleteStepDefinitions, "delete step definitions")?;
                let definition = self
                    .workflow
                    .delete_step_definition(&args.into())
                    .await
                    .context("Failed to delete step definition")?;
                self.output(&definition, DeleteResult::new(definition.clone()))
            }
            CatalogCommands::Reorder(args) => {
                self.require(Capability::ManageCatalog, "reorder the step catalog")?;
                let definitions = self
                    .workflow
                    .reorder_steps(&args.into())
                    .await
                    .context("Failed to reorder step definitions")?;
                let markdown = format!(
                    "{}\n{}",
                    OperationStatus::success("Step definitions reordered".to_string()),
                    StepDefinitions(definitions.clone())
                );
                self.output(&definitions, markdown)
            }
            CatalogCommands::Import(args) => {
                self.require(Capability::ManageCatalog, "import step definitions")?;
                let json = std::fs::read_to_string(&args.file)
                    .with_context(|| format!("Failed to read {}", args.file.display()))?;
                let batch = ImportCatalog::from_json(&json).context("Invalid catalog file")?;
                let definitions = self
                    .workflow
                    .import_catalog(&batch)
                    .await
                    .context("Failed to import step definitions")?;
                let markdown = format!(
                    "{}\n{}",
                    OperationStatus::success(format!(
                        "Imported {} step definition(s)",
                        definitions.len()
                    )),
                    StepDefinitions(definitions.clone())
                );
                self.output(&definitions, markdown)
            }
        }
    }

    pub async fn handle_ledger_command(self, command: LedgerCommands) -> Result<()> {
        match command {
            LedgerCommands::Track(args) => {
                self.require(Capability::UpdateProgress, "track steps")?;
                let entry = self
                    .workflow
                    .create_step_progress(&args.into(), Some(self.actor.id))
                    .await
                    .context("Failed to create step record")?;
                self.output(&entry, CreateResult::new(entry.clone()))
            }
            LedgerCommands::Update(args) => {
                self.require(Capability::UpdateProgress, "update step records")?;
                let entry = self
                    .workflow
                    .update_step_progress(&args.into())
                    .await
                    .context("Failed to update step record")?;
                self.output(&entry, UpdateResult::new(entry.clone()))
            }
            LedgerCommands::Show(args) => {
                self.require(Capability::Read, "read step records")?;
                let id: Id = args.into();
                let entry = self
                    .workflow
                    .get_step_progress(&id)
                    .await
                    .context("Failed to get step record")?
                    .with_context(|| format!("Step progress record with ID {} not found", id.id))?;
                self.output(&entry, &entry)
            }
            LedgerCommands::List(args) => {
                self.require(Capability::Read, "read step records")?;
                let entries = self
                    .workflow
                    .list_step_progress(&args.into())
                    .await
                    .context("Failed to list step records")?;
                self.output(&entries, StepRecords(entries.clone()))
            }
            LedgerCommands::Statuses => {
                let statuses = self.workflow.status_options();
                let markdown: String = statuses
                    .iter()
                    .map(|status| format!("- `{status}`: {}\n", status.label()))
                    .collect();
                self.output(&statuses, markdown)
            }
        }
    }

    pub async fn handle_document_command(self, command: DocumentCommands) -> Result<()> {
        match command {
            DocumentCommands::Attach(args) => {
                self.require(Capability::AttachDocuments, "attach documents")?;
                let document = self
                    .workflow
                    .attach_document(&args.into(), Some(self.actor.id))
                    .await
                    .context("Failed to attach document")?;
                self.output(&document, CreateResult::new(document.clone()))
            }
            DocumentCommands::List(args) => {
                self.require(Capability::Read, "read documents")?;
                let documents = self
                    .workflow
                    .list_documents(&args.into())
                    .await
                    .context("Failed to list documents")?;
                self.output(&documents, Documents(documents.clone()))
            }
            DocumentCommands::Show(args) => {
                self.require(Capability::Read, "read documents")?;
                let id: Id = args.into();
                let document = self
                    .workflow
                    .get_document(&id)
                    .await
                    .context("Failed to get document")?
                    .with_context(|| format!("Document with ID {} not found", id.id))?;
                self.output(&document, &document)
            }
            DocumentCommands::Update(args) => {
                self.require(Capability::AttachDocuments, "edit documents")?;
                let document = self
                    .workflow
                    .update_document(&args.into())
                    .await
                    .context("Failed to update document")?;
                self.output(&document, UpdateResult::new(document.clone()))
            }
            DocumentCommands::Remove(args) => {
                self.require(Capability::ManageDocuments, "remove documents")?;
                let document = self
                    .workflow
                    .remove_document(&args.into())
                    .await
                    .context("Failed to remove document")?;
                self.output(&document, DeleteResult::new(document.clone()))
            }
        }
    }

    pub async fn handle_report_command(self, command: ReportCommands) -> Result<()> {
        match command {
            ReportCommands::Progress(args) => {
                self.require(Capability::Read, "read progress")?;
                let progress = self
                    .workflow
                    .compute_progress(&args.into())
                    .await
                    .context("Failed to compute progress")?;
                self.output(&progress, &progress)
            }
            ReportCommands::Overdue(args) => {
                let params: ListOverdue = args.into();
                if params.property_id.is_some() {
                    self.require(Capability::Read, "read progress")?;
                } else {
                    self.require(Capability::ViewFleetReports, "view fleet-wide overdue steps")?;
                }
                let overdue = self
                    .workflow
                    .list_overdue(&params)
                    .await
                    .context("Failed to list overdue steps")?;
                self.output(&overdue, OverdueEntries(overdue.clone()))
            }
            ReportCommands::Statistics => {
                self.require(Capability::ViewFleetReports, "view statistics")?;
                let statistics = self
                    .workflow
                    .statistics()
                    .await
                    .context("Failed to compute statistics")?;
                self.output(&statistics, &statistics)
            }
            ReportCommands::Overview => {
                self.require(Capability::Read, "view the overview")?;
                let overview = self
                    .workflow
                    .overview()
                    .await
                    .context("Failed to compute overview")?;
                self.output(&overview, &overview)
            }
            ReportCommands::Neighborhoods => {
                self.require(Capability::Read, "view neighborhood counts")?;
                let counts = self
                    .workflow
                    .neighborhood_counts()
                    .await
                    .context("Failed to count properties per neighborhood")?;
                self.output(&counts, NeighborhoodCounts(counts.clone()))
            }
            ReportCommands::Monthly => {
                self.require(Capability::Read, "view monthly completions")?;
                let months = self
                    .workflow
                    .monthly_completions()
                    .await
                    .context("Failed to count monthly completions")?;
                self.output(&months, MonthlyCompletions(months.clone()))
            }
            ReportCommands::Activity(args) => {
                self.require(Capability::Read, "view recent activity")?;
                let activity = self
                    .workflow
                    .recent_activity(&args.into())
                    .await
                    .context("Failed to load recent activity")?;
                self.output(&activity, RecentActivities(activity.clone()))
            }
            ReportCommands::Performance => {
                self.require(Capability::ViewFleetReports, "view performance metrics")?;
                let metrics = self
                    .workflow
                    .performance()
                    .await
                    .context("Failed to compute performance metrics")?;
                self.output(&metrics, &metrics)
            }
        }
    }
}
