//! Status enumerations for properties and ledger entries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overall regularization status of a property.
///
/// Informational only: it is edited directly and never derived from the
/// property's ledger entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegularizationStatus {
    #[default]
    Pending,
    InProgress,
    MunicipalRegistered,
    RegistryCompleted,
}

impl RegularizationStatus {
    /// All statuses in workflow order.
    pub const ALL: [RegularizationStatus; 4] = [
        RegularizationStatus::Pending,
        RegularizationStatus::InProgress,
        RegularizationStatus::MunicipalRegistered,
        RegularizationStatus::RegistryCompleted,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RegularizationStatus::Pending => "pending",
            RegularizationStatus::InProgress => "in_progress",
            RegularizationStatus::MunicipalRegistered => "municipal_registered",
            RegularizationStatus::RegistryCompleted => "registry_completed",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RegularizationStatus::Pending => "Pending",
            RegularizationStatus::InProgress => "In progress",
            RegularizationStatus::MunicipalRegistered => "Registered with the municipality",
            RegularizationStatus::RegistryCompleted => "Completed at the land registry",
        }
    }
}

impl FromStr for RegularizationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RegularizationStatus::Pending),
            "in_progress" | "inprogress" => Ok(RegularizationStatus::InProgress),
            "municipal_registered" => Ok(RegularizationStatus::MunicipalRegistered),
            "registry_completed" => Ok(RegularizationStatus::RegistryCompleted),
            _ => Err(format!("Invalid regularization status: {s}")),
        }
    }
}

/// Status of a single ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// Step has not been started yet
    #[default]
    NotStarted,

    /// Step is being worked on
    InProgress,

    /// Step has been completed
    Completed,

    /// Step is waiting on an external blocker
    Blocked,
}

impl ProgressStatus {
    /// All statuses in reporting order.
    pub const ALL: [ProgressStatus; 4] = [
        ProgressStatus::NotStarted,
        ProgressStatus::InProgress,
        ProgressStatus::Completed,
        ProgressStatus::Blocked,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "not_started",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Blocked => "blocked",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "Not started",
            ProgressStatus::InProgress => "In progress",
            ProgressStatus::Completed => "Completed",
            ProgressStatus::Blocked => "Blocked",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use regula_core::models::ProgressStatus;
    ///
    /// assert_eq!(ProgressStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(ProgressStatus::Blocked.with_icon(), "✗ Blocked");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ProgressStatus::Completed => "✓ Completed",
            ProgressStatus::InProgress => "➤ In Progress",
            ProgressStatus::NotStarted => "○ Not Started",
            ProgressStatus::Blocked => "✗ Blocked",
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_started" | "notstarted" => Ok(ProgressStatus::NotStarted),
            "in_progress" | "inprogress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            "blocked" => Ok(ProgressStatus::Blocked),
            _ => Err(format!("Invalid progress status: {s}")),
        }
    }
}
