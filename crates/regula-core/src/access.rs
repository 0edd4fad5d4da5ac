//! Actor context and role capabilities.
//!
//! The engine itself never checks roles. Boundary layers build an [`Actor`]
//! for the caller, check the [`Capability`] an operation needs with
//! [`Actor::can`], and pass the actor id into operations that record audit
//! fields.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Operator,
    /// Read-only access
    #[default]
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
        }
    }

    /// Whether this role is granted the given capability.
    pub fn allows(&self, capability: Capability) -> bool {
        use Capability::*;

        match capability {
            Read => true,
            EditProperties | UpdateProgress | AttachDocuments => {
                matches!(self, Role::Admin | Role::Manager | Role::Operator)
            }
            DeleteProperties | ManageCatalog | ManageDocuments | ViewFleetReports => {
                matches!(self, Role::Admin | Role::Manager)
            }
            DeleteStepDefinitions => matches!(self, Role::Admin),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "operator" => Ok(Role::Operator),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation classes gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    EditProperties,
    DeleteProperties,
    ManageCatalog,
    DeleteStepDefinitions,
    UpdateProgress,
    AttachDocuments,
    ManageDocuments,
    /// Fleet-wide overdue lists, statistics and performance metrics
    ViewFleetReports,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: u64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}
