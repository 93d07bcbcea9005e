// crates/clusterview-core/src/runtime/commands.rs
// ============================================================================
// Module: Tool Command Builders
// Description: Argument-vector construction for cluster manager tools.
// Purpose: Keep tool paths configurable and arguments out of shell strings.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`ToolCommands`] maps each core operation onto a [`CommandLine`]. Tool
//! paths come from configuration; request-derived values (node identifiers,
//! attribute names and values) are always separate arguments. Attribute
//! names and values use the `--option=value` form so a value that starts
//! with `-` is never read as a flag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use crate::interfaces::CommandLine;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default path of the cluster attribute tool.
pub const DEFAULT_ATTRIBUTE_TOOL: &str = "/usr/sbin/crm_attribute";
/// Default path of the cluster shell.
pub const DEFAULT_CLUSTER_SHELL: &str = "/usr/sbin/pcs";
/// Default path of the scheduler metadata tool.
pub const DEFAULT_METADATA_TOOL: &str = "/usr/libexec/pacemaker/pacemaker-schedulerd";

// ============================================================================
// SECTION: Tool Commands
// ============================================================================

/// Paths of the external tools used by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommands {
    /// Attribute query/update tool.
    pub attribute_tool: PathBuf,
    /// Cluster shell used for status and constraint listings.
    pub cluster_shell: PathBuf,
    /// Tool that prints cluster property metadata XML.
    pub metadata_tool: PathBuf,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            attribute_tool: PathBuf::from(DEFAULT_ATTRIBUTE_TOOL),
            cluster_shell: PathBuf::from(DEFAULT_CLUSTER_SHELL),
            metadata_tool: PathBuf::from(DEFAULT_METADATA_TOOL),
        }
    }
}

impl ToolCommands {
    /// Lists online and offline nodes.
    #[must_use]
    pub fn list_nodes(&self) -> CommandLine {
        CommandLine::new(&self.cluster_shell).args(["status", "nodes"])
    }

    /// Lists location constraints that reference a node.
    #[must_use]
    pub fn location_constraints(&self, node_id: &str) -> CommandLine {
        CommandLine::new(&self.cluster_shell)
            .args(["constraint", "location", "show", "nodes"])
            .arg(node_id)
    }

    /// Queries the current value of a cluster property.
    #[must_use]
    pub fn get_attribute(&self, config_key: &str) -> CommandLine {
        CommandLine::new(&self.attribute_tool).arg("--query").arg(format!("--name={config_key}"))
    }

    /// Sets a cluster property.
    #[must_use]
    pub fn set_attribute(&self, config_key: &str, value: &str) -> CommandLine {
        CommandLine::new(&self.attribute_tool)
            .arg(format!("--name={config_key}"))
            .arg(format!("--update={value}"))
    }

    /// Removes a cluster property so its default applies again.
    #[must_use]
    pub fn delete_attribute(&self, config_key: &str) -> CommandLine {
        CommandLine::new(&self.attribute_tool).arg(format!("--name={config_key}")).arg("--delete")
    }

    /// Prints cluster property metadata XML.
    #[must_use]
    pub fn metadata(&self) -> CommandLine {
        CommandLine::new(&self.metadata_tool).arg("metadata")
    }
}
