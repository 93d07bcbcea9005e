// crates/clusterview-core/src/core/node.rs
// ============================================================================
// Module: Cluster Node Records
// Description: Node identity, membership status, and location dependencies.
// Purpose: Provide immutable per-request records parsed from tool output.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Node records are created per request from parsed status text and never
//! persisted. A [`NodeStatus`] keeps the online and offline identifier lists in
//! source order; [`DependencySets`] holds the allowed and disallowed
//! identifiers parsed from a location constraint listing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Node
// ============================================================================

/// Cluster member host.
///
/// # Invariants
/// - `active` reflects which status list the identifier appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Cluster-assigned node identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Host name used to reach the node.
    pub hostname: String,
    /// True when the node was listed as online.
    pub active: bool,
}

impl Node {
    /// Builds a node record from a bare status identifier.
    #[must_use]
    pub fn from_identifier(identifier: &str, active: bool) -> Self {
        Self {
            id: identifier.to_string(),
            name: identifier.to_string(),
            hostname: identifier.to_string(),
            active,
        }
    }
}

// ============================================================================
// SECTION: Node Status
// ============================================================================

/// Online and offline node identifiers from a node listing.
///
/// # Invariants
/// - Both sequences preserve source order; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeStatus {
    /// Identifiers listed as online.
    pub online: Vec<String>,
    /// Identifiers listed as offline.
    pub offline: Vec<String>,
}

impl NodeStatus {
    /// Returns true when no node identifiers are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.online.is_empty() && self.offline.is_empty()
    }

    /// Converts the identifiers into node records, online nodes first.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.online
            .iter()
            .map(|id| Node::from_identifier(id, true))
            .chain(self.offline.iter().map(|id| Node::from_identifier(id, false)))
            .collect()
    }
}

// ============================================================================
// SECTION: Dependency Sets
// ============================================================================

/// Location constraint dependencies for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DependencySets {
    /// Identifiers allowed to run on the node, in source order.
    pub allowed: Vec<String>,
    /// Identifiers not allowed to run on the node, in source order.
    pub disallowed: Vec<String>,
}
