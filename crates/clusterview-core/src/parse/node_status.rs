// crates/clusterview-core/src/parse/node_status.rs
// ============================================================================
// Module: Node Status Parser
// Description: Parser for the cluster shell's node listing.
// Purpose: Split node listing text into online and offline identifiers.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The node listing is expected to carry a header on line 1, online node
//! identifiers on line 2 and offline identifiers on line 3. Each data line
//! starts with a label token (`Online:`, `Offline:`) that is discarded.
//! Any listing that does not match this shape yields an empty status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::NodeStatus;
use crate::interfaces::CommandOutput;

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses a node listing, returning an empty status on nonzero exit.
#[must_use]
pub fn parse_node_status(output: &CommandOutput) -> NodeStatus {
    if !output.success() {
        return NodeStatus::default();
    }
    parse_node_status_text(&output.stdout)
}

/// Parses node listing text without regard to exit status.
///
/// Fewer than three lines yields an empty status.
#[must_use]
pub fn parse_node_status_text(text: &str) -> NodeStatus {
    let mut lines = text.lines().skip(1);
    let (Some(online), Some(offline)) = (lines.next(), lines.next()) else {
        return NodeStatus::default();
    };
    NodeStatus {
        online: identifiers(online),
        offline: identifiers(offline),
    }
}

/// Returns the whitespace-separated tokens after the leading label.
fn identifiers(line: &str) -> Vec<String> {
    line.split_whitespace().skip(1).map(ToString::to_string).collect()
}
