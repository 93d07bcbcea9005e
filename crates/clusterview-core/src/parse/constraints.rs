// crates/clusterview-core/src/parse/constraints.rs
// ============================================================================
// Module: Location Constraint Parser
// Description: Section state machine over location constraint listings.
// Purpose: Extract allowed and disallowed identifiers for one node.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The listing is scanned once, line by line, with a three-state machine:
//! `None`, `Allowed`, `Disallowed`. The two marker lines are the only
//! transitions and there is no transition back to `None`; a section stays
//! active until the next marker or end of input. Marker lines carry no data.
//! Inside a section, the identifier is the text before the first space.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DependencySets;

// ============================================================================
// SECTION: Markers
// ============================================================================

/// Listing header line.
const HEADER: &str = "Location Constraints:";
/// Prefix of the node line.
const NODE_PREFIX: &str = "Node:";
/// Marker entering the allowed section.
const ALLOWED_MARKER: &str = "Allowed to run:";
/// Marker entering the disallowed section.
const DISALLOWED_MARKER: &str = "Not allowed to run:";

// ============================================================================
// SECTION: State Machine
// ============================================================================

/// Section currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// No marker seen yet.
    None,
    /// After `Allowed to run:`.
    Allowed,
    /// After `Not allowed to run:`.
    Disallowed,
}

/// Parses a location constraint listing into dependency sets.
///
/// Unrecognized lines outside a section are discarded and blank lines are
/// skipped; the parser never fails.
#[must_use]
pub fn parse_location_constraints(text: &str) -> DependencySets {
    let mut section = Section::None;
    let mut sets = DependencySets::default();
    for raw in text.lines() {
        let line = raw.trim();
        if line == HEADER || line.starts_with(NODE_PREFIX) {
            continue;
        }
        if line == ALLOWED_MARKER {
            section = Section::Allowed;
            continue;
        }
        if line == DISALLOWED_MARKER {
            section = Section::Disallowed;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let identifier = leading_identifier(line);
        match section {
            Section::Disallowed => sets.disallowed.push(identifier),
            Section::Allowed => sets.allowed.push(identifier),
            Section::None => {}
        }
    }
    sets
}

/// Returns the text before the first space of a trimmed record line.
fn leading_identifier(line: &str) -> String {
    line.split_once(' ').map_or(line, |(head, _)| head).to_string()
}
