// crates/clusterview-core/src/parse/mod.rs
// ============================================================================
// Module: Clusterview Parsers
// Description: Text and XML parsers for cluster manager tool output.
// Purpose: Isolate ad hoc output parsing behind documented input contracts.
// Dependencies: crate::core, quick-xml
// ============================================================================

//! ## Overview
//! Parsers are pure functions over captured tool output. Text that does not
//! match the expected shape degrades to empty results; only the XML metadata
//! parser reports malformed input, and callers decide whether to degrade.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod constraints;
pub mod metadata;
pub mod node_status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use constraints::parse_location_constraints;
pub use metadata::MetadataDefaults;
pub use metadata::MetadataError;
pub use metadata::load_defaults;
pub use node_status::parse_node_status;
pub use node_status::parse_node_status_text;
