// crates/clusterview-core/src/core/mod.rs
// ============================================================================
// Module: Clusterview Core Types
// Description: Node records, option descriptors, and the option schema.
// Purpose: Provide stable, serializable types shared by parsers and runtime.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types carry no behavior beyond construction and iteration. Parsers
//! produce them and the runtime consumes them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod node;
pub mod option;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use node::DependencySets;
pub use node::Node;
pub use node::NodeStatus;
pub use option::ConfigOptionDescriptor;
pub use option::DropdownChoice;
pub use option::OptionKind;
pub use schema::ConfigOptionSchema;
pub use schema::GENERAL_PAGE;
pub use schema::OptionGroup;
pub use schema::SchemaPage;
