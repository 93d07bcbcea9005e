// crates/clusterview-core/src/lib.rs
// ============================================================================
// Module: Clusterview Core Library
// Description: Public API surface for the Clusterview core.
// Purpose: Expose core types, interfaces, parsers, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, parse, runtime}
// ============================================================================

//! ## Overview
//! Clusterview core bridges a static catalog of cluster configuration options
//! and the live state of a cluster manager reached through its command-line
//! tools. It resolves each option's effective value, renders it into a
//! render-agnostic field model, and parses node status and location
//! constraint listings into structured records. External tools are reached
//! only through the [`CommandRunner`] interface with argument vectors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod parse;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use audit::AuditOutcome;
pub use audit::AuditSink;
pub use audit::BridgeAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::Operation;
pub use audit::StderrAuditSink;
pub use interfaces::CommandError;
pub use interfaces::CommandLine;
pub use interfaces::CommandOutput;
pub use interfaces::CommandRunner;
pub use parse::MetadataDefaults;
pub use parse::MetadataError;
pub use parse::load_defaults;
pub use parse::parse_location_constraints;
pub use parse::parse_node_status;
pub use parse::parse_node_status_text;
pub use runtime::BridgeError;
pub use runtime::CacheMode;
pub use runtime::ClusterBridge;
pub use runtime::OptionRenderer;
pub use runtime::ProcessCommandRunner;
pub use runtime::ProcessRunnerConfig;
pub use runtime::RenderError;
pub use runtime::RenderField;
pub use runtime::RenderModel;
pub use runtime::RenderedGroup;
pub use runtime::RenderedOption;
pub use runtime::RenderedPage;
pub use runtime::ResolvedValue;
pub use runtime::StderrMode;
pub use runtime::ToolCommands;
pub use runtime::UNSET_SENTINEL;
pub use runtime::UnsupportedKindPolicy;
pub use runtime::ValueCache;
pub use runtime::ValueResolver;
pub use runtime::ValueSource;
