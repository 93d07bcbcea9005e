// crates/clusterview-core/src/runtime/mod.rs
// ============================================================================
// Module: Clusterview Runtime
// Description: Command execution, value resolution, rendering, orchestration.
// Purpose: Implement the core operations on top of the interfaces and parsers.
// Dependencies: crate::{audit, core, interfaces, parse}
// ============================================================================

//! ## Overview
//! The runtime wires a [`crate::interfaces::CommandRunner`] to the parsers,
//! the value cache and the renderer. [`ClusterBridge`] is the single entry
//! point used by callers.

// ============================================================================
// SECTION: Submodules
// ============================================================================

mod audited;
pub mod bridge;
pub mod cache;
pub mod commands;
pub mod process;
pub mod render;
pub mod resolver;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bridge::BridgeError;
pub use bridge::ClusterBridge;
pub use bridge::RenderedGroup;
pub use bridge::RenderedOption;
pub use bridge::RenderedPage;
pub use cache::CacheMode;
pub use cache::ValueCache;
pub use commands::ToolCommands;
pub use process::ProcessCommandRunner;
pub use process::ProcessRunnerConfig;
pub use process::StderrMode;
pub use render::OptionRenderer;
pub use render::RenderError;
pub use render::RenderField;
pub use render::RenderModel;
pub use render::UnsupportedKindPolicy;
pub use resolver::ResolvedValue;
pub use resolver::UNSET_SENTINEL;
pub use resolver::ValueResolver;
pub use resolver::ValueSource;
pub use resolver::attribute_value;
