// crates/clusterview-config/src/lib.rs
// ============================================================================
// Module: Clusterview Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for clusterview.toml semantics.
// Dependencies: clusterview-core, serde, toml
// ============================================================================

//! ## Overview
//! `clusterview-config` defines the configuration model for the cluster
//! bridge: tool paths, command limits, cache and render policies, audit
//! routing and schema extensions. Validation is strict and fail-closed, and
//! a validated config converts directly into the core collaborators.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
