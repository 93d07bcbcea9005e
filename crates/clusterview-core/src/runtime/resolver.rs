// crates/clusterview-core/src/runtime/resolver.rs
// ============================================================================
// Module: Option Value Resolver
// Description: Effective-value resolution for configuration options.
// Purpose: Resolve cache, then live attribute, then metadata default.
// Dependencies: crate::audit, crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! Resolution order for a descriptor:
//! 1. a cached value for its configuration key,
//! 2. the live attribute value reported by the attribute tool,
//! 3. the descriptor default when the live value is the `(null)` sentinel.
//!
//! The resolved value is cached under the configuration key. The tool's exit
//! status is ignored: whatever text came back is interpreted. Only a command
//! that produced no output at all (launch failure, timeout, output limit)
//! falls back to the default without caching, so the next lookup retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::audit::AuditSink;
use crate::audit::BridgeAuditEvent;
use crate::audit::Operation;
use crate::core::ConfigOptionDescriptor;
use crate::interfaces::CommandRunner;
use crate::runtime::audited::run_audited;
use crate::runtime::cache::ValueCache;
use crate::runtime::commands::ToolCommands;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attribute value reported for unset properties.
pub const UNSET_SENTINEL: &str = "(null)";
/// Marker preceding the value in attribute tool output.
const VALUE_MARKER: &str = "value=";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Served from the value cache.
    Cache,
    /// Reported by the attribute tool.
    Live,
    /// Taken from the descriptor default.
    Default,
}

/// Effective value of one configuration option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
    /// Configuration key the value belongs to.
    pub config_key: String,
    /// Effective value.
    pub value: String,
    /// Value provenance.
    pub source: ValueSource,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves descriptor values against a shared cache and the attribute tool.
pub struct ValueResolver<'a, R: ?Sized> {
    /// Command runner used for live queries.
    runner: &'a R,
    /// Tool command builders.
    commands: &'a ToolCommands,
    /// Shared value cache.
    cache: &'a ValueCache,
    /// Audit sink for command and degradation events.
    audit: &'a dyn AuditSink,
}

impl<'a, R: CommandRunner + ?Sized> ValueResolver<'a, R> {
    /// Creates a resolver over borrowed collaborators.
    #[must_use]
    pub const fn new(
        runner: &'a R,
        commands: &'a ToolCommands,
        cache: &'a ValueCache,
        audit: &'a dyn AuditSink,
    ) -> Self {
        Self {
            runner,
            commands,
            cache,
            audit,
        }
    }

    /// Resolves the effective value of a descriptor.
    pub fn resolve(&self, descriptor: &ConfigOptionDescriptor) -> ResolvedValue {
        let key = descriptor.config_key.as_str();
        if let Some(value) = self.cache.get(key) {
            return resolved(key, value, ValueSource::Cache);
        }

        let command = self.commands.get_attribute(key);
        let output = match run_audited(self.runner, self.audit, Operation::GetAttribute, &command)
        {
            Ok(output) => output,
            Err(err) => {
                self.audit.record(&BridgeAuditEvent::degraded(
                    Operation::GetAttribute,
                    format!("using default for {key}: {err}"),
                ));
                return resolved(key, descriptor.default.clone(), ValueSource::Default);
            }
        };

        let fetched = attribute_value(&output.stdout);
        let result = if fetched == UNSET_SENTINEL {
            resolved(key, descriptor.default.clone(), ValueSource::Default)
        } else {
            resolved(key, fetched.to_string(), ValueSource::Live)
        };
        self.cache.insert(key, &result.value);
        result
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the attribute value from attribute tool output.
///
/// The first line carrying a `value=` marker wins: everything up to and
/// including its last marker is dropped and the remainder is trimmed. Output
/// without any marker is returned whole, trimmed and otherwise verbatim.
#[must_use]
pub fn attribute_value(stdout: &str) -> &str {
    let Some(line) = stdout.lines().find(|line| line.contains(VALUE_MARKER)) else {
        return stdout.trim();
    };
    let tail = line.rfind(VALUE_MARKER).map_or(line, |index| &line[index + VALUE_MARKER.len()..]);
    tail.trim()
}

/// Builds a resolved value.
fn resolved(key: &str, value: String, source: ValueSource) -> ResolvedValue {
    ResolvedValue {
        config_key: key.to_string(),
        value,
        source,
    }
}
