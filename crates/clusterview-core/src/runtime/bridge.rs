// crates/clusterview-core/src/runtime/bridge.rs
// ============================================================================
// Module: Cluster Bridge
// Description: Orchestration of tool commands, parsers, resolver and renderer.
// Purpose: Expose the core operations consumed by the page layer.
// Dependencies: crate::{audit, core, interfaces, parse, runtime}
// ============================================================================

//! ## Overview
//! [`ClusterBridge`] owns the command runner, tool paths, option schema, value
//! cache, renderer and audit sink. It applies the degradation policies:
//! - node listing failures yield an empty status,
//! - constraint listing failures yield empty dependency sets,
//! - metadata failures leave descriptor defaults untouched,
//! - attribute lookups that produce no output fall back to the default.
//!
//! Attribute updates invalidate the cached value of their key whether or not
//! the update command succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::BridgeAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::Operation;
use crate::core::ConfigOptionDescriptor;
use crate::core::ConfigOptionSchema;
use crate::core::DependencySets;
use crate::core::Node;
use crate::core::NodeStatus;
use crate::core::OptionKind;
use crate::core::SchemaPage;
use crate::interfaces::CommandError;
use crate::interfaces::CommandOutput;
use crate::interfaces::CommandRunner;
use crate::parse::MetadataDefaults;
use crate::parse::parse_location_constraints;
use crate::parse::parse_node_status;
use crate::runtime::audited::run_audited;
use crate::runtime::cache::ValueCache;
use crate::runtime::commands::ToolCommands;
use crate::runtime::render::OptionRenderer;
use crate::runtime::render::RenderError;
use crate::runtime::render::RenderModel;
use crate::runtime::resolver::ResolvedValue;
use crate::runtime::resolver::ValueResolver;
use crate::runtime::resolver::ValueSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by attribute updates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A caller-supplied argument was rejected before running any command.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The command could not produce output.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The command ran and reported a nonzero status.
    #[error("command exited with status {exit_code:?}: {output}")]
    CommandFailed {
        /// Exit code, if any.
        exit_code: Option<i32>,
        /// Captured output.
        output: String,
    },
}

// ============================================================================
// SECTION: Rendered Page
// ============================================================================

/// One option with its resolved value and render model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOption {
    /// Descriptor with its metadata default applied.
    pub descriptor: ConfigOptionDescriptor,
    /// Effective value.
    pub resolved: ResolvedValue,
    /// Render model.
    pub model: RenderModel,
}

/// One display group of rendered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGroup {
    /// Group heading.
    pub title: String,
    /// Rendered options in display order.
    pub options: Vec<RenderedOption>,
}

/// A fully resolved and rendered schema page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    /// Page name.
    pub page: String,
    /// Rendered groups in display order.
    pub groups: Vec<RenderedGroup>,
}

impl RenderedPage {
    /// Creates a page with no groups.
    #[must_use]
    pub fn empty(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            groups: Vec::new(),
        }
    }
}

// ============================================================================
// SECTION: Bridge
// ============================================================================

/// Entry point for every core operation.
pub struct ClusterBridge<R> {
    /// Command runner.
    runner: R,
    /// Tool command builders.
    commands: ToolCommands,
    /// Option catalog.
    schema: ConfigOptionSchema,
    /// Shared value cache.
    cache: ValueCache,
    /// Option renderer.
    renderer: OptionRenderer,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
}

impl<R: CommandRunner> ClusterBridge<R> {
    /// Creates a bridge with the built-in schema, a session cache, the
    /// default renderer and no audit logging.
    #[must_use]
    pub fn new(runner: R, commands: ToolCommands) -> Self {
        Self {
            runner,
            commands,
            schema: ConfigOptionSchema::builtin(),
            cache: ValueCache::default(),
            renderer: OptionRenderer::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the option schema.
    #[must_use]
    pub fn with_schema(mut self, schema: ConfigOptionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Replaces the value cache; clones of a cache share entries.
    #[must_use]
    pub fn with_cache(mut self, cache: ValueCache) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the renderer.
    #[must_use]
    pub const fn with_renderer(mut self, renderer: OptionRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the option schema.
    #[must_use]
    pub const fn schema(&self) -> &ConfigOptionSchema {
        &self.schema
    }

    /// Returns the value cache.
    #[must_use]
    pub const fn cache(&self) -> &ValueCache {
        &self.cache
    }

    /// Returns a resolver bound to this bridge's collaborators.
    #[must_use]
    pub fn resolver(&self) -> ValueResolver<'_, R> {
        ValueResolver::new(&self.runner, &self.commands, &self.cache, self.audit.as_ref())
    }

    /// Lists online and offline node identifiers.
    ///
    /// Launch failures and nonzero exits yield an empty status.
    #[must_use]
    pub fn list_nodes(&self) -> NodeStatus {
        let command = self.commands.list_nodes();
        match run_audited(&self.runner, self.audit.as_ref(), Operation::ListNodes, &command) {
            Ok(output) => {
                if !output.success() {
                    self.degraded(Operation::ListNodes, "node listing failed; no nodes known");
                }
                parse_node_status(&output)
            }
            Err(err) => {
                self.degraded(Operation::ListNodes, &format!("no nodes known: {err}"));
                NodeStatus::default()
            }
        }
    }

    /// Lists node records, online nodes first.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.list_nodes().nodes()
    }

    /// Parses the location constraints that reference a node.
    ///
    /// The listing text is parsed regardless of exit status. Rejected node
    /// identifiers and launch failures yield empty sets.
    #[must_use]
    pub fn location_dependencies(&self, node_id: &str) -> DependencySets {
        if let Err(reason) = check_argument(node_id) {
            self.degraded(Operation::LocationConstraints, &format!("node id rejected: {reason}"));
            return DependencySets::default();
        }
        let command = self.commands.location_constraints(node_id);
        match run_audited(&self.runner, self.audit.as_ref(), Operation::LocationConstraints, &command)
        {
            Ok(output) => parse_location_constraints(&output.stdout),
            Err(err) => {
                self.degraded(Operation::LocationConstraints, &format!("no constraints: {err}"));
                DependencySets::default()
            }
        }
    }

    /// Resolves the effective value of a single descriptor.
    #[must_use]
    pub fn resolve(&self, descriptor: &ConfigOptionDescriptor) -> ResolvedValue {
        self.resolver().resolve(descriptor)
    }

    /// Loads, resolves and renders a schema page.
    ///
    /// Unknown pages yield an empty page without running any command.
    /// Options of an unsupported kind are never queried; each one records a
    /// degraded event before the renderer ignores or rejects it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when an option kind is unsupported and the
    /// renderer rejects unsupported kinds.
    pub fn load_page(&self, page: &str) -> Result<RenderedPage, RenderError> {
        let Some(template) = self.schema.page(page) else {
            return Ok(RenderedPage::empty(page));
        };
        let mut page = template.clone();
        self.apply_metadata_defaults(&mut page);

        let resolver = self.resolver();
        let mut groups = Vec::with_capacity(page.groups.len());
        for group in page.groups {
            let mut options = Vec::with_capacity(group.options.len());
            for descriptor in group.options {
                let resolved = if matches!(descriptor.kind, OptionKind::Unsupported { .. }) {
                    self.degraded(
                        Operation::Render,
                        &format!(
                            "{} has unsupported kind `{}`; not resolved",
                            descriptor.config_key,
                            descriptor.kind.tag()
                        ),
                    );
                    ResolvedValue {
                        config_key: descriptor.config_key.clone(),
                        value: descriptor.default.clone(),
                        source: ValueSource::Default,
                    }
                } else {
                    resolver.resolve(&descriptor)
                };
                let model = self.renderer.render(&descriptor, &resolved.value)?;
                options.push(RenderedOption {
                    descriptor,
                    resolved,
                    model,
                });
            }
            groups.push(RenderedGroup {
                title: group.title,
                options,
            });
        }
        Ok(RenderedPage {
            page: page.name,
            groups,
        })
    }

    /// Updates a cluster property; an empty value removes it.
    ///
    /// The cached value of the key is invalidated once a command was run,
    /// whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the key is rejected, the command cannot
    /// run, or it exits with a nonzero status.
    pub fn update_value(&self, config_key: &str, value: &str) -> Result<(), BridgeError> {
        check_argument(config_key).map_err(BridgeError::InvalidArgument)?;
        if value.contains('\0') {
            return Err(BridgeError::InvalidArgument("value contains a NUL byte".to_string()));
        }
        let (operation, command) = if value.is_empty() {
            (Operation::DeleteAttribute, self.commands.delete_attribute(config_key))
        } else {
            (Operation::SetAttribute, self.commands.set_attribute(config_key, value))
        };
        let result = run_audited(&self.runner, self.audit.as_ref(), operation, &command);
        self.cache.invalidate(config_key);
        let output: CommandOutput = result?;
        if output.success() {
            Ok(())
        } else {
            Err(BridgeError::CommandFailed {
                exit_code: output.exit_code,
                output: output.stdout,
            })
        }
    }

    /// Fetches metadata once and assigns defaults to every page descriptor.
    fn apply_metadata_defaults(&self, page: &mut SchemaPage) {
        if page.descriptors().next().is_none() {
            return;
        }
        let command = self.commands.metadata();
        let output =
            match run_audited(&self.runner, self.audit.as_ref(), Operation::Metadata, &command) {
                Ok(output) => output,
                Err(err) => {
                    self.degraded(Operation::Metadata, &format!("defaults unavailable: {err}"));
                    return;
                }
            };
        match MetadataDefaults::parse(&output.stdout) {
            Ok(defaults) => {
                defaults.apply(page.descriptors_mut());
            }
            Err(err) => {
                self.degraded(Operation::Metadata, &format!("defaults unavailable: {err}"));
            }
        }
    }

    /// Records a degradation event.
    fn degraded(&self, operation: Operation, detail: &str) {
        self.audit.record(&BridgeAuditEvent::degraded(operation, detail));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects identifiers that could be read as flags or break argument framing.
fn check_argument(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("identifier is empty".to_string());
    }
    if value.starts_with('-') {
        return Err("identifier starts with '-'".to_string());
    }
    if value.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err("identifier contains whitespace or control characters".to_string());
    }
    Ok(())
}
