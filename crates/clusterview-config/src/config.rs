// crates/clusterview-config/src/config.rs
// ============================================================================
// Module: Clusterview Configuration
// Description: Configuration loading and validation for the cluster bridge.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: clusterview-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file location is taken from the caller, then from
//! `CLUSTERVIEW_CONFIG`, then `clusterview.toml` in the working directory.
//! Every section has defaults, so an empty file is a valid configuration.
//! Invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use clusterview_core::AuditSink;
use clusterview_core::CacheMode;
use clusterview_core::ClusterBridge;
use clusterview_core::ConfigOptionDescriptor;
use clusterview_core::ConfigOptionSchema;
use clusterview_core::FileAuditSink;
use clusterview_core::GENERAL_PAGE;
use clusterview_core::NoopAuditSink;
use clusterview_core::OptionKind;
use clusterview_core::OptionRenderer;
use clusterview_core::ProcessCommandRunner;
use clusterview_core::ProcessRunnerConfig;
use clusterview_core::StderrAuditSink;
use clusterview_core::StderrMode;
use clusterview_core::ToolCommands;
use clusterview_core::UnsupportedKindPolicy;
use clusterview_core::ValueCache;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "clusterview.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CLUSTERVIEW_CONFIG";
/// Maximum size of a config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for command timeouts.
pub(crate) const MAX_COMMAND_TIMEOUT_MS: u64 = 600_000;
/// Upper bound for captured command output.
pub(crate) const MAX_COMMAND_OUTPUT_BYTES: usize = 64 * 1024 * 1024;
/// Maximum number of schema extension entries.
pub(crate) const MAX_SCHEMA_OPTIONS: usize = 256;
/// Maximum number of choices per extension entry.
pub(crate) const MAX_OPTION_CHOICES: usize = 64;
/// Maximum length of names, labels and keys in schema extensions.
pub(crate) const MAX_LABEL_LENGTH: usize = 128;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterviewConfig {
    /// External tool paths.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Child process limits.
    #[serde(default)]
    pub command: CommandConfig,
    /// Value cache policy.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Render policy.
    #[serde(default)]
    pub render: RenderConfig,
    /// Audit log routing.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Schema extensions.
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl ClusterviewConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tools.validate()?;
        self.command.validate()?;
        self.audit.validate()?;
        self.schema.validate()?;
        Ok(())
    }

    /// Returns the tool command builders.
    #[must_use]
    pub fn tool_commands(&self) -> ToolCommands {
        ToolCommands {
            attribute_tool: self.tools.attribute_tool.clone(),
            cluster_shell: self.tools.cluster_shell.clone(),
            metadata_tool: self.tools.metadata_tool.clone(),
        }
    }

    /// Returns the child process runner limits.
    #[must_use]
    pub const fn runner_config(&self) -> ProcessRunnerConfig {
        ProcessRunnerConfig {
            timeout_ms: self.command.timeout_ms,
            max_output_bytes: self.command.max_output_bytes,
            stderr: self.command.stderr,
        }
    }

    /// Returns a fresh value cache for the configured mode.
    #[must_use]
    pub fn value_cache(&self) -> ValueCache {
        ValueCache::new(self.cache.mode)
    }

    /// Returns the option renderer for the configured policy.
    #[must_use]
    pub const fn renderer(&self) -> OptionRenderer {
        OptionRenderer::new(self.render.unsupported_kind)
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit log file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for the file sink".to_string())
                })?;
                let sink = FileAuditSink::new(path).map_err(|err| {
                    ConfigError::Io(format!("audit log {}: {err}", path.display()))
                })?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Returns the built-in schema with the configured extensions appended.
    #[must_use]
    pub fn option_schema(&self) -> ConfigOptionSchema {
        let mut schema = ConfigOptionSchema::builtin();
        for option in &self.schema.options {
            schema.extend(&option.page, &option.group, option.descriptor());
        }
        schema
    }

    /// Builds a bridge over child processes from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit sink cannot be opened.
    pub fn build_bridge(&self) -> Result<ClusterBridge<ProcessCommandRunner>, ConfigError> {
        let runner = ProcessCommandRunner::new(self.runner_config());
        Ok(ClusterBridge::new(runner, self.tool_commands())
            .with_schema(self.option_schema())
            .with_cache(self.value_cache())
            .with_renderer(self.renderer())
            .with_audit(self.audit_sink()?))
    }
}

// ============================================================================
// SECTION: Tools
// ============================================================================

/// Paths of the external cluster manager tools.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Attribute query/update tool.
    #[serde(default = "default_attribute_tool")]
    pub attribute_tool: PathBuf,
    /// Cluster shell for status and constraint listings.
    #[serde(default = "default_cluster_shell")]
    pub cluster_shell: PathBuf,
    /// Scheduler metadata tool.
    #[serde(default = "default_metadata_tool")]
    pub metadata_tool: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            attribute_tool: default_attribute_tool(),
            cluster_shell: default_cluster_shell(),
            metadata_tool: default_metadata_tool(),
        }
    }
}

impl ToolsConfig {
    /// Validates tool paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_tool_path("tools.attribute_tool", &self.attribute_tool)?;
        validate_tool_path("tools.cluster_shell", &self.cluster_shell)?;
        validate_tool_path("tools.metadata_tool", &self.metadata_tool)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Command Limits
// ============================================================================

/// Child process limits.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    /// Timeout in milliseconds; zero waits without bound.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum captured bytes per stream.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    /// Standard error handling.
    #[serde(default)]
    pub stderr: StderrMode,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
            stderr: StderrMode::default(),
        }
    }
}

impl CommandConfig {
    /// Validates command limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms > MAX_COMMAND_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "command.timeout_ms must be at most {MAX_COMMAND_TIMEOUT_MS}"
            )));
        }
        if self.max_output_bytes == 0 {
            return Err(ConfigError::Invalid(
                "command.max_output_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_output_bytes > MAX_COMMAND_OUTPUT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "command.max_output_bytes must be at most {MAX_COMMAND_OUTPUT_BYTES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Cache and Render
// ============================================================================

/// Value cache configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Retention policy.
    #[serde(default)]
    pub mode: CacheMode,
}

/// Render configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Handling of unrecognized option kinds.
    #[serde(default)]
    pub unsupported_kind: UnsupportedKindPolicy,
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on standard error.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit logging disabled.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit routing.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required for the file sink".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid with the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Schema Extensions
// ============================================================================

/// Schema extension configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    /// Descriptors appended to the built-in schema.
    #[serde(default)]
    pub options: Vec<ExtraOptionConfig>,
}

impl SchemaConfig {
    /// Validates extension entries and key uniqueness per page.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.options.len() > MAX_SCHEMA_OPTIONS {
            return Err(ConfigError::Invalid(format!(
                "schema.options exceeds {MAX_SCHEMA_OPTIONS} entries"
            )));
        }
        let builtin = ConfigOptionSchema::builtin();
        let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
        for option in &self.options {
            option.validate()?;
            let taken = builtin.page(&option.page).is_some_and(|page| {
                page.contains_key(&option.config_key)
            });
            if taken || !seen.insert((option.page.as_str(), option.config_key.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "schema option {} is defined twice on page {}",
                    option.config_key, option.page
                )));
            }
        }
        Ok(())
    }
}

/// One schema extension entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtraOptionConfig {
    /// Target page name.
    #[serde(default = "default_page")]
    pub page: String,
    /// Target group title.
    pub group: String,
    /// Human-readable label.
    pub display_name: String,
    /// Attribute name.
    pub config_key: String,
    /// Kind tag (`int`, `str`, `radio`, `check`, `dropdown`).
    pub kind: String,
    /// Field width for text kinds.
    #[serde(default)]
    pub size: u32,
    /// Unit label for text kinds.
    #[serde(default)]
    pub units: String,
    /// Choices for radio and dropdown kinds.
    #[serde(default)]
    pub choices: Vec<ChoiceConfig>,
}

impl ExtraOptionConfig {
    /// Builds the descriptor for this entry.
    #[must_use]
    pub fn descriptor(&self) -> ConfigOptionDescriptor {
        let choices: Vec<(String, String)> = self
            .choices
            .iter()
            .map(|choice| {
                let label = choice.label.clone().unwrap_or_else(|| choice.key.clone());
                (choice.key.clone(), label)
            })
            .collect();
        let kind = OptionKind::from_tag(&self.kind, self.size, &self.units, &choices);
        ConfigOptionDescriptor::new(self.display_name.clone(), self.config_key.clone(), kind)
    }

    /// Validates one extension entry.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_label("schema.options.page", &self.page)?;
        validate_label("schema.options.group", &self.group)?;
        validate_label("schema.options.display_name", &self.display_name)?;
        validate_label("schema.options.config_key", &self.config_key)?;
        validate_label("schema.options.kind", &self.kind)?;
        if self.config_key.starts_with('-')
            || self.config_key.chars().any(|ch| ch.is_whitespace() || ch.is_control())
        {
            return Err(ConfigError::Invalid(format!(
                "schema option key `{}` must not start with '-' or contain whitespace",
                self.config_key
            )));
        }
        if matches!(self.kind.as_str(), "radio" | "dropdown") && self.choices.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "schema option {} of kind {} requires choices",
                self.config_key, self.kind
            )));
        }
        if self.choices.len() > MAX_OPTION_CHOICES {
            return Err(ConfigError::Invalid(format!(
                "schema option {} exceeds {MAX_OPTION_CHOICES} choices",
                self.config_key
            )));
        }
        for choice in &self.choices {
            validate_label("schema.options.choices.key", &choice.key)?;
            if let Some(label) = &choice.label {
                validate_label("schema.options.choices.label", label)?;
            }
        }
        Ok(())
    }
}

/// One radio or dropdown choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceConfig {
    /// Submitted value.
    pub key: String,
    /// Display label; defaults to the key.
    #[serde(default)]
    pub label: Option<String>,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default attribute tool path.
fn default_attribute_tool() -> PathBuf {
    ToolCommands::default().attribute_tool
}

/// Default cluster shell path.
fn default_cluster_shell() -> PathBuf {
    ToolCommands::default().cluster_shell
}

/// Default metadata tool path.
fn default_metadata_tool() -> PathBuf {
    ToolCommands::default().metadata_tool
}

/// Default command timeout.
fn default_timeout_ms() -> u64 {
    ProcessRunnerConfig::default().timeout_ms
}

/// Default output limit.
fn default_max_output_bytes() -> usize {
    ProcessRunnerConfig::default().max_output_bytes
}

/// Default page for schema extensions.
fn default_page() -> String {
    GENERAL_PAGE.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates that a tool path is absolute and within length limits.
fn validate_tool_path(field: &str, path: &Path) -> Result<(), ConfigError> {
    validate_path_string(field, &path.to_string_lossy())?;
    if !path.is_absolute() {
        return Err(ConfigError::Invalid(format!("{field} must be an absolute path")));
    }
    Ok(())
}

/// Validates a short non-empty label.
fn validate_label(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_LABEL_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_LABEL_LENGTH} bytes")));
    }
    Ok(())
}
