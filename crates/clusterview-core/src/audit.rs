// crates/clusterview-core/src/audit.rs
// ============================================================================
// Module: Clusterview Audit Logging
// Description: Structured audit events for cluster tool invocations.
// Purpose: Emit JSON-lines logs without hard dependencies on a log pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every external command and every degradation decision produces one
//! [`BridgeAuditEvent`]. Events are routed through an [`AuditSink`]; the
//! stderr and file sinks write one JSON object per line. Events record the
//! program name and operation label only, never argument values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Core operation classification.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Node listing.
    ListNodes,
    /// Location constraint listing for a node.
    LocationConstraints,
    /// Attribute value query.
    GetAttribute,
    /// Attribute value update.
    SetAttribute,
    /// Attribute removal.
    DeleteAttribute,
    /// Metadata document fetch.
    Metadata,
    /// Option rendering.
    Render,
}

impl Operation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListNodes => "list_nodes",
            Self::LocationConstraints => "location_constraints",
            Self::GetAttribute => "get_attribute",
            Self::SetAttribute => "set_attribute",
            Self::DeleteAttribute => "delete_attribute",
            Self::Metadata => "metadata",
            Self::Render => "render",
        }
    }
}

/// Operation outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The command completed with status zero.
    Ok,
    /// The command failed and the caller fell back to an empty or default result.
    Degraded,
    /// The command ran but reported a nonzero status, or could not run.
    Failed,
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation label.
    pub operation: Operation,
    /// Program label when a command was involved.
    pub program: Option<String>,
    /// Outcome classification.
    pub outcome: AuditOutcome,
    /// Exit code when the command completed.
    pub exit_code: Option<i32>,
    /// Elapsed wall-clock time in milliseconds.
    pub duration_ms: Option<u128>,
    /// Short human-readable detail.
    pub detail: Option<String>,
}

/// Inputs required to construct an audit event.
pub struct BridgeAuditEventParams {
    /// Operation label.
    pub operation: Operation,
    /// Program label when a command was involved.
    pub program: Option<String>,
    /// Outcome classification.
    pub outcome: AuditOutcome,
    /// Exit code when the command completed.
    pub exit_code: Option<i32>,
    /// Elapsed wall-clock time in milliseconds.
    pub duration_ms: Option<u128>,
    /// Short human-readable detail.
    pub detail: Option<String>,
}

impl BridgeAuditEvent {
    /// Creates a command event with a consistent timestamp.
    #[must_use]
    pub fn command(params: BridgeAuditEventParams) -> Self {
        Self::with_event("cluster_command", params)
    }

    /// Creates a degradation event with a consistent timestamp.
    #[must_use]
    pub fn degraded(operation: Operation, detail: impl Into<String>) -> Self {
        Self::with_event("degraded", BridgeAuditEventParams {
            operation,
            program: None,
            outcome: AuditOutcome::Degraded,
            exit_code: None,
            duration_ms: None,
            detail: Some(detail.into()),
        })
    }

    /// Builds an event with the given identifier.
    fn with_event(event: &'static str, params: BridgeAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            operation: params.operation,
            program: params.program,
            outcome: params.outcome,
            exit_code: params.exit_code,
            duration_ms: params.duration_ms,
            detail: params.detail,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for bridge events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &BridgeAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &BridgeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &BridgeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &BridgeAuditEvent) {}
}
