// crates/clusterview-core/src/runtime/audited.rs
// ============================================================================
// Module: Audited Command Execution
// Description: Command execution wrapper that emits audit events.
// Purpose: Give every core operation the same timing and outcome logging.
// Dependencies: crate::audit, crate::interfaces
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::BridgeAuditEvent;
use crate::audit::BridgeAuditEventParams;
use crate::audit::Operation;
use crate::interfaces::CommandError;
use crate::interfaces::CommandLine;
use crate::interfaces::CommandOutput;
use crate::interfaces::CommandRunner;

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs a command and records one audit event for it.
pub(crate) fn run_audited<R: CommandRunner + ?Sized>(
    runner: &R,
    audit: &dyn AuditSink,
    operation: Operation,
    command: &CommandLine,
) -> Result<CommandOutput, CommandError> {
    let started = Instant::now();
    let result = runner.run(command);
    let duration_ms = Some(started.elapsed().as_millis());
    let params = match &result {
        Ok(output) => BridgeAuditEventParams {
            operation,
            program: Some(command.program_label()),
            outcome: if output.success() { AuditOutcome::Ok } else { AuditOutcome::Failed },
            exit_code: output.exit_code,
            duration_ms,
            detail: None,
        },
        Err(err) => BridgeAuditEventParams {
            operation,
            program: Some(command.program_label()),
            outcome: AuditOutcome::Failed,
            exit_code: None,
            duration_ms,
            detail: Some(err.to_string()),
        },
    };
    audit.record(&BridgeAuditEvent::command(params));
    result
}
