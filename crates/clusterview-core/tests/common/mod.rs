// crates/clusterview-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Scripted command runner and recording audit sink.
// Purpose: Drive the bridge without a live cluster manager.
// Dependencies: clusterview-core
// ============================================================================

//! ## Overview
//! Provides a [`ScriptedRunner`] that answers commands from a script keyed by
//! the rendered command line, plus an in-memory audit sink.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Shared test helpers; not every test binary uses every helper."
)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use clusterview_core::AuditSink;
use clusterview_core::BridgeAuditEvent;
use clusterview_core::CommandError;
use clusterview_core::CommandLine;
use clusterview_core::CommandOutput;
use clusterview_core::CommandRunner;
use clusterview_core::ToolCommands;

/// Canned response for a scripted command.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return output with an exit code.
    Output(String, i32),
    /// Fail as if the command could not run.
    Error(CommandError),
}

/// Command runner that answers from a script keyed by the rendered command line.
#[derive(Default)]
pub struct ScriptedRunner {
    /// Replies keyed by rendered command line.
    replies: BTreeMap<String, Reply>,
    /// Commands run so far, in order.
    calls: Mutex<Vec<CommandLine>>,
}

impl ScriptedRunner {
    /// Creates a runner with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful reply.
    pub fn reply(mut self, command: &CommandLine, stdout: &str, exit_code: i32) -> Self {
        self.replies.insert(command.to_string(), Reply::Output(stdout.to_string(), exit_code));
        self
    }

    /// Scripts a launch failure.
    pub fn fail(mut self, command: &CommandLine, error: CommandError) -> Self {
        self.replies.insert(command.to_string(), Reply::Error(error));
        self
    }

    /// Returns every command run so far.
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }

    /// Counts runs of a specific command.
    pub fn count(&self, command: &CommandLine) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| *call == command).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(command.clone());
        match self.replies.get(&command.to_string()) {
            Some(Reply::Output(stdout, code)) => Ok(CommandOutput::new(stdout.clone(), *code)),
            Some(Reply::Error(err)) => Err(err.clone()),
            None => Ok(CommandOutput::new("", 1)),
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Recorded events.
    events: Mutex<Vec<BridgeAuditEvent>>,
}

impl RecordingSink {
    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<BridgeAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingSink {
    fn record(&self, event: &BridgeAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Tool paths used by every test.
pub fn tools() -> ToolCommands {
    ToolCommands {
        attribute_tool: PathBuf::from("/test/crm_attribute"),
        cluster_shell: PathBuf::from("/test/pcs"),
        metadata_tool: PathBuf::from("/test/schedulerd"),
    }
}

/// Attribute tool output for a set property.
pub fn attribute_output(key: &str, value: &str) -> String {
    format!("scope=crm_config  name={key} value={value}\n")
}

/// Launch failure for the given program label.
pub fn spawn_error(program: &str) -> CommandError {
    CommandError::Spawn {
        program: program.to_string(),
        reason: "No such file or directory (os error 2)".to_string(),
    }
}

/// Scheduler metadata document used by page tests.
pub const METADATA_XML: &str = r#"<?xml version="1.0"?>
<!DOCTYPE resource-agent SYSTEM "ra-api-1.dtd">
<resource-agent name="pacemaker-schedulerd">
  <version>1.0</version>
  <longdesc lang="en">Cluster options used by the scheduler</longdesc>
  <shortdesc lang="en">Scheduler options</shortdesc>
  <parameters>
    <parameter name="no-quorum-policy">
      <shortdesc lang="en">What to do when the cluster does not have quorum</shortdesc>
      <content type="select" default="stop"/>
    </parameter>
    <parameter name="symmetric-cluster">
      <content type="boolean" default="true"/>
    </parameter>
    <parameter name="stonith-enabled">
      <content type="boolean" default="true"/>
    </parameter>
    <parameter name="batch-limit">
      <content type="integer" default="0"/>
    </parameter>
    <parameter name="maintenance-mode">
      <content type="boolean" default="false"/>
    </parameter>
  </parameters>
</resource-agent>
"#;
