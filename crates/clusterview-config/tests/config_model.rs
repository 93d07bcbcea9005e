// crates/clusterview-config/tests/config_model.rs
// =============================================================================
// Module: Config Model Tests
// Description: Validate section parsing, validation rules and conversions.
// Purpose: Ensure configured policies reach the core collaborators.
// =============================================================================

//! Config model tests for clusterview-config.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::path::PathBuf;

use clusterview_config::AuditSinkKind;
use clusterview_config::ClusterviewConfig;
use clusterview_config::ConfigError;
use clusterview_core::BridgeAuditEvent;
use clusterview_core::CacheMode;
use clusterview_core::OptionKind;
use clusterview_core::Operation;
use clusterview_core::StderrMode;
use clusterview_core::UnsupportedKindPolicy;

/// Asserts that `toml` fails validation with a message containing `needle`.
fn assert_rejected(toml: &str, needle: &str) {
    match ClusterviewConfig::from_toml(toml) {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains(needle), "{message} did not contain {needle}");
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Sections
// ============================================================================

#[test]
fn every_section_is_parsed() {
    let config = ClusterviewConfig::from_toml(
        r#"
[tools]
attribute_tool = "/opt/pacemaker/bin/crm_attribute"
cluster_shell = "/opt/pcs/bin/pcs"
metadata_tool = "/opt/pacemaker/libexec/pacemaker-schedulerd"

[command]
timeout_ms = 0
max_output_bytes = 65536
stderr = "merge"

[cache]
mode = "disabled"

[render]
unsupported_kind = "reject"

[audit]
sink = "none"
"#,
    )
    .unwrap();

    let commands = config.tool_commands();
    assert_eq!(commands.cluster_shell, PathBuf::from("/opt/pcs/bin/pcs"));
    let runner = config.runner_config();
    assert_eq!(runner.timeout_ms, 0);
    assert_eq!(runner.max_output_bytes, 65_536);
    assert_eq!(runner.stderr, StderrMode::Merge);
    assert_eq!(config.value_cache().mode(), CacheMode::Disabled);
    assert_eq!(config.render.unsupported_kind, UnsupportedKindPolicy::Reject);
    assert_eq!(config.audit.sink, AuditSinkKind::None);
}

/// Tests that a configured cache mode reaches the cache.
#[test]
fn default_cache_persists_values() {
    let config = ClusterviewConfig::default();
    let cache = config.value_cache();
    cache.insert("batch-limit", "30");
    assert_eq!(cache.get("batch-limit").as_deref(), Some("30"));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn relative_tool_paths_are_rejected() {
    assert_rejected(
        "[tools]\ncluster_shell = \"pcs\"\n",
        "tools.cluster_shell must be an absolute path",
    );
}

#[test]
fn empty_tool_paths_are_rejected() {
    assert_rejected("[tools]\nattribute_tool = \"\"\n", "tools.attribute_tool must be non-empty");
}

#[test]
fn output_limit_bounds_are_enforced() {
    assert_rejected("[command]\nmax_output_bytes = 0\n", "greater than zero");
    assert_rejected("[command]\nmax_output_bytes = 1073741824\n", "at most");
    assert_rejected("[command]\ntimeout_ms = 86400000\n", "command.timeout_ms");
}

#[test]
fn file_sink_requires_path() {
    assert_rejected("[audit]\nsink = \"file\"\n", "audit.path is required");
    assert_rejected("[audit]\nsink = \"stderr\"\npath = \"/tmp/a.jsonl\"\n", "only valid");
}

// ============================================================================
// SECTION: Schema Extensions
// ============================================================================

#[test]
fn extra_options_extend_the_builtin_schema() {
    let config = ClusterviewConfig::from_toml(
        r#"
[[schema.options]]
group = "Pacemaker"
display_name = "Node Health Strategy"
config_key = "node-health-strategy"
kind = "dropdown"
choices = [
  { key = "none", label = "None" },
  { key = "migrate-on-red" },
]

[[schema.options]]
page = "advanced"
group = "Scheduler"
display_name = "Placement Strategy"
config_key = "placement-strategy"
kind = "str"
size = 12
"#,
    )
    .unwrap();
    let schema = config.option_schema();
    let general = schema.page("general").unwrap();
    let extra = general
        .descriptors()
        .find(|descriptor| descriptor.config_key == "node-health-strategy")
        .unwrap();
    match &extra.kind {
        OptionKind::Dropdown {
            choices,
        } => {
            assert_eq!(choices.len(), 2);
            assert_eq!(choices[1].label, "migrate-on-red");
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(schema.page("advanced").unwrap().contains_key("placement-strategy"));
    assert_eq!(schema.page_names().collect::<Vec<_>>(), vec!["general", "advanced"]);
}

#[test]
fn extra_options_cannot_shadow_builtin_keys() {
    assert_rejected(
        "[[schema.options]]\ngroup = \"G\"\ndisplay_name = \"B\"\nconfig_key = \"batch-limit\"\nkind = \"int\"\n",
        "defined twice",
    );
}

#[test]
fn extra_options_must_be_unique_per_page() {
    let entry = "[[schema.options]]\npage = \"p\"\ngroup = \"G\"\ndisplay_name = \"X\"\nconfig_key = \"x\"\nkind = \"check\"\n";
    assert_rejected(&format!("{entry}{entry}"), "defined twice");
}

#[test]
fn choice_kinds_require_choices() {
    assert_rejected(
        "[[schema.options]]\ngroup = \"G\"\ndisplay_name = \"R\"\nconfig_key = \"r\"\nkind = \"radio\"\n",
        "requires choices",
    );
}

#[test]
fn flag_like_keys_are_rejected() {
    assert_rejected(
        "[[schema.options]]\ngroup = \"G\"\ndisplay_name = \"R\"\nconfig_key = \"--all\"\nkind = \"check\"\n",
        "must not start with '-'",
    );
}

/// Tests that unknown kinds load and surface through the render policy.
#[test]
fn unknown_kinds_are_accepted_as_unsupported() {
    let config = ClusterviewConfig::from_toml(
        "[[schema.options]]\ngroup = \"G\"\ndisplay_name = \"S\"\nconfig_key = \"s\"\nkind = \"slider\"\n",
    )
    .unwrap();
    let schema = config.option_schema();
    let descriptor =
        schema.page("general").unwrap().descriptors().find(|d| d.config_key == "s").unwrap();
    assert_eq!(descriptor.kind.tag(), "slider");
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

#[test]
fn file_sink_is_opened_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let toml = format!("[audit]\nsink = \"file\"\npath = {:?}\n", path.to_string_lossy());
    let config = ClusterviewConfig::from_toml(&toml).unwrap();
    let sink = config.audit_sink().unwrap();
    sink.record(&BridgeAuditEvent::degraded(Operation::ListNodes, "no nodes known"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"operation\":\"list_nodes\""));
}

#[test]
fn bridge_is_built_from_config() {
    let config = ClusterviewConfig::from_toml("[audit]\nsink = \"none\"\n").unwrap();
    let bridge = config.build_bridge().unwrap();
    assert!(bridge.schema().page("general").is_some());
    assert!(bridge.cache().is_empty());
}
