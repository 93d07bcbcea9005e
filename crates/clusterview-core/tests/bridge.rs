// crates/clusterview-core/tests/bridge.rs
// ============================================================================
// Module: Cluster Bridge Tests
// Description: End-to-end tests of bridge operations over a scripted runner.
// ============================================================================
//! ## Overview
//! Exercises node listing, constraint lookup, page loading and attribute
//! updates, including their degradation and audit behavior.

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

mod common;

use std::sync::Arc;

use clusterview_core::AuditOutcome;
use clusterview_core::BridgeError;
use clusterview_core::ClusterBridge;
use clusterview_core::ConfigOptionDescriptor;
use clusterview_core::ConfigOptionSchema;
use clusterview_core::DependencySets;
use clusterview_core::GENERAL_PAGE;
use clusterview_core::NodeStatus;
use clusterview_core::Operation;
use clusterview_core::OptionGroup;
use clusterview_core::OptionKind;
use clusterview_core::OptionRenderer;
use clusterview_core::RenderError;
use clusterview_core::RenderField;
use clusterview_core::SchemaPage;
use clusterview_core::UnsupportedKindPolicy;
use clusterview_core::ValueSource;

use crate::common::METADATA_XML;
use crate::common::RecordingSink;
use crate::common::ScriptedRunner;
use crate::common::attribute_output;
use crate::common::spawn_error;
use crate::common::tools;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a bridge over a shared scripted runner with a recording sink.
fn scripted_bridge(
    runner: ScriptedRunner,
) -> (ClusterBridge<Arc<ScriptedRunner>>, Arc<ScriptedRunner>, Arc<RecordingSink>) {
    let runner = Arc::new(runner);
    let audit = Arc::new(RecordingSink::default());
    let bridge = ClusterBridge::new(Arc::clone(&runner), tools()).with_audit(audit.clone());
    (bridge, runner, audit)
}

/// Small schema plus an "Extra" group holding one option of an unknown kind.
fn schema_with_unsupported() -> ConfigOptionSchema {
    let mut schema = small_schema();
    schema.extend(
        "cluster",
        "Extra",
        ConfigOptionDescriptor::new("Odd", "odd-option", OptionKind::from_tag("slider", 0, "", &[])),
    );
    schema
}

/// Single-page schema with one option of each supported kind.
fn small_schema() -> ConfigOptionSchema {
    ConfigOptionSchema::from_pages(vec![SchemaPage {
        name: "cluster".to_string(),
        groups: vec![OptionGroup::new("Pacemaker", vec![
            ConfigOptionDescriptor::check("Stonith Enabled", "stonith-enabled"),
            ConfigOptionDescriptor::int("Batch Limit", "batch-limit", 4, ""),
            ConfigOptionDescriptor::radio("Maintenance Mode", "maintenance-mode", &["Yes", "No"]),
        ])],
    }])
}

// ============================================================================
// SECTION: Node Listing
// ============================================================================

/// Tests that a successful listing is parsed and audited.
#[test]
fn list_nodes_parses_listing() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(
        &commands.list_nodes(),
        "Pacemaker Nodes:\nOnline: node1 node2\nOffline: node3\n",
        0,
    );
    let (bridge, _, audit) = scripted_bridge(runner);
    let status = bridge.list_nodes();
    assert_eq!(status.online, vec!["node1", "node2"]);
    assert_eq!(status.offline, vec!["node3"]);
    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, Operation::ListNodes);
    assert_eq!(events[0].outcome, AuditOutcome::Ok);
}

#[test]
fn list_nodes_degrades_on_nonzero_exit() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(
        &commands.list_nodes(),
        "Pacemaker Nodes:\nOnline: node1\nOffline:\n",
        1,
    );
    let (bridge, _, audit) = scripted_bridge(runner);
    assert_eq!(bridge.list_nodes(), NodeStatus::default());
    assert!(audit.events().iter().any(|event| event.outcome == AuditOutcome::Degraded));
}

#[test]
fn list_nodes_degrades_on_launch_failure() {
    let commands = tools();
    let runner = ScriptedRunner::new().fail(&commands.list_nodes(), spawn_error("pcs"));
    let (bridge, _, audit) = scripted_bridge(runner);
    assert!(bridge.nodes().is_empty());
    let outcomes: Vec<AuditOutcome> = audit.events().iter().map(|event| event.outcome).collect();
    assert_eq!(outcomes, vec![AuditOutcome::Failed, AuditOutcome::Degraded]);
}

// ============================================================================
// SECTION: Location Constraints
// ============================================================================

/// Tests that constraint text is parsed whatever the exit status.
#[test]
fn location_dependencies_parse_regardless_of_exit() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(
        &commands.location_constraints("node1"),
        "Location Constraints:\n  Node: node1\n    Allowed to run:\n      rsc1 (score:100)\n",
        1,
    );
    let (bridge, _, _) = scripted_bridge(runner);
    assert_eq!(bridge.location_dependencies("node1").allowed, vec!["rsc1"]);
}

#[test]
fn location_dependencies_reject_flag_like_ids() {
    let (bridge, runner, audit) = scripted_bridge(ScriptedRunner::new());
    for node_id in ["", "--all", "node 1", "node\n1"] {
        assert_eq!(bridge.location_dependencies(node_id), DependencySets::default());
    }
    assert!(runner.calls().is_empty());
    assert_eq!(audit.events().len(), 4);
}

#[test]
fn location_dependencies_degrade_on_launch_failure() {
    let commands = tools();
    let runner =
        ScriptedRunner::new().fail(&commands.location_constraints("node1"), spawn_error("pcs"));
    let (bridge, _, _) = scripted_bridge(runner);
    assert_eq!(bridge.location_dependencies("node1"), DependencySets::default());
}

// ============================================================================
// SECTION: Page Loading
// ============================================================================

/// Tests that one metadata fetch seeds defaults for the whole page.
#[test]
fn load_page_fetches_metadata_once_and_applies_defaults() {
    let commands = tools();
    let runner = ScriptedRunner::new()
        .reply(&commands.metadata(), METADATA_XML, 0)
        .reply(
            &commands.get_attribute("stonith-enabled"),
            &attribute_output("stonith-enabled", "(null)"),
            0,
        )
        .reply(&commands.get_attribute("batch-limit"), &attribute_output("batch-limit", "30"), 0)
        .reply(
            &commands.get_attribute("maintenance-mode"),
            &attribute_output("maintenance-mode", "true"),
            0,
        );
    let (bridge, runner, _) = scripted_bridge(runner);
    let bridge = bridge.with_schema(small_schema());

    let page = bridge.load_page("cluster").unwrap();
    assert_eq!(runner.count(&commands.metadata()), 1);
    assert_eq!(page.groups.len(), 1);
    let options = &page.groups[0].options;

    assert_eq!(options[0].descriptor.default, "true");
    assert_eq!(options[0].resolved.value, "true");
    assert_eq!(options[0].resolved.source, ValueSource::Default);
    assert!(options[0].model.fields.contains(&RenderField::Checkbox {
        name: "stonith-enabled".to_string(),
        checked: true,
    }));

    assert_eq!(options[1].descriptor.default, "0");
    assert_eq!(options[1].resolved.value, "30");
    assert_eq!(options[1].resolved.source, ValueSource::Live);

    assert_eq!(options[2].resolved.value, "true");

    // The schema template keeps its original defaults.
    let template = bridge.schema().page("cluster").unwrap();
    assert!(template.descriptors().all(|descriptor| descriptor.default.is_empty()));
}

#[test]
fn load_page_twice_reuses_cached_values() {
    let commands = tools();
    let query = commands.get_attribute("batch-limit");
    let runner = ScriptedRunner::new()
        .reply(&commands.metadata(), METADATA_XML, 0)
        .reply(&query, &attribute_output("batch-limit", "30"), 0);
    let (bridge, runner, _) = scripted_bridge(runner);
    let bridge = bridge.with_schema(small_schema());

    let _ = bridge.load_page("cluster").unwrap();
    let second = bridge.load_page("cluster").unwrap();
    assert_eq!(runner.count(&query), 1);
    assert_eq!(second.groups[0].options[1].resolved.source, ValueSource::Cache);
}

#[test]
fn load_page_unknown_page_runs_nothing() {
    let (bridge, runner, _) = scripted_bridge(ScriptedRunner::new());
    let page = bridge.load_page("nonexistent").unwrap();
    assert_eq!(page.page, "nonexistent");
    assert!(page.groups.is_empty());
    assert!(runner.calls().is_empty());
}

/// Tests that malformed metadata leaves defaults untouched.
#[test]
fn load_page_survives_malformed_metadata() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(&commands.metadata(), "<resource-agent>", 0);
    let (bridge, _, audit) = scripted_bridge(runner);
    let bridge = bridge.with_schema(small_schema());

    let page = bridge.load_page("cluster").unwrap();
    assert!(page.groups[0].options.iter().all(|option| option.descriptor.default.is_empty()));
    assert!(audit.events().iter().any(|event| {
        event.operation == Operation::Metadata && event.outcome == AuditOutcome::Degraded
    }));
}

#[test]
fn builtin_general_page_renders_every_option() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(&commands.metadata(), METADATA_XML, 0).reply(
        &commands.get_attribute("no-quorum-policy"),
        &attribute_output("no-quorum-policy", "(null)"),
        0,
    );
    let (bridge, _, _) = scripted_bridge(runner);
    let page = bridge.load_page(GENERAL_PAGE).unwrap();
    let titles: Vec<&str> = page.groups.iter().map(|group| group.title.as_str()).collect();
    assert_eq!(titles, vec!["General", "Pacemaker"]);
    let quorum = page.groups[1]
        .options
        .iter()
        .find(|option| option.descriptor.config_key == "no-quorum-policy")
        .unwrap();
    assert_eq!(quorum.resolved.value, "stop");
}

/// Tests that an unsupported kind is rendered empty or rejected.
#[test]
fn load_page_unsupported_kind_policy() {
    let schema = schema_with_unsupported();
    let (bridge, _, audit) = scripted_bridge(ScriptedRunner::new());
    let bridge = bridge.with_schema(schema.clone());
    let page = bridge.load_page("cluster").unwrap();
    let odd = &page.groups[1].options[0];
    assert!(odd.model.is_empty());
    assert_eq!(odd.resolved.source, ValueSource::Default);
    assert!(audit.events().iter().any(|event| event.operation == Operation::Render));

    let (bridge, _, _) = scripted_bridge(ScriptedRunner::new());
    let bridge = bridge
        .with_schema(schema)
        .with_renderer(OptionRenderer::new(UnsupportedKindPolicy::Reject));
    assert!(matches!(bridge.load_page("cluster"), Err(RenderError::UnsupportedKind { .. })));
}

/// Tests that an unsupported kind is never queried and is audited under either policy.
#[test]
fn unsupported_kind_is_audited_without_a_query() {
    let commands = tools();
    for policy in [UnsupportedKindPolicy::Ignore, UnsupportedKindPolicy::Reject] {
        let (bridge, runner, audit) = scripted_bridge(ScriptedRunner::new());
        let bridge = bridge
            .with_schema(schema_with_unsupported())
            .with_renderer(OptionRenderer::new(policy));
        let _ = bridge.load_page("cluster");
        assert_eq!(runner.count(&commands.get_attribute("odd-option")), 0);
        let degraded = audit
            .events()
            .into_iter()
            .filter(|event| event.operation == Operation::Render)
            .count();
        assert_eq!(degraded, 1);
    }
}

// ============================================================================
// SECTION: Attribute Updates
// ============================================================================

/// Tests that an update invalidates the cached value of its key.
#[test]
fn update_value_invalidates_cache() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(&commands.set_attribute("batch-limit", "40"), "", 0);
    let (bridge, runner, _) = scripted_bridge(runner);
    bridge.cache().insert("batch-limit", "30");
    bridge.cache().insert("cluster-delay", "60s");

    bridge.update_value("batch-limit", "40").unwrap();
    assert_eq!(bridge.cache().get("batch-limit"), None);
    assert_eq!(bridge.cache().get("cluster-delay").as_deref(), Some("60s"));
    assert_eq!(runner.calls(), vec![commands.set_attribute("batch-limit", "40")]);
}

#[test]
fn update_value_empty_deletes_property() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(&commands.delete_attribute("batch-limit"), "", 0);
    let (bridge, runner, audit) = scripted_bridge(runner);
    bridge.update_value("batch-limit", "").unwrap();
    assert_eq!(runner.count(&commands.delete_attribute("batch-limit")), 1);
    assert_eq!(audit.events()[0].operation, Operation::DeleteAttribute);
}

/// Tests that a failed update still invalidates the key.
#[test]
fn update_value_failure_reports_and_invalidates() {
    let commands = tools();
    let runner = ScriptedRunner::new().reply(
        &commands.set_attribute("batch-limit", "x"),
        "Error performing operation: Invalid argument\n",
        64,
    );
    let (bridge, _, _) = scripted_bridge(runner);
    bridge.cache().insert("batch-limit", "30");
    let err = bridge.update_value("batch-limit", "x").unwrap_err();
    assert_eq!(err, BridgeError::CommandFailed {
        exit_code: Some(64),
        output: "Error performing operation: Invalid argument\n".to_string(),
    });
    assert!(bridge.cache().is_empty());
}

#[test]
fn update_value_launch_failure_is_an_error() {
    let commands = tools();
    let runner = ScriptedRunner::new()
        .fail(&commands.set_attribute("batch-limit", "40"), spawn_error("crm_attribute"));
    let (bridge, _, _) = scripted_bridge(runner);
    assert!(matches!(bridge.update_value("batch-limit", "40"), Err(BridgeError::Command(_))));
}

#[test]
fn update_value_rejects_bad_arguments() {
    let (bridge, runner, _) = scripted_bridge(ScriptedRunner::new());
    assert!(matches!(
        bridge.update_value("--force", "1"),
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        bridge.update_value("batch-limit", "1\0"),
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(runner.calls().is_empty());
}
