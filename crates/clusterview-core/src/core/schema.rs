// crates/clusterview-core/src/core/schema.rs
// ============================================================================
// Module: Configuration Option Schema
// Description: Page-keyed catalog of option descriptors grouped for display.
// Purpose: Supply the static descriptor set consumed by page loading.
// Dependencies: crate::core::option
// ============================================================================

//! ## Overview
//! The schema is a static catalog: each page holds ordered display groups and
//! each group holds ordered option descriptors. Pages are looked up by name;
//! the built-in catalog exposes the cluster property page `general`.
//! Deployments may append descriptors through [`ConfigOptionSchema::extend`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::option::ConfigOptionDescriptor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the built-in cluster property page.
pub const GENERAL_PAGE: &str = "general";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordered set of descriptors shown under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    /// Group heading.
    pub title: String,
    /// Descriptors in display order.
    pub options: Vec<ConfigOptionDescriptor>,
}

impl OptionGroup {
    /// Creates a group from a title and descriptors.
    #[must_use]
    pub fn new(title: impl Into<String>, options: Vec<ConfigOptionDescriptor>) -> Self {
        Self {
            title: title.into(),
            options,
        }
    }
}

/// One schema page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaPage {
    /// Page name used for lookup.
    pub name: String,
    /// Display groups in order.
    pub groups: Vec<OptionGroup>,
}

impl SchemaPage {
    /// Creates an empty page.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Returns every descriptor on the page, flattened in display order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ConfigOptionDescriptor> {
        self.groups.iter().flat_map(|group| group.options.iter())
    }

    /// Returns mutable references to every descriptor, flattened in display order.
    pub fn descriptors_mut(&mut self) -> impl Iterator<Item = &mut ConfigOptionDescriptor> {
        self.groups.iter_mut().flat_map(|group| group.options.iter_mut())
    }

    /// Returns true when the page already contains the configuration key.
    #[must_use]
    pub fn contains_key(&self, config_key: &str) -> bool {
        self.descriptors().any(|descriptor| descriptor.config_key == config_key)
    }
}

/// Page-keyed catalog of configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigOptionSchema {
    /// Pages in declaration order.
    pages: Vec<SchemaPage>,
}

impl Default for ConfigOptionSchema {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConfigOptionSchema {
    /// Creates a schema from explicit pages.
    #[must_use]
    pub const fn from_pages(pages: Vec<SchemaPage>) -> Self {
        Self {
            pages,
        }
    }

    /// Returns the built-in cluster property catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let general = OptionGroup::new("General", vec![
            ConfigOptionDescriptor::int("Batch Limit", "batch-limit", 4, ""),
            ConfigOptionDescriptor::text(
                "Default Action Timeout",
                "default-action-timeout",
                4,
                "Seconds",
            ),
        ]);
        let pacemaker = OptionGroup::new("Pacemaker", vec![
            ConfigOptionDescriptor::dropdown("No Quorum Policy", "no-quorum-policy", &[
                ("ignore", "Ignore"),
                ("freeze", "Freeze"),
                ("stop", "Stop"),
                ("suicide", "Suicide"),
            ]),
            ConfigOptionDescriptor::check("Symmetric", "symmetric-cluster"),
            ConfigOptionDescriptor::check("Stonith Enabled", "stonith-enabled"),
            ConfigOptionDescriptor::dropdown("Stonith Action", "stonith-action", &[
                ("reboot", "Reboot"),
                ("poweroff", "Poweroff"),
            ]),
            ConfigOptionDescriptor::int("Cluster Delay", "cluster-delay", 4, ""),
            ConfigOptionDescriptor::check("Stop Orphan Resources", "stop-orphan-resources"),
            ConfigOptionDescriptor::check("Stop Orphan Actions", "stop-orphan-actions"),
            ConfigOptionDescriptor::check("Start Failure is Fatal", "start-failure-is-fatal"),
            ConfigOptionDescriptor::radio("Maintenance Mode", "maintenance-mode", &["Yes", "No"]),
            ConfigOptionDescriptor::int("PE Error Storage", "pe-error-series-max", 4, ""),
            ConfigOptionDescriptor::int("PE Warning Storage", "pe-warn-series-max", 4, ""),
            ConfigOptionDescriptor::int("PE Input Storage", "pe-input-series-max", 4, ""),
        ]);
        Self::from_pages(vec![SchemaPage {
            name: GENERAL_PAGE.to_string(),
            groups: vec![general, pacemaker],
        }])
    }

    /// Looks up a page by name.
    #[must_use]
    pub fn page(&self, name: &str) -> Option<&SchemaPage> {
        self.pages.iter().find(|page| page.name == name)
    }

    /// Returns the page names in declaration order.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.name.as_str())
    }

    /// Appends a descriptor to a page group, creating either when missing.
    pub fn extend(&mut self, page: &str, group: &str, descriptor: ConfigOptionDescriptor) {
        let page_index = match self.pages.iter().position(|candidate| candidate.name == page) {
            Some(index) => index,
            None => {
                self.pages.push(SchemaPage::empty(page));
                self.pages.len() - 1
            }
        };
        let groups = &mut self.pages[page_index].groups;
        match groups.iter_mut().find(|candidate| candidate.title == group) {
            Some(existing) => existing.options.push(descriptor),
            None => groups.push(OptionGroup::new(group, vec![descriptor])),
        }
    }
}
