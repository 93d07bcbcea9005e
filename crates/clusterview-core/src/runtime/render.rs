// crates/clusterview-core/src/runtime/render.rs
// ============================================================================
// Module: Option Renderer
// Description: Render-agnostic field models for resolved option values.
// Purpose: Turn a descriptor plus value into form field descriptions.
// Dependencies: serde, thiserror, crate::core
// ============================================================================

//! ## Overview
//! Each [`OptionKind`] variant maps to its own field list:
//! - `int` / `str`: one text field carrying the value and size.
//! - `radio`: one field per choice. Selection is binary: `Yes` is selected
//!   for `"true"`, every other choice for `"false"`.
//! - `check`: a hidden `off` companion followed by the checkbox, so an
//!   unchecked box still submits a value.
//! - `dropdown`: one entry per choice, selected when the key equals the value.
//!
//! Unsupported kinds render no fields, or fail when the policy is `reject`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ConfigOptionDescriptor;
use crate::core::DropdownChoice;
use crate::core::OptionKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Radio choice that stands for `"true"`.
const RADIO_TRUE_CHOICE: &str = "Yes";
/// Value submitted by the checkbox companion when unchecked.
pub const CHECKBOX_OFF_VALUE: &str = "off";

// ============================================================================
// SECTION: Render Model
// ============================================================================

/// A single form field description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum RenderField {
    /// Text input.
    Text {
        /// Field name.
        name: String,
        /// Current value.
        value: String,
        /// Field width in characters.
        size: u32,
        /// Unit label.
        units: String,
    },
    /// One radio button.
    Radio {
        /// Field name shared by the group.
        name: String,
        /// Submitted value (the choice label).
        value: String,
        /// True when this button is selected.
        selected: bool,
    },
    /// Checkbox.
    Checkbox {
        /// Field name.
        name: String,
        /// True when checked.
        checked: bool,
    },
    /// Hidden companion field.
    Hidden {
        /// Field name.
        name: String,
        /// Submitted value.
        value: String,
    },
    /// One dropdown entry.
    DropdownEntry {
        /// Field name shared by the dropdown.
        name: String,
        /// Submitted value.
        value: String,
        /// Display label.
        label: String,
        /// True when this entry is selected.
        selected: bool,
    },
}

/// Rendered fields for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    /// Configuration key.
    pub config_key: String,
    /// Display label.
    pub display_name: String,
    /// Fields in display order.
    pub fields: Vec<RenderField>,
}

impl RenderModel {
    /// Returns true when no fields were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// SECTION: Policy and Errors
// ============================================================================

/// Handling of descriptors whose kind is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedKindPolicy {
    /// Render an empty model.
    #[default]
    Ignore,
    /// Fail with [`RenderError::UnsupportedKind`].
    Reject,
}

/// Rendering errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Descriptor kind is not supported.
    #[error("unsupported option kind {tag:?} for {config_key}")]
    UnsupportedKind {
        /// Configuration key of the descriptor.
        config_key: String,
        /// Unrecognized kind tag.
        tag: String,
    },
}

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders resolved option values.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionRenderer {
    /// Unsupported kind handling.
    policy: UnsupportedKindPolicy,
}

impl OptionRenderer {
    /// Creates a renderer with the given unsupported-kind policy.
    #[must_use]
    pub const fn new(policy: UnsupportedKindPolicy) -> Self {
        Self {
            policy,
        }
    }

    /// Renders a descriptor with its resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedKind`] when the kind is unsupported
    /// and the policy is [`UnsupportedKindPolicy::Reject`].
    pub fn render(
        &self,
        descriptor: &ConfigOptionDescriptor,
        value: &str,
    ) -> Result<RenderModel, RenderError> {
        let name = descriptor.config_key.as_str();
        let fields = match &descriptor.kind {
            OptionKind::Int {
                size,
                units,
            }
            | OptionKind::Str {
                size,
                units,
            } => vec![RenderField::Text {
                name: name.to_string(),
                value: value.to_string(),
                size: *size,
                units: units.clone(),
            }],
            OptionKind::Radio {
                choices,
            } => radio_fields(name, choices, value),
            OptionKind::Check => checkbox_fields(name, value),
            OptionKind::Dropdown {
                choices,
            } => dropdown_fields(name, choices, value),
            OptionKind::Unsupported {
                tag,
            } => match self.policy {
                UnsupportedKindPolicy::Ignore => Vec::new(),
                UnsupportedKindPolicy::Reject => {
                    return Err(RenderError::UnsupportedKind {
                        config_key: name.to_string(),
                        tag: tag.clone(),
                    });
                }
            },
        };
        Ok(RenderModel {
            config_key: name.to_string(),
            display_name: descriptor.display_name.clone(),
            fields,
        })
    }
}

// ============================================================================
// SECTION: Kind Renderers
// ============================================================================

/// Returns true when a radio choice is selected for the value.
#[must_use]
pub fn radio_selected(choice: &str, value: &str) -> bool {
    (choice == RADIO_TRUE_CHOICE && value == "true")
        || (choice != RADIO_TRUE_CHOICE && value == "false")
}

/// Returns true when a checkbox is checked for the value.
#[must_use]
pub fn checkbox_checked(value: &str) -> bool {
    value == "true"
}

/// Builds one radio field per choice.
fn radio_fields(name: &str, choices: &[String], value: &str) -> Vec<RenderField> {
    choices
        .iter()
        .map(|choice| RenderField::Radio {
            name: name.to_string(),
            value: choice.clone(),
            selected: radio_selected(choice, value),
        })
        .collect()
}

/// Builds the hidden companion and the checkbox.
fn checkbox_fields(name: &str, value: &str) -> Vec<RenderField> {
    vec![
        RenderField::Hidden {
            name: name.to_string(),
            value: CHECKBOX_OFF_VALUE.to_string(),
        },
        RenderField::Checkbox {
            name: name.to_string(),
            checked: checkbox_checked(value),
        },
    ]
}

/// Builds one dropdown entry per choice.
fn dropdown_fields(name: &str, choices: &[DropdownChoice], value: &str) -> Vec<RenderField> {
    choices
        .iter()
        .map(|choice| RenderField::DropdownEntry {
            name: name.to_string(),
            value: choice.key.clone(),
            label: choice.label.clone(),
            selected: choice.key == value,
        })
        .collect()
}
