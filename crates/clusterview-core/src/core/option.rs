// crates/clusterview-core/src/core/option.rs
// ============================================================================
// Module: Configuration Option Descriptors
// Description: Typed descriptors for cluster configuration options.
// Purpose: Replace flat type tags with one variant per option kind.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ConfigOptionDescriptor`] names one cluster property: its display label,
//! the stable configuration key used for both live lookups and metadata
//! defaults, its [`OptionKind`], and the default value assigned by the
//! metadata loader. Kind-specific data (field size, units, choices) lives on
//! the variant that uses it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Option Kind
// ============================================================================

/// Label/key pair offered by a dropdown option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownChoice {
    /// Submitted value.
    pub key: String,
    /// Display label.
    pub label: String,
}

impl DropdownChoice {
    /// Creates a dropdown choice.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Kind of a configuration option together with its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionKind {
    /// Integer text field.
    Int {
        /// Field width in characters (0 = renderer default).
        size: u32,
        /// Optional unit label shown next to the field.
        units: String,
    },
    /// Free-form text field.
    Str {
        /// Field width in characters (0 = renderer default).
        size: u32,
        /// Optional unit label shown next to the field.
        units: String,
    },
    /// Radio group with Yes/No selection semantics.
    Radio {
        /// Ordered choice labels.
        choices: Vec<String>,
    },
    /// Boolean checkbox.
    Check,
    /// Dropdown with key/label pairs.
    Dropdown {
        /// Ordered choices.
        choices: Vec<DropdownChoice>,
    },
    /// Kind tag that is not recognized.
    Unsupported {
        /// Original kind tag.
        tag: String,
    },
}

impl OptionKind {
    /// Builds a kind from its textual tag and the generic descriptor fields.
    ///
    /// Unknown tags produce [`OptionKind::Unsupported`]. Dropdown choices are
    /// given as `(key, label)` pairs; radio choices use the labels only.
    #[must_use]
    pub fn from_tag(tag: &str, size: u32, units: &str, choices: &[(String, String)]) -> Self {
        match tag {
            "int" => Self::Int {
                size,
                units: units.to_string(),
            },
            "str" => Self::Str {
                size,
                units: units.to_string(),
            },
            "radio" => Self::Radio {
                choices: choices.iter().map(|(_, label)| label.clone()).collect(),
            },
            "check" => Self::Check,
            "dropdown" => Self::Dropdown {
                choices: choices
                    .iter()
                    .map(|(key, label)| DropdownChoice::new(key.clone(), label.clone()))
                    .collect(),
            },
            other => Self::Unsupported {
                tag: other.to_string(),
            },
        }
    }

    /// Returns the textual tag for this kind.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Int {
                ..
            } => "int",
            Self::Str {
                ..
            } => "str",
            Self::Radio {
                ..
            } => "radio",
            Self::Check => "check",
            Self::Dropdown {
                ..
            } => "dropdown",
            Self::Unsupported {
                tag,
            } => tag,
        }
    }
}

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Describes one configuration option shown on a schema page.
///
/// # Invariants
/// - `config_key` is unique within a resolved batch.
/// - `default` is assigned at most once per batch by the metadata loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigOptionDescriptor {
    /// Human-readable label.
    pub display_name: String,
    /// Stable key used for attribute lookups and metadata defaults.
    pub config_key: String,
    /// Option kind and kind-specific data.
    #[serde(flatten)]
    pub kind: OptionKind,
    /// Default value used when the live attribute is unset.
    pub default: String,
}

impl ConfigOptionDescriptor {
    /// Creates a descriptor with an empty default.
    #[must_use]
    pub fn new(
        display_name: impl Into<String>,
        config_key: impl Into<String>,
        kind: OptionKind,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            config_key: config_key.into(),
            kind,
            default: String::new(),
        }
    }

    /// Creates an integer descriptor.
    #[must_use]
    pub fn int(display_name: &str, config_key: &str, size: u32, units: &str) -> Self {
        Self::new(display_name, config_key, OptionKind::Int {
            size,
            units: units.to_string(),
        })
    }

    /// Creates a text descriptor.
    #[must_use]
    pub fn text(display_name: &str, config_key: &str, size: u32, units: &str) -> Self {
        Self::new(display_name, config_key, OptionKind::Str {
            size,
            units: units.to_string(),
        })
    }

    /// Creates a checkbox descriptor.
    #[must_use]
    pub fn check(display_name: &str, config_key: &str) -> Self {
        Self::new(display_name, config_key, OptionKind::Check)
    }

    /// Creates a radio descriptor.
    #[must_use]
    pub fn radio(display_name: &str, config_key: &str, choices: &[&str]) -> Self {
        Self::new(display_name, config_key, OptionKind::Radio {
            choices: choices.iter().map(ToString::to_string).collect(),
        })
    }

    /// Creates a dropdown descriptor from `(key, label)` pairs.
    #[must_use]
    pub fn dropdown(display_name: &str, config_key: &str, choices: &[(&str, &str)]) -> Self {
        Self::new(display_name, config_key, OptionKind::Dropdown {
            choices: choices.iter().map(|(key, label)| DropdownChoice::new(*key, *label)).collect(),
        })
    }
}
