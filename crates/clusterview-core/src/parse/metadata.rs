// crates/clusterview-core/src/parse/metadata.rs
// ============================================================================
// Module: Metadata Default Loader
// Description: Default-value extraction from agent metadata XML.
// Purpose: Batch-assign descriptor defaults from one parsed document.
// Dependencies: quick-xml, thiserror, crate::core
// ============================================================================

//! ## Overview
//! Metadata documents follow the shape
//! `resource-agent/parameters/parameter[@name]/content[@default]`. The
//! document is streamed once into a name-to-default map and the map is then
//! applied to a batch of descriptors. The first matching parameter wins;
//! descriptors without a match keep their current default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use thiserror::Error;

use crate::core::ConfigOptionDescriptor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Element path of a parameter definition.
const PARAMETER_PATH: [&str; 2] = ["resource-agent", "parameters"];
/// Element path of a parameter content definition.
const CONTENT_PATH: [&str; 3] = ["resource-agent", "parameters", "parameter"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Metadata parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// The document is not well-formed XML.
    #[error("malformed metadata document: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Metadata Defaults
// ============================================================================

/// Parameter defaults extracted from a metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataDefaults {
    /// Default values keyed by parameter name.
    defaults: BTreeMap<String, String>,
}

impl MetadataDefaults {
    /// Parses a metadata document.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] when the document is not well-formed.
    pub fn parse(xml: &str) -> Result<Self, MetadataError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut path: Vec<String> = Vec::new();
        let mut parameter: Option<String> = None;
        let mut saw_root = false;
        let mut defaults = BTreeMap::new();
        loop {
            let event =
                reader.read_event().map_err(|err| MetadataError::Malformed(err.to_string()))?;
            match event {
                Event::Start(element) => {
                    saw_root = true;
                    let name = local_name(&element);
                    if name == "parameter" && path_is(&path, &PARAMETER_PATH) {
                        parameter = attribute(&element, "name")?;
                    }
                    record_default(&element, &name, &path, parameter.as_deref(), &mut defaults)?;
                    path.push(name);
                }
                Event::Empty(element) => {
                    saw_root = true;
                    let name = local_name(&element);
                    record_default(&element, &name, &path, parameter.as_deref(), &mut defaults)?;
                }
                Event::End(_) => {
                    if path.pop().as_deref() == Some("parameter") {
                        parameter = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        if !saw_root {
            return Err(MetadataError::Malformed("document has no root element".to_string()));
        }
        if !path.is_empty() {
            return Err(MetadataError::Malformed("unexpected end of document".to_string()));
        }
        Ok(Self {
            defaults,
        })
    }

    /// Returns the default for a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.defaults.get(name).map(String::as_str)
    }

    /// Returns the number of parameters with a default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    /// Returns true when no defaults were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }

    /// Assigns defaults to matching descriptors and returns how many matched.
    pub fn apply<'a, I>(&self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = &'a mut ConfigOptionDescriptor>,
    {
        let mut assigned = 0;
        for descriptor in descriptors {
            if let Some(default) = self.defaults.get(&descriptor.config_key) {
                descriptor.default.clone_from(default);
                assigned += 1;
            }
        }
        assigned
    }
}

/// Parses a metadata document and assigns defaults to the batch.
///
/// # Errors
///
/// Returns [`MetadataError`] when the document is not well-formed; the
/// descriptors are left untouched in that case.
pub fn load_defaults<'a, I>(xml: &str, descriptors: I) -> Result<usize, MetadataError>
where
    I: IntoIterator<Item = &'a mut ConfigOptionDescriptor>,
{
    let defaults = MetadataDefaults::parse(xml)?;
    Ok(defaults.apply(descriptors))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Records the `default` attribute of a parameter's `content` element.
fn record_default(
    element: &BytesStart<'_>,
    name: &str,
    path: &[String],
    parameter: Option<&str>,
    defaults: &mut BTreeMap<String, String>,
) -> Result<(), MetadataError> {
    if name != "content" || !path_is(path, &CONTENT_PATH) {
        return Ok(());
    }
    let Some(parameter) = parameter else {
        return Ok(());
    };
    if defaults.contains_key(parameter) {
        return Ok(());
    }
    if let Some(default) = attribute(element, "default")? {
        defaults.insert(parameter.to_string(), default);
    }
    Ok(())
}

/// Returns the element's local name.
fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Reads and unescapes an attribute value.
fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, MetadataError> {
    let Some(attr) =
        element.try_get_attribute(key).map_err(|err| MetadataError::Malformed(err.to_string()))?
    else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(|err| MetadataError::Malformed(err.to_string()))?;
    Ok(Some(value.into_owned()))
}

/// Returns true when the open element path equals the expected path.
fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(open, want)| open == want)
}
