//! Echo panel XML: dialect descriptors, a streaming parser into
//! [`echo_model::Config`] and a rewriter that patches a base document in
//! place while copying everything it does not own byte for byte.

mod dialect;
mod document;
pub mod names;
mod parse;
mod rewrite;
mod tag;

#[cfg(test)]
mod fixtures;

use echo_model::{ModelError, Reference};
use thiserror::Error;

pub use dialect::{
    dialect_by_id, parse_version, Dialect, ElementKind, VersionRule, DIALECTS, ECHO_ACP, ECHO_PCP,
};
pub use names::SpaceVariant;
pub use parse::{parse, parse_str};
pub use rewrite::rewrite;

#[derive(Debug, Error)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("xml: {0}")]
    Xml(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// The first element is not the dialect's root.
    #[error("expected root element <{expected}>, found {found}")]
    BadRoot {
        expected: &'static str,
        found: String,
    },
    /// The rack container's firmware version is missing or not supported.
    #[error("{dialect} does not support firmware version {version:?}")]
    IncompatibleVersion {
        dialect: &'static str,
        version: String,
    },
    #[error("<{element}> is missing attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("<{element}> attribute {attribute}={value:?} is not a non-negative integer")]
    NotANumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    /// A `SPACE` element carries neither the primary nor the extended rack attribute.
    #[error("<SPACE> has neither SPACEINRACK nor SPACEINRACKEXT")]
    MissingSpaceAttribute,
    /// A fade time or level entry appears before any preset.
    #[error("<{element}> appears outside of a preset")]
    NoCurrentPreset { element: &'static str },
    #[error("<{element}> attribute {attribute}={value} exceeds {max}")]
    OutOfRange {
        element: &'static str,
        attribute: &'static str,
        value: u32,
        max: u32,
    },
    /// Two `SPACE` elements claim the same rack position or the same space.
    #[error("<SPACE> rack position {rack_pos} or space {space} is already mounted")]
    DuplicateMount { rack_pos: u32, space: u32 },
    /// A start tag the rewriter has to patch could not be tokenized.
    #[error("malformed start tag <{0}>")]
    MalformedTag(String),
    /// The base document refers to something the model does not provide.
    #[error("model has no {0}")]
    DanglingReference(Reference),
}

impl From<ModelError> for XmlError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound(reference) => XmlError::DanglingReference(reference),
        }
    }
}
