//! Element walk shared by the parser and the rewriter.

use std::io::{self, BufRead};

use quick_xml::events::BytesStart;

use crate::dialect::{Dialect, ElementKind};
use crate::names::{SpaceVariant, NAME_ATTR, SPACE_IN_RACK_ATTR, SPACE_IN_RACK_EXT_ATTR, VERSION_ATTR};
use crate::tag::{attribute_value, has_attribute};
use crate::XmlError;

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Consume a leading UTF-8 byte order mark, reporting whether there was one.
pub(crate) fn skip_bom<R: BufRead>(source: &mut R) -> io::Result<bool> {
    let found = source.fill_buf()?.starts_with(UTF8_BOM);
    if found {
        source.consume(UTF8_BOM.len());
    }
    Ok(found)
}

pub(crate) fn xml_error(err: quick_xml::Error, position: usize) -> XmlError {
    XmlError::Xml(format!("{err} (at byte {position})"))
}

/// Tracks the root element check and classifies every start element.
pub(crate) struct DocumentWalker<'d> {
    dialect: &'d Dialect,
    root_seen: bool,
    /// Elements opened and not yet closed.
    depth: usize,
}

impl<'d> DocumentWalker<'d> {
    pub(crate) fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            root_seen: false,
            depth: 0,
        }
    }

    /// Kind of `event`, or `None` for the root and unrelated elements.
    pub(crate) fn enter(&mut self, event: &BytesStart<'_>) -> Result<Option<ElementKind>, XmlError> {
        let name = event.local_name();
        if !self.root_seen {
            if name.as_ref() != self.dialect.root_tag.as_bytes() {
                return Err(XmlError::BadRoot {
                    expected: self.dialect.root_tag,
                    found: format!("<{}>", String::from_utf8_lossy(name.as_ref())),
                });
            }
            self.root_seen = true;
            return Ok(None);
        }
        Ok(self.dialect.classify(name.as_ref()))
    }

    /// Record a non-empty start tag.
    pub(crate) fn open(&mut self) {
        self.depth += 1;
    }

    /// Record an end tag. The reader rejects unbalanced ones.
    pub(crate) fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Fail documents that ended before a root element or inside one.
    pub(crate) fn finish(&self) -> Result<(), XmlError> {
        if !self.root_seen {
            return Err(XmlError::BadRoot {
                expected: self.dialect.root_tag,
                found: "end of document".into(),
            });
        }
        if self.depth > 0 {
            return Err(XmlError::Xml(format!(
                "unexpected end of document with {} element(s) still open",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Validate the rack container's firmware version and return its name.
pub(crate) fn check_rack(event: &BytesStart<'_>, dialect: &Dialect) -> Result<String, XmlError> {
    let version = attribute_value(event, VERSION_ATTR)?.unwrap_or_default();
    if !dialect.is_version_compatible(&version) {
        return Err(XmlError::IncompatibleVersion {
            dialect: dialect.label,
            version,
        });
    }
    Ok(attribute_value(event, NAME_ATTR)?.unwrap_or_default())
}

/// Attribute set a `SPACE` element was written with.
pub(crate) fn space_variant(event: &BytesStart<'_>) -> Result<SpaceVariant, XmlError> {
    if has_attribute(event, SPACE_IN_RACK_ATTR)? {
        Ok(SpaceVariant::Primary)
    } else if has_attribute(event, SPACE_IN_RACK_EXT_ATTR)? {
        Ok(SpaceVariant::Extended)
    } else {
        Err(XmlError::MissingSpaceAttribute)
    }
}
