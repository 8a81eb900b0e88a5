//! Start-tag helpers: attribute lookup and in-place value patching.

use std::ops::Range;

use quick_xml::events::BytesStart;

use crate::XmlError;

/// Unescaped value of attribute `name`, if present.
pub(crate) fn attribute_value(
    event: &BytesStart<'_>,
    name: &str,
) -> Result<Option<String>, XmlError> {
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| XmlError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

pub(crate) fn has_attribute(event: &BytesStart<'_>, name: &str) -> Result<bool, XmlError> {
    Ok(attribute_value(event, name)?.is_some())
}

/// Attribute `name` parsed as a non-negative integer.
pub(crate) fn required_u32(
    event: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
) -> Result<u32, XmlError> {
    let value = attribute_value(event, name)?.ok_or(XmlError::MissingAttribute {
        element,
        attribute: name,
    })?;
    value.trim().parse().map_err(|_| XmlError::NotANumber {
        element,
        attribute: name,
        value,
    })
}

#[derive(Debug, Clone)]
struct AttrSpan {
    key: Range<usize>,
    /// Between the quotes.
    value: Range<usize>,
}

/// Pending edits to one start tag.
///
/// Works on the raw tag bytes so that attribute order, quoting and the
/// whitespace between attributes survive; only the key or value bytes of
/// edited attributes are replaced.
pub(crate) struct TagPatch<'a> {
    raw: &'a [u8],
    name_len: usize,
    spans: Vec<AttrSpan>,
    keys: Vec<Option<&'static str>>,
    values: Vec<Option<String>>,
}

impl<'a> TagPatch<'a> {
    pub(crate) fn new(event: &'a BytesStart<'_>) -> Result<Self, XmlError> {
        let raw: &[u8] = event;
        let name_len = event.name().as_ref().len();
        let spans = scan_attributes(raw, name_len).ok_or_else(|| {
            XmlError::MalformedTag(String::from_utf8_lossy(event.name().as_ref()).into_owned())
        })?;
        let count = spans.len();
        Ok(Self {
            raw,
            name_len,
            spans,
            keys: vec![None; count],
            values: vec![None; count],
        })
    }

    fn key(&self, idx: usize) -> &[u8] {
        match self.keys[idx] {
            Some(key) => key.as_bytes(),
            None => &self.raw[self.spans[idx].key.clone()],
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        (0..self.spans.len()).find(|&idx| self.key(idx) == name.as_bytes())
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Write `value` into attribute `name`.
    ///
    /// A value that already reads as `value` is left untouched. Returns
    /// `false` when the attribute does not exist.
    pub(crate) fn set_u32(&mut self, name: &str, value: u32) -> bool {
        let Some(idx) = self.find(name) else {
            return false;
        };
        let current = std::str::from_utf8(&self.raw[self.spans[idx].value.clone()])
            .ok()
            .and_then(|text| text.trim().parse::<u32>().ok());
        self.values[idx] = if current == Some(value) {
            None
        } else {
            Some(value.to_string())
        };
        true
    }

    /// Rename attribute `from` to `to` unless `to` is already present.
    pub(crate) fn rename(&mut self, from: &str, to: &'static str) -> bool {
        if self.has(to) {
            return false;
        }
        match self.find(from) {
            Some(idx) => {
                self.keys[idx] = Some(to);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.keys.iter().any(Option::is_some) || self.values.iter().any(Option::is_some)
    }

    /// Patched tag, or `None` when nothing changed.
    pub(crate) fn finish(self) -> Result<Option<BytesStart<'static>>, XmlError> {
        if !self.is_modified() {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(self.raw.len() + 8);
        let mut cursor = 0;
        for (idx, span) in self.spans.iter().enumerate() {
            if let Some(key) = self.keys[idx] {
                out.extend_from_slice(&self.raw[cursor..span.key.start]);
                out.extend_from_slice(key.as_bytes());
                cursor = span.key.end;
            }
            if let Some(value) = &self.values[idx] {
                out.extend_from_slice(&self.raw[cursor..span.value.start]);
                out.extend_from_slice(value.as_bytes());
                cursor = span.value.end;
            }
        }
        out.extend_from_slice(&self.raw[cursor..]);
        let content = String::from_utf8(out).map_err(|_| {
            XmlError::MalformedTag(String::from_utf8_lossy(&self.raw[..self.name_len]).into_owned())
        })?;
        Ok(Some(BytesStart::from_content(content, self.name_len)))
    }
}

fn skip_whitespace(raw: &[u8], mut pos: usize) -> usize {
    while raw.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// Locate `key = "value"` pairs after the element name.
fn scan_attributes(raw: &[u8], name_len: usize) -> Option<Vec<AttrSpan>> {
    let mut spans = Vec::new();
    let mut pos = name_len;
    loop {
        let start = skip_whitespace(raw, pos);
        if start == raw.len() {
            return Some(spans);
        }
        if start == pos {
            return None;
        }
        let key_len = raw[start..]
            .iter()
            .position(|&b| b == b'=' || b.is_ascii_whitespace())?;
        if key_len == 0 {
            return None;
        }
        let key_end = start + key_len;
        let eq = skip_whitespace(raw, key_end);
        if raw.get(eq) != Some(&b'=') {
            return None;
        }
        let open = skip_whitespace(raw, eq + 1);
        let quote = *raw.get(open)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        let value_start = open + 1;
        let value_end = value_start + raw[value_start..].iter().position(|&b| b == quote)?;
        spans.push(AttrSpan {
            key: start..key_end,
            value: value_start..value_end,
        });
        pos = value_end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(content: &str) -> BytesStart<'_> {
        let name_len = content.find(' ').unwrap_or(content.len());
        BytesStart::from_content(content, name_len)
    }

    fn patched(event: Option<BytesStart<'static>>) -> String {
        let event = event.expect("tag should be modified");
        String::from_utf8(event.to_vec()).unwrap()
    }

    #[test]
    fn reads_attributes() {
        let event = tag(r#"PRELEVEL RELAY="4" LEVEL=" 12 " NOTE="a&amp;b""#);
        assert_eq!(
            attribute_value(&event, "NOTE").unwrap().as_deref(),
            Some("a&b")
        );
        assert_eq!(required_u32(&event, "PRELEVEL", "LEVEL").unwrap(), 12);
        assert!(matches!(
            required_u32(&event, "PRELEVEL", "NOTE"),
            Err(XmlError::NotANumber { attribute: "NOTE", .. })
        ));
        assert!(matches!(
            required_u32(&event, "PRELEVEL", "ZONE"),
            Err(XmlError::MissingAttribute { attribute: "ZONE", .. })
        ));
        assert!(has_attribute(&event, "RELAY").unwrap());
    }

    #[test]
    fn patch_keeps_quotes_and_spacing() {
        let event = tag("RELAY  NUMBER='3'\tSPACE = \"1\" ZONE=\"2\" ");
        let mut patch = TagPatch::new(&event).unwrap();
        assert!(patch.set_u32("SPACE", 14));
        assert!(patch.set_u32("ZONE", 2));
        assert_eq!(
            patched(patch.finish().unwrap()),
            "RELAY  NUMBER='3'\tSPACE = \"14\" ZONE=\"2\" "
        );
    }

    #[test]
    fn equal_values_are_not_rewritten() {
        let event = tag(r#"PRELEVEL RELAY="4" LEVEL="007""#);
        let mut patch = TagPatch::new(&event).unwrap();
        assert!(patch.set_u32("LEVEL", 7));
        assert!(!patch.set_u32("UPTIME", 7));
        assert!(patch.finish().unwrap().is_none());
    }

    #[test]
    fn rename_then_set_switches_variant() {
        let event = tag(r#"SPACE SPACEINRACK="2" NUMBER="16" NAME="Foyer""#);
        let mut patch = TagPatch::new(&event).unwrap();
        assert!(patch.rename("SPACEINRACK", "SPACEINRACKEXT"));
        assert!(patch.rename("NUMBER", "NUMBEREXT"));
        assert!(patch.rename("NAME", "NAMEEXT"));
        assert!(patch.set_u32("NUMBEREXT", 17));
        assert_eq!(
            patched(patch.finish().unwrap()),
            r#"SPACE SPACEINRACKEXT="2" NUMBEREXT="17" NAMEEXT="Foyer""#
        );
    }

    #[test]
    fn rename_refuses_to_duplicate_keys() {
        let event = tag(r#"SPACE SPACEINRACK="2" SPACEINRACKEXT="2""#);
        let mut patch = TagPatch::new(&event).unwrap();
        assert!(!patch.rename("SPACEINRACK", "SPACEINRACKEXT"));
        assert!(!patch.is_modified());
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for content in [r#"SPACE NUMBER=1"#, r#"SPACE NUMBER"#, r#"SPACE NUMBER="1"#] {
            let event = tag(content);
            assert!(matches!(
                TagPatch::new(&event),
                Err(XmlError::MalformedTag(name)) if name == "SPACE"
            ));
        }
    }
}
