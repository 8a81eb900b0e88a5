//! Per panel family vocabulary and version rules.

use std::cmp::Ordering;

use crate::names::{FADE_TIME_TAG, LEVEL_TAG, PRESET_TAG, SPACE_TAG};

/// Start elements the codecs act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Rack container carrying the firmware version and panel name.
    Rack,
    /// Output (circuit) definition.
    Output,
    /// Rack slot to logical space assignment.
    Space,
    /// Start of a preset.
    Preset,
    /// Fade time entry of the open preset.
    FadeTime,
    /// Level entry of the open preset.
    Level,
}

/// Firmware versions a dialect accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRule {
    /// `min <= version < below`, missing components compare as zero.
    Range {
        min: &'static [u32],
        below: &'static [u32],
    },
    /// The version starts with exactly these components.
    Prefix(&'static [u32]),
}

impl VersionRule {
    pub fn matches(&self, version: &[u32]) -> bool {
        match self {
            VersionRule::Range { min, below } => {
                compare_versions(version, min) != Ordering::Less
                    && compare_versions(version, below) == Ordering::Less
            }
            VersionRule::Prefix(prefix) => version.starts_with(prefix),
        }
    }
}

/// Descriptor of one panel family's XML schema.
///
/// Families share one document structure and differ only in the names below
/// and in the firmware versions they accept, so a new family is a new value
/// of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Stable identifier stored on parsed configurations.
    pub id: &'static str,
    /// Human readable panel type.
    pub label: &'static str,
    pub root_tag: &'static str,
    pub rack_tag: &'static str,
    pub output_tag: &'static str,
    /// Attribute of a level entry naming its circuit.
    pub output_attr: &'static str,
    /// Attribute of a fade time entry holding the seconds.
    pub fade_time_attr: &'static str,
    pub versions: VersionRule,
}

/// Echo Preset Control Panel, firmware 3.1 and later 3.x.
pub const ECHO_PCP: Dialect = Dialect {
    id: "pcp",
    label: "Echo PCP v3.1.X",
    root_tag: "SMARTSWITCH2",
    rack_tag: "CABINET",
    output_tag: "RELAY",
    output_attr: "RELAY",
    fade_time_attr: "UPTIME",
    versions: VersionRule::Range {
        min: &[3, 1],
        below: &[4],
    },
};

/// Echo Architectural Control Processor, firmware 2.0.x.
pub const ECHO_ACP: Dialect = Dialect {
    id: "acp",
    label: "Echo ACP v2.0.X",
    root_tag: "EACP",
    rack_tag: "RACK",
    output_tag: "OUTPUT",
    output_attr: "OUTPUT",
    fade_time_attr: "PREFADELEVEL",
    versions: VersionRule::Prefix(&[2, 0]),
};

/// Known dialects in the order they are tried when detecting a file's type.
pub const DIALECTS: &[&Dialect] = &[&ECHO_PCP, &ECHO_ACP];

/// Look up a known dialect by its identifier.
pub fn dialect_by_id(id: &str) -> Option<&'static Dialect> {
    DIALECTS.iter().copied().find(|dialect| dialect.id == id)
}

impl Dialect {
    /// Whether the rack container's `VERSION` value is one this family reads.
    pub fn is_version_compatible(&self, version: &str) -> bool {
        parse_version(version).is_some_and(|parts| self.versions.matches(&parts))
    }

    /// Classify a start element by local name.
    pub fn classify(&self, local_name: &[u8]) -> Option<ElementKind> {
        if local_name == self.rack_tag.as_bytes() {
            Some(ElementKind::Rack)
        } else if local_name == self.output_tag.as_bytes() {
            Some(ElementKind::Output)
        } else if local_name == SPACE_TAG.as_bytes() {
            Some(ElementKind::Space)
        } else if local_name == PRESET_TAG.as_bytes() {
            Some(ElementKind::Preset)
        } else if local_name == FADE_TIME_TAG.as_bytes() {
            Some(ElementKind::FadeTime)
        } else if local_name == LEVEL_TAG.as_bytes() {
            Some(ElementKind::Level)
        } else {
            None
        }
    }
}

/// Parse the leading dotted-decimal part of a version string.
///
/// `"3.1.4"` and `"2.0.1-rc2"` parse; `""`, `"v3"` and `"3..1"` do not.
pub fn parse_version(text: &str) -> Option<Vec<u32>> {
    let text = text.trim();
    let mut parts = Vec::new();
    let mut rest = text;
    loop {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        parts.push(rest[..digits].parse().ok()?);
        rest = &rest[digits..];
        match rest.strip_prefix('.') {
            Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
            Some(_) => return None,
            None => return Some(parts),
        }
    }
}

fn compare_versions(lhs: &[u32], rhs: &[u32]) -> Ordering {
    let len = lhs.len().max(rhs.len());
    for idx in 0..len {
        let a = lhs.get(idx).copied().unwrap_or(0);
        let b = rhs.get(idx).copied().unwrap_or(0);
        match a.cmp(&b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
