use serde::{Deserialize, Serialize};

/// Sheet names and header labels of the workbook layout.
///
/// Missing fields fall back to the English defaults when deserialized, so a
/// partial override file only needs the labels it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLabels {
    pub levels_sheet: String,
    pub times_sheet: String,
    pub circuit: String,
    pub space: String,
    pub zone: String,
    /// Prefix of preset columns, followed by one space and the preset number.
    pub preset: String,
}

impl Default for SheetLabels {
    fn default() -> Self {
        Self {
            levels_sheet: "Levels".into(),
            times_sheet: "Times".into(),
            circuit: "Circuit".into(),
            space: "Space".into(),
            zone: "Zone".into(),
            preset: "Preset".into(),
        }
    }
}

impl SheetLabels {
    pub fn preset_header(&self, num: u32) -> String {
        format!("{} {num}", self.preset)
    }

    /// Preset number named by a header such as `"Preset 12"`.
    pub fn parse_preset_header(&self, header: &str) -> Option<u32> {
        let digits = header
            .trim()
            .strip_prefix(self.preset.as_str())?
            .strip_prefix(' ')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|&num| num > 0)
    }
}
