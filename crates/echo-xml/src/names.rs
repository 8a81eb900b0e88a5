//! Element and attribute names shared by every Echo panel dialect.

use echo_model::is_primary_space;

/// Space element (`SPACE`).
pub const SPACE_TAG: &str = "SPACE";
/// Preset element (`PRESET`).
pub const PRESET_TAG: &str = "PRESET";
/// Per-space fade time entry inside a preset (`PREFADELEVEL`).
pub const FADE_TIME_TAG: &str = "PREFADELEVEL";
/// Per-circuit level entry inside a preset (`PRELEVEL`).
pub const LEVEL_TAG: &str = "PRELEVEL";

/// Firmware version on the rack container (`VERSION`).
pub const VERSION_ATTR: &str = "VERSION";
/// Display name on the rack container and on spaces (`NAME`).
pub const NAME_ATTR: &str = "NAME";
/// Entity number on outputs, spaces and presets (`NUMBER`).
pub const NUMBER_ATTR: &str = "NUMBER";
/// Logical space of an output (`SPACE`).
pub const SPACE_ATTR: &str = "SPACE";
/// Zone of an output (`ZONE`).
pub const ZONE_ATTR: &str = "ZONE";
/// Level of a preset entry (`LEVEL`).
pub const LEVEL_ATTR: &str = "LEVEL";
/// Rack position of a primary space and of fade time entries (`SPACEINRACK`).
pub const SPACE_IN_RACK_ATTR: &str = "SPACEINRACK";
/// Rack position of an extended space (`SPACEINRACKEXT`).
pub const SPACE_IN_RACK_EXT_ATTR: &str = "SPACEINRACKEXT";
/// Number of an extended space (`NUMBEREXT`).
pub const NUMBER_EXT_ATTR: &str = "NUMBEREXT";
/// Name of an extended space (`NAMEEXT`).
pub const NAME_EXT_ATTR: &str = "NAMEEXT";

/// Which attribute set a `SPACE` element uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceVariant {
    /// `SPACEINRACK` / `NUMBER` / `NAME`, for spaces 1-16.
    Primary,
    /// `SPACEINRACKEXT` / `NUMBEREXT` / `NAMEEXT`, for everything else.
    Extended,
}

impl SpaceVariant {
    /// Variant a space number must be written with.
    pub fn for_space(num: u32) -> Self {
        if is_primary_space(num) {
            SpaceVariant::Primary
        } else {
            SpaceVariant::Extended
        }
    }

    pub const fn rack_attr(self) -> &'static str {
        match self {
            SpaceVariant::Primary => SPACE_IN_RACK_ATTR,
            SpaceVariant::Extended => SPACE_IN_RACK_EXT_ATTR,
        }
    }

    pub const fn number_attr(self) -> &'static str {
        match self {
            SpaceVariant::Primary => NUMBER_ATTR,
            SpaceVariant::Extended => NUMBER_EXT_ATTR,
        }
    }

    pub const fn name_attr(self) -> &'static str {
        match self {
            SpaceVariant::Primary => NAME_ATTR,
            SpaceVariant::Extended => NAME_EXT_ATTR,
        }
    }
}
