//! Echo panel domain model: circuits, spaces, presets and the [`Config`]
//! aggregate that the XML and spreadsheet codecs read from and write into.

mod rack;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use rack::RackMap;

/// Sentinel used by panels for "no space" / "no rack slot".
pub const UNMOUNTED: u32 = 0;

/// Space numbers addressed through the primary attribute set.
pub const PRIMARY_SPACES: RangeInclusive<u32> = 1..=16;

/// Identifies a model entity referenced from somewhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Circuit(u32),
    Space(u32),
    RackPosition(u32),
    Preset(u32),
    /// Level of `circuit` inside preset `preset`.
    Level { preset: u32, circuit: u32 },
    /// Fade time of `space` inside preset `preset`.
    FadeTime { preset: u32, space: u32 },
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Circuit(num) => write!(f, "circuit {num}"),
            Reference::Space(num) => write!(f, "space {num}"),
            Reference::RackPosition(num) => write!(f, "rack position {num}"),
            Reference::Preset(num) => write!(f, "preset {num}"),
            Reference::Level { preset, circuit } => {
                write!(f, "level of circuit {circuit} in preset {preset}")
            }
            Reference::FadeTime { preset, space } => {
                write!(f, "fade time of space {space} in preset {preset}")
            }
        }
    }
}

/// Error type produced by model lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The referenced entity is not part of the model.
    #[error("{0} not found")]
    NotFound(Reference),
}

/// A single controllable output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Circuit {
    pub num: u32,
    pub space: u32,
    pub zone: u32,
}

/// A logical space served by one or more circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Space {
    pub num: u32,
}

impl Space {
    /// Whether the space is addressed through the primary attribute set (1-16).
    pub fn is_primary(&self) -> bool {
        is_primary_space(self.num)
    }
}

/// Whether `num` falls in the primary space range.
pub fn is_primary_space(num: u32) -> bool {
    PRIMARY_SPACES.contains(&num)
}

/// A lighting scene: per-circuit levels and per-space fade durations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub num: u32,
    /// Circuit number -> level.
    pub levels: BTreeMap<u32, u8>,
    /// Logical space number -> fade time in seconds.
    pub fade_times: BTreeMap<u32, u32>,
}

impl Preset {
    pub fn new(num: u32) -> Self {
        Self {
            num,
            ..Self::default()
        }
    }

    pub fn level(&self, circuit: u32) -> Result<u8, ModelError> {
        self.levels
            .get(&circuit)
            .copied()
            .ok_or(ModelError::NotFound(Reference::Level {
                preset: self.num,
                circuit,
            }))
    }

    pub fn fade_time(&self, space: u32) -> Result<u32, ModelError> {
        self.fade_times
            .get(&space)
            .copied()
            .ok_or(ModelError::NotFound(Reference::FadeTime {
                preset: self.num,
                space,
            }))
    }
}

/// All circuits, spaces and presets of one panel.
///
/// Circuits and spaces iterate in insertion order, presets by number. The
/// rack map is working state for the codecs and does not take part in
/// equality.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    name: String,
    dialect: Option<String>,
    circuits: IndexMap<u32, Circuit>,
    spaces: IndexMap<u32, Space>,
    presets: BTreeMap<u32, Preset>,
    #[serde(skip)]
    rack: RackMap,
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.dialect == other.dialect
            && self.circuits == other.circuits
            && self.spaces == other.spaces
            && self.presets == other.presets
    }
}

impl Eq for Config {}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name of the panel.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Identifier of the dialect the configuration was read with, if any.
    pub fn dialect(&self) -> Option<&str> {
        self.dialect.as_deref()
    }

    pub fn set_dialect(&mut self, dialect: Option<String>) {
        self.dialect = dialect;
    }

    /// Fresh configuration carrying only this one's name and dialect.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            dialect: self.dialect.clone(),
            ..Self::default()
        }
    }

    pub fn circuits(&self) -> impl ExactSizeIterator<Item = &Circuit> + '_ {
        self.circuits.values()
    }

    pub fn circuit(&self, num: u32) -> Result<&Circuit, ModelError> {
        self.circuits
            .get(&num)
            .ok_or(ModelError::NotFound(Reference::Circuit(num)))
    }

    pub fn circuit_mut(&mut self, num: u32) -> Result<&mut Circuit, ModelError> {
        self.circuits
            .get_mut(&num)
            .ok_or(ModelError::NotFound(Reference::Circuit(num)))
    }

    pub fn circuit_count(&self) -> usize {
        self.circuits.len()
    }

    /// Insert or overwrite a circuit; a mounted space it names is recorded too.
    pub fn upsert_circuit(&mut self, circuit: Circuit) {
        self.upsert_space(circuit.space);
        match self.circuits.get_mut(&circuit.num) {
            Some(existing) => *existing = circuit,
            None => {
                self.circuits.insert(circuit.num, circuit);
            }
        }
    }

    pub fn spaces(&self) -> impl ExactSizeIterator<Item = &Space> + '_ {
        self.spaces.values()
    }

    pub fn space(&self, num: u32) -> Result<&Space, ModelError> {
        self.spaces
            .get(&num)
            .ok_or(ModelError::NotFound(Reference::Space(num)))
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// Record space `num`. The unmounted sentinel is never recorded.
    pub fn upsert_space(&mut self, num: u32) -> bool {
        if num == UNMOUNTED {
            return false;
        }
        self.spaces.entry(num).or_insert(Space { num });
        true
    }

    pub fn presets(&self) -> impl ExactSizeIterator<Item = &Preset> + '_ {
        self.presets.values()
    }

    pub fn preset(&self, num: u32) -> Result<&Preset, ModelError> {
        self.presets
            .get(&num)
            .ok_or(ModelError::NotFound(Reference::Preset(num)))
    }

    /// Preset `num`, created empty if it does not exist yet.
    pub fn preset_entry(&mut self, num: u32) -> &mut Preset {
        self.presets.entry(num).or_insert_with(|| Preset::new(num))
    }

    /// Insert a preset, replacing any existing preset with the same number.
    pub fn commit_preset(&mut self, preset: Preset) {
        debug!(
            preset = preset.num,
            levels = preset.levels.len(),
            fade_times = preset.fade_times.len(),
            "commit preset"
        );
        self.presets.insert(preset.num, preset);
    }

    pub fn preset_count(&self) -> usize {
        self.presets.len()
    }

    /// Rack position <-> space bijection currently in effect.
    pub fn rack(&self) -> &RackMap {
        &self.rack
    }

    pub fn rack_mut(&mut self) -> &mut RackMap {
        &mut self.rack
    }

    /// Replace the rack map with one synthesized from the known spaces.
    pub fn synthesize_rack(&mut self) {
        self.rack = RackMap::synthesize(self.spaces.keys().copied());
    }

    /// Preset entries pointing at circuits or spaces the model does not know.
    pub fn check_references(&self) -> Vec<Reference> {
        let mut dangling = Vec::new();
        for preset in self.presets.values() {
            for &circuit in preset.levels.keys() {
                if !self.circuits.contains_key(&circuit) {
                    dangling.push(Reference::Level {
                        preset: preset.num,
                        circuit,
                    });
                }
            }
            for &space in preset.fade_times.keys() {
                if !self.spaces.contains_key(&space) {
                    dangling.push(Reference::FadeTime {
                        preset: preset.num,
                        space,
                    });
                }
            }
        }
        dangling
    }
}
