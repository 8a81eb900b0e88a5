use std::io::BufRead;

use echo_model::{Circuit, Config, Preset, UNMOUNTED};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::dialect::{Dialect, ElementKind};
use crate::document::{check_rack, skip_bom, space_variant, xml_error, DocumentWalker};
use crate::names::{
    FADE_TIME_TAG, LEVEL_ATTR, LEVEL_TAG, NUMBER_ATTR, PRESET_TAG, SPACE_ATTR, SPACE_IN_RACK_ATTR,
    SPACE_TAG, ZONE_ATTR,
};
use crate::tag::required_u32;
use crate::XmlError;

/// Parse a panel document of `dialect` into a fresh [`Config`].
///
/// Spaces fill the rack map of the returned configuration. Fade time entries
/// for rack positions without a mounted space are skipped.
pub fn parse<R: BufRead>(mut source: R, dialect: &Dialect) -> Result<Config, XmlError> {
    skip_bom(&mut source)?;
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut state = ParseState {
        dialect,
        walker: DocumentWalker::new(dialect),
        config: Config::new(),
        preset: None,
    };
    state.config.set_dialect(Some(dialect.id.to_string()));

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                state.start(&e)?;
                state.walker.open();
            }
            Ok(Event::Empty(e)) => state.start(&e)?,
            Ok(Event::End(_)) => state.walker.close(),
            Ok(Event::Eof) => break,
            Err(err) => return Err(xml_error(err, reader.buffer_position())),
            _ => {}
        }
        buf.clear();
    }
    state.walker.finish()?;

    let mut config = state.config;
    if let Some(preset) = state.preset.take() {
        config.commit_preset(preset);
    }
    info!(
        dialect = dialect.id,
        circuits = config.circuit_count(),
        spaces = config.space_count(),
        presets = config.preset_count(),
        "parsed panel configuration"
    );
    Ok(config)
}

/// Parse an in-memory panel document.
pub fn parse_str(xml: &str, dialect: &Dialect) -> Result<Config, XmlError> {
    parse(xml.as_bytes(), dialect)
}

struct ParseState<'d> {
    dialect: &'d Dialect,
    walker: DocumentWalker<'d>,
    config: Config,
    /// Preset being filled; committed when the next one starts or at the end.
    preset: Option<Preset>,
}

impl ParseState<'_> {
    fn start(&mut self, event: &BytesStart<'_>) -> Result<(), XmlError> {
        let Some(kind) = self.walker.enter(event)? else {
            return Ok(());
        };
        match kind {
            ElementKind::Rack => {
                let name = check_rack(event, self.dialect)?;
                self.config.set_name(name);
            }
            ElementKind::Output => {
                let tag = self.dialect.output_tag;
                let circuit = Circuit {
                    num: required_u32(event, tag, NUMBER_ATTR)?,
                    space: required_u32(event, tag, SPACE_ATTR)?,
                    zone: required_u32(event, tag, ZONE_ATTR)?,
                };
                self.config.upsert_circuit(circuit);
            }
            ElementKind::Space => {
                let variant = space_variant(event)?;
                let space = required_u32(event, SPACE_TAG, variant.number_attr())?;
                if space == UNMOUNTED {
                    debug!("skip unmounted space");
                    return Ok(());
                }
                let rack_pos = required_u32(event, SPACE_TAG, variant.rack_attr())?;
                self.config.upsert_space(space);
                if rack_pos == UNMOUNTED {
                    debug!(space, "space without rack position");
                    return Ok(());
                }
                let rack = self.config.rack();
                if rack.space_at(rack_pos).is_some() || rack.rack_pos_of(space).is_some() {
                    return Err(XmlError::DuplicateMount { rack_pos, space });
                }
                self.config.rack_mut().insert(rack_pos, space);
            }
            ElementKind::Preset => {
                let num = required_u32(event, PRESET_TAG, NUMBER_ATTR)?;
                if let Some(done) = self.preset.replace(Preset::new(num)) {
                    self.config.commit_preset(done);
                }
            }
            ElementKind::FadeTime => {
                let preset = self.preset.as_mut().ok_or(XmlError::NoCurrentPreset {
                    element: FADE_TIME_TAG,
                })?;
                let rack_pos = required_u32(event, FADE_TIME_TAG, SPACE_IN_RACK_ATTR)?;
                let seconds = required_u32(event, FADE_TIME_TAG, self.dialect.fade_time_attr)?;
                match self.config.rack().space_at(rack_pos) {
                    Some(space) => {
                        preset.fade_times.insert(space, seconds);
                    }
                    None => debug!(
                        preset = preset.num,
                        rack_pos, "skip fade time for unmounted rack position"
                    ),
                }
            }
            ElementKind::Level => {
                let preset = self.preset.as_mut().ok_or(XmlError::NoCurrentPreset {
                    element: LEVEL_TAG,
                })?;
                let circuit = required_u32(event, LEVEL_TAG, self.dialect.output_attr)?;
                let level = required_u32(event, LEVEL_TAG, LEVEL_ATTR)?;
                let level = u8::try_from(level).map_err(|_| XmlError::OutOfRange {
                    element: LEVEL_TAG,
                    attribute: LEVEL_ATTR,
                    value: level,
                    max: u8::MAX.into(),
                })?;
                preset.levels.insert(circuit, level);
            }
        }
        Ok(())
    }
}
