use std::collections::BTreeSet;
use std::io::{BufRead, Read, Write};

use echo_model::{Config, Preset, Reference, UNMOUNTED};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::dialect::{Dialect, ElementKind};
use crate::document::{check_rack, skip_bom, space_variant, xml_error, DocumentWalker, UTF8_BOM};
use crate::names::{
    SpaceVariant, FADE_TIME_TAG, LEVEL_ATTR, LEVEL_TAG, NUMBER_ATTR, PRESET_TAG, SPACE_ATTR,
    SPACE_IN_RACK_ATTR, SPACE_TAG, ZONE_ATTR,
};
use crate::tag::{required_u32, TagPatch};
use crate::XmlError;

/// Copy `base` to `out`, replacing the attribute values the model owns.
///
/// The output is the base document byte for byte except for start tags
/// whose values differ from `config`; in those only the affected attribute
/// keys and values are replaced. Anything the base document names that
/// `config` lacks is a [`XmlError::DanglingReference`]. `out` receives
/// partial output on error, so callers publishing to a file should write to
/// a temporary first.
pub fn rewrite<R, W>(config: &Config, dialect: &Dialect, mut base: R, mut out: W) -> Result<(), XmlError>
where
    R: BufRead,
    W: Write,
{
    let bom = skip_bom(&mut base)?;
    let mut source = Vec::new();
    base.read_to_end(&mut source)?;
    if bom {
        out.write_all(UTF8_BOM)?;
    }

    let mut reader = Reader::from_reader(source.as_slice());
    let mut buf = Vec::new();
    let mut state = RewriteState {
        config,
        dialect,
        walker: DocumentWalker::new(dialect),
        preset: None,
        unmounted: BTreeSet::new(),
        patched: 0,
    };
    // Source bytes up to here are already in `out`.
    let mut copied = 0;

    loop {
        let start = reader.buffer_position();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| xml_error(err, reader.buffer_position()))?;
        let (patched, close) = match event {
            Event::Eof => break,
            Event::Start(e) => {
                let patched = state.patch(&e)?;
                state.walker.open();
                (patched, &b">"[..])
            }
            Event::Empty(e) => (state.patch(&e)?, &b"/>"[..]),
            Event::End(_) => {
                state.walker.close();
                (None, &b""[..])
            }
            _ => (None, &b""[..]),
        };
        if let Some(tag) = patched {
            debug_assert_eq!(source.get(start), Some(&b'<'));
            out.write_all(&source[copied..start])?;
            out.write_all(b"<")?;
            out.write_all(&tag)?;
            out.write_all(close)?;
            copied = reader.buffer_position();
        }
        buf.clear();
    }
    state.walker.finish()?;
    out.write_all(&source[copied..])?;
    out.flush()?;

    info!(
        dialect = dialect.id,
        patched = state.patched,
        "rewrote panel configuration"
    );
    Ok(())
}

struct RewriteState<'c, 'd> {
    config: &'c Config,
    dialect: &'d Dialect,
    walker: DocumentWalker<'d>,
    preset: Option<&'c Preset>,
    /// Rack positions whose `SPACE` element was left unmounted.
    unmounted: BTreeSet<u32>,
    patched: usize,
}

impl<'c> RewriteState<'c, '_> {
    fn patch(&mut self, event: &BytesStart<'_>) -> Result<Option<BytesStart<'static>>, XmlError> {
        let Some(kind) = self.walker.enter(event)? else {
            return Ok(None);
        };
        let mut tag = TagPatch::new(event)?;
        match kind {
            ElementKind::Rack => {
                check_rack(event, self.dialect)?;
            }
            ElementKind::Output => {
                let element = self.dialect.output_tag;
                let num = required_u32(event, element, NUMBER_ATTR)?;
                required_u32(event, element, SPACE_ATTR)?;
                required_u32(event, element, ZONE_ATTR)?;
                let circuit = self.config.circuit(num)?;
                tag.set_u32(SPACE_ATTR, circuit.space);
                tag.set_u32(ZONE_ATTR, circuit.zone);
            }
            ElementKind::Space => self.patch_space(event, &mut tag)?,
            ElementKind::Preset => {
                let num = required_u32(event, PRESET_TAG, NUMBER_ATTR)?;
                self.preset = Some(self.config.preset(num)?);
            }
            ElementKind::FadeTime => {
                let preset = self.preset.ok_or(XmlError::NoCurrentPreset {
                    element: FADE_TIME_TAG,
                })?;
                let fade_attr = self.dialect.fade_time_attr;
                let rack_pos = required_u32(event, FADE_TIME_TAG, SPACE_IN_RACK_ATTR)?;
                required_u32(event, FADE_TIME_TAG, fade_attr)?;
                match self.config.rack().space_at(rack_pos) {
                    Some(space) => {
                        tag.set_u32(fade_attr, preset.fade_time(space)?);
                    }
                    None if rack_pos == UNMOUNTED || self.unmounted.contains(&rack_pos) => {
                        debug!(preset = preset.num, rack_pos, "keep fade time of unmounted slot");
                    }
                    None => {
                        return Err(XmlError::DanglingReference(Reference::RackPosition(
                            rack_pos,
                        )))
                    }
                }
            }
            ElementKind::Level => {
                let preset = self.preset.ok_or(XmlError::NoCurrentPreset { element: LEVEL_TAG })?;
                let circuit = required_u32(event, LEVEL_TAG, self.dialect.output_attr)?;
                required_u32(event, LEVEL_TAG, LEVEL_ATTR)?;
                tag.set_u32(LEVEL_ATTR, preset.level(circuit)?.into());
            }
        }
        let patched = tag.finish()?;
        if patched.is_some() {
            self.patched += 1;
        }
        Ok(patched)
    }

    /// Write the space mounted at this rack position, switching between the
    /// primary and extended attribute sets when the space number crosses
    /// the primary range.
    fn patch_space(&mut self, event: &BytesStart<'_>, tag: &mut TagPatch<'_>) -> Result<(), XmlError> {
        let variant = space_variant(event)?;
        let current = required_u32(event, SPACE_TAG, variant.number_attr())?;
        let rack_pos = match required_u32(event, SPACE_TAG, variant.rack_attr()) {
            Ok(rack_pos) => rack_pos,
            Err(err) if current == UNMOUNTED => {
                debug!(error = %err, "keep unmounted space with unreadable rack position");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let Some(space) = self.config.rack().space_at(rack_pos) else {
            if rack_pos == UNMOUNTED || current == UNMOUNTED {
                self.unmounted.insert(rack_pos);
                return Ok(());
            }
            return Err(XmlError::DanglingReference(Reference::RackPosition(rack_pos)));
        };
        self.config.space(space)?;

        let target = SpaceVariant::for_space(space);
        if target != variant {
            debug!(rack_pos, space, ?target, "switch space attribute set");
            tag.rename(variant.rack_attr(), target.rack_attr());
            tag.rename(variant.number_attr(), target.number_attr());
            tag.rename(variant.name_attr(), target.name_attr());
        }
        tag.set_u32(target.rack_attr(), rack_pos);
        tag.set_u32(target.number_attr(), space);
        Ok(())
    }
}
