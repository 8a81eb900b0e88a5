//! Echo panel configuration facade.
//!
//! Detects which panel family an XML file belongs to, converts it to and
//! from the Levels/Times spreadsheet and writes edits back into a copy of
//! the original file without disturbing anything the model does not own.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # fn run() -> Result<(), echoconfig::EchoConfigError> {
//! let base = Path::new("panel.xml");
//! let mut config = echoconfig::load_config(base)?;
//! println!("{} '{}'", echoconfig::panel_type(&config), echoconfig::panel_name(&config));
//! echoconfig::export_sheet(&config, Path::new("panel.xlsx"))?;
//! // ... the spreadsheet is edited ...
//! echoconfig::import_sheet(&mut config, Path::new("panel.xlsx"))?;
//! echoconfig::rewrite_config(&config, base, Path::new("panel-new.xml"))?;
//! # Ok(())
//! # }
//! ```

mod atomic;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

pub use echo_model as model;
pub use echo_sheet as sheet;
pub use echo_xml as xml;

pub use echo_model::{Circuit, Config, Preset, RackMap, Reference, Space};
pub use echo_sheet::{SheetError, SheetLabels};
pub use echo_xml::{Dialect, XmlError, DIALECTS};

use crate::atomic::write_atomic;

/// Error type produced by the configuration facade.
#[derive(Debug, Error)]
pub enum EchoConfigError {
    /// No known dialect accepts the file's root element.
    #[error("{}: not a recognized panel configuration", path.display())]
    UnrecognizedFormat { path: PathBuf },
    /// The configuration names a dialect this build does not know.
    #[error("unknown panel dialect {0:?}")]
    UnknownDialect(String),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    /// Opening, creating or publishing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of [`EchoConfigError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Wrong root, unsupported version, or a missing or malformed column,
    /// attribute or value.
    Structural,
    /// A rewrite met a circuit, space, rack position or preset the model lacks.
    Reference,
    /// A value is numeric but outside its allowed range.
    Range,
    /// Reading or publishing a file failed.
    Io,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorClass::Structural => "structural",
            ErrorClass::Reference => "reference",
            ErrorClass::Range => "range",
            ErrorClass::Io => "io",
        })
    }
}

impl EchoConfigError {
    fn io(path: &Path, source: io::Error) -> Self {
        EchoConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            EchoConfigError::UnrecognizedFormat { .. } | EchoConfigError::UnknownDialect(_) => {
                ErrorClass::Structural
            }
            EchoConfigError::Io { .. } => ErrorClass::Io,
            EchoConfigError::Xml(err) => match err {
                XmlError::Io(_) => ErrorClass::Io,
                XmlError::DanglingReference(_) => ErrorClass::Reference,
                XmlError::OutOfRange { .. } => ErrorClass::Range,
                XmlError::Xml(_)
                | XmlError::BadRoot { .. }
                | XmlError::IncompatibleVersion { .. }
                | XmlError::MissingAttribute { .. }
                | XmlError::NotANumber { .. }
                | XmlError::MissingSpaceAttribute
                | XmlError::NoCurrentPreset { .. }
                | XmlError::DuplicateMount { .. }
                | XmlError::MalformedTag(_) => ErrorClass::Structural,
            },
            EchoConfigError::Sheet(err) => match err {
                SheetError::Workbook(_) | SheetError::Xlsx(_) => ErrorClass::Io,
                SheetError::OutOfRange { .. } => ErrorClass::Range,
                SheetError::MissingSheet(_)
                | SheetError::MissingColumn { .. }
                | SheetError::MissingValue { .. }
                | SheetError::NotANumber { .. }
                | SheetError::TooManyColumns { .. } => ErrorClass::Structural,
            },
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, EchoConfigError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| EchoConfigError::io(path, err))
}

/// Parse `path` with each known dialect in priority order.
///
/// A dialect whose root element does not match is passed over silently.
/// When no dialect accepts the file, the first error from a dialect whose
/// root did match is returned, or [`EchoConfigError::UnrecognizedFormat`]
/// when none matched.
fn detect(path: &Path) -> Result<(Config, &'static Dialect), EchoConfigError> {
    let mut first_err = None;
    for dialect in DIALECTS.iter().copied() {
        match echo_xml::parse(open(path)?, dialect) {
            Ok(config) => {
                info!(path = %path.display(), dialect = dialect.id, "recognized panel configuration");
                return Ok((config, dialect));
            }
            Err(XmlError::BadRoot { found, .. }) => {
                debug!(dialect = dialect.id, %found, "root element does not match");
            }
            Err(XmlError::Io(err)) => return Err(EchoConfigError::io(path, err)),
            Err(err) => {
                warn!(dialect = dialect.id, error = %err, "rejected dialect candidate");
                first_err.get_or_insert(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err.into()),
        None => Err(EchoConfigError::UnrecognizedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the panel configuration stored at `path`.
pub fn load_config(path: &Path) -> Result<Config, EchoConfigError> {
    detect(path).map(|(config, _)| config)
}

/// Dialect of the panel configuration stored at `path`.
pub fn resolve_dialect(path: &Path) -> Result<&'static Dialect, EchoConfigError> {
    detect(path).map(|(_, dialect)| dialect)
}

/// Dialect `config` was read with, if it names a known one.
pub fn dialect_for(config: &Config) -> Option<&'static Dialect> {
    config.dialect().and_then(echo_xml::dialect_by_id)
}

/// Human readable panel type, e.g. `"Echo PCP v3.1.X"`.
pub fn panel_type(config: &Config) -> &'static str {
    dialect_for(config).map_or("Unknown panel", |dialect| dialect.label)
}

pub fn panel_name(config: &Config) -> &str {
    config.name()
}

/// Replace the content of `config` with the workbook at `path`.
pub fn import_sheet(config: &mut Config, path: &Path) -> Result<(), EchoConfigError> {
    import_sheet_with(config, path, &SheetLabels::default())
}

pub fn import_sheet_with(
    config: &mut Config,
    path: &Path,
    labels: &SheetLabels,
) -> Result<(), EchoConfigError> {
    let mut source = echo_sheet::XlsxSource::open(path)?;
    echo_sheet::import(config, &mut source, labels)?;
    Ok(())
}

/// Write `config` as an xlsx workbook to `path`.
pub fn export_sheet(config: &Config, path: &Path) -> Result<(), EchoConfigError> {
    export_sheet_with(config, path, &SheetLabels::default())
}

pub fn export_sheet_with(
    config: &Config,
    path: &Path,
    labels: &SheetLabels,
) -> Result<(), EchoConfigError> {
    let bytes = echo_sheet::to_xlsx(&echo_sheet::export(config, labels))?;
    write_atomic(path, |file| {
        file.write_all(&bytes)
            .map_err(|err| EchoConfigError::io(path, err))
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote spreadsheet");
    Ok(())
}

/// Write a copy of `base` to `out` with the values of `config` patched in.
///
/// `out` is only replaced once the whole document has been rewritten; on
/// error it keeps its previous content. `base` and `out` may be the same
/// file.
pub fn rewrite_config(config: &Config, base: &Path, out: &Path) -> Result<(), EchoConfigError> {
    let dialect = match config.dialect() {
        Some(id) => echo_xml::dialect_by_id(id)
            .ok_or_else(|| EchoConfigError::UnknownDialect(id.to_string()))?,
        None => resolve_dialect(base)?,
    };
    for reference in config.check_references() {
        warn!(%reference, "configuration refers to a missing entry");
    }
    let source = open(base)?;
    write_atomic(out, |file| {
        echo_xml::rewrite(config, dialect, source, BufWriter::new(file))
    })?;
    info!(base = %base.display(), out = %out.display(), dialect = dialect.id, "rewrote configuration");
    Ok(())
}

/// Load `base`, replace its content with the workbook at `sheet` and write
/// the result to `out`. Returns the imported configuration.
pub fn apply_sheet(
    base: &Path,
    sheet: &Path,
    out: &Path,
    labels: &SheetLabels,
) -> Result<Config, EchoConfigError> {
    let mut config = load_config(base)?;
    import_sheet_with(&mut config, sheet, labels)?;
    rewrite_config(&config, base, out)?;
    Ok(config)
}
