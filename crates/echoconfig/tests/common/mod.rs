#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use echoconfig::sheet::{Cell, CellGrid, Workbook};
use echoconfig::xml::{SpaceVariant, ECHO_PCP};
use echoconfig::Dialect;

/// Level every circuit has in `preset`: 255, 192, 128, 64 repeating.
pub fn cycle_level(preset: u32) -> u8 {
    match preset % 4 {
        1 => 255,
        2 => 192,
        3 => 128,
        _ => 64,
    }
}

pub const FADE_SECONDS: u32 = 3;

/// Generator for panel documents of any dialect.
pub struct Panel {
    pub dialect: &'static Dialect,
    pub version: &'static str,
    pub name: &'static str,
    pub circuits: u32,
    /// `(rack position, space number)` in document order.
    pub spaces: Vec<(u32, u32)>,
    pub presets: u32,
}

impl Panel {
    /// 48 circuits over spaces 1 and 2, 64 presets with cycling levels.
    pub fn scenario_a() -> Self {
        Self {
            dialect: &ECHO_PCP,
            version: "3.1.2",
            name: "Main Stage",
            circuits: 48,
            spaces: vec![(1, 1), (2, 2)],
            presets: 64,
        }
    }

    pub fn space_of(&self, circuit: u32) -> u32 {
        self.spaces[(circuit as usize - 1) % self.spaces.len()].1
    }

    pub fn zone_of(&self, circuit: u32) -> u32 {
        (circuit - 1) / 16 + 1
    }

    pub fn to_xml(&self) -> String {
        let d = self.dialect;
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<!-- Echo configuration export -->\n");
        let _ = writeln!(xml, "<{} xmlns:x=\"urn:echo:ext\">", d.root_tag);
        let _ = writeln!(
            xml,
            "  <{} VERSION=\"{}\" NAME=\"{}\">",
            d.rack_tag, self.version, self.name
        );
        xml.push_str("    <SCHEDULE ENABLED=\"0\" x:mode=\"weekly\"/>\n");

        let _ = writeln!(xml, "    <{}S>", d.output_tag);
        for circuit in 1..=self.circuits {
            let _ = writeln!(
                xml,
                "      <{} NUMBER=\"{circuit}\" SPACE=\"{}\" ZONE=\"{}\"/>",
                d.output_tag,
                self.space_of(circuit),
                self.zone_of(circuit)
            );
        }
        let _ = writeln!(xml, "    </{}S>", d.output_tag);

        xml.push_str("    <SPACES>\n");
        for &(rack, space) in &self.spaces {
            let v = SpaceVariant::for_space(space);
            let _ = writeln!(
                xml,
                "      <SPACE {}=\"{rack}\" {}=\"{space}\" {}=\"Space {space}\"/>",
                v.rack_attr(),
                v.number_attr(),
                v.name_attr()
            );
        }
        xml.push_str("    </SPACES>\n");

        xml.push_str("    <PRESETS>\n");
        for preset in 1..=self.presets {
            let _ = writeln!(xml, "      <PRESET NUMBER=\"{preset}\">");
            for &(rack, _) in &self.spaces {
                let _ = writeln!(
                    xml,
                    "        <PREFADELEVEL SPACEINRACK=\"{rack}\" {}=\"{FADE_SECONDS}\"/>",
                    d.fade_time_attr
                );
            }
            for circuit in 1..=self.circuits {
                let _ = writeln!(
                    xml,
                    "        <PRELEVEL {}=\"{circuit}\" LEVEL=\"{}\"/>",
                    d.output_attr,
                    cycle_level(preset)
                );
            }
            xml.push_str("      </PRESET>\n");
        }
        xml.push_str("    </PRESETS>\n");
        let _ = writeln!(xml, "  </{}>", d.rack_tag);
        let _ = writeln!(xml, "</{}>", d.root_tag);
        xml
    }

    pub fn write_to(&self, dir: &Path, file: &str) -> PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, self.to_xml()).expect("write base document");
        path
    }
}

/// Column of `header` in row 0 of `sheet`.
pub fn column_of(book: &Workbook, sheet: &str, header: &str) -> u32 {
    let grid = book.grid(sheet).expect("sheet exists");
    let (_, cols) = grid.extent();
    (0..cols)
        .find(|&col| grid.cell(0, col) == Cell::from(header))
        .unwrap_or_else(|| panic!("no {header:?} column in {sheet}"))
}

/// Apply `edit` to every data cell of one column.
pub fn edit_column(book: &mut Workbook, sheet: &str, col: u32, edit: impl Fn(i64) -> i64) {
    let grid = book.grid_mut(sheet).expect("sheet exists");
    let (rows, _) = grid.extent();
    for row in 1..rows {
        if let Cell::Int(value) = grid.cell(row, col) {
            grid.set(row, col, Cell::Int(edit(value)));
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
