use std::{fmt, str::FromStr};

use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};

use super::BlockMetrics;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// Top or left
    Start,
    /// Middle or center
    Center,
    /// Bottom or right
    End,
}

impl Default for Align {
    fn default() -> Self {
        Align::Start
    }
}

/// Which point of a text block is placed on the anchor point.
///
/// Written and parsed as `vertical-horizontal` names such as
/// `"top-left"` or `"bottom-center"`; the middle of the block
/// is just `"center"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Anchor {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor::new(Align::Start, Align::Start);
    pub const TOP_CENTER: Anchor = Anchor::new(Align::Center, Align::Start);
    pub const TOP_RIGHT: Anchor = Anchor::new(Align::End, Align::Start);
    pub const CENTER_LEFT: Anchor = Anchor::new(Align::Start, Align::Center);
    pub const CENTER: Anchor = Anchor::new(Align::Center, Align::Center);
    pub const CENTER_RIGHT: Anchor = Anchor::new(Align::End, Align::Center);
    pub const BOTTOM_LEFT: Anchor = Anchor::new(Align::Start, Align::End);
    pub const BOTTOM_CENTER: Anchor = Anchor::new(Align::Center, Align::End);
    pub const BOTTOM_RIGHT: Anchor = Anchor::new(Align::End, Align::End);

    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

const VERTICAL_NAMES: [(Align, &str); 3] = [
    (Align::Start, "top"),
    (Align::Center, "center"),
    (Align::End, "bottom"),
];

const HORIZONTAL_NAMES: [(Align, &str); 3] = [
    (Align::Start, "left"),
    (Align::Center, "center"),
    (Align::End, "right"),
];

fn name_of(names: &[(Align, &'static str); 3], align: Align) -> &'static str {
    names
        .iter()
        .find(|(a, _)| *a == align)
        .map(|(_, name)| *name)
        .unwrap_or_default()
}

fn align_named(names: &[(Align, &'static str); 3], name: &str) -> Option<Align> {
    names.iter().find(|(_, n)| *n == name).map(|(a, _)| *a)
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Anchor::CENTER {
            return f.write_str("center");
        }
        write!(
            f,
            "{}-{}",
            name_of(&VERTICAL_NAMES, self.vertical),
            name_of(&HORIZONTAL_NAMES, self.horizontal)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown anchor '{0}'")]
pub struct ParseAnchorError(String);

impl FromStr for Anchor {
    type Err = ParseAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "center" {
            return Ok(Anchor::CENTER);
        }
        s.split_once('-')
            .and_then(|(vertical, horizontal)| {
                Some(Anchor::new(
                    align_named(&HORIZONTAL_NAMES, horizontal)?,
                    align_named(&VERTICAL_NAMES, vertical)?,
                ))
            })
            .filter(|anchor| *anchor != Anchor::CENTER)
            .ok_or_else(|| ParseAnchorError(s.to_owned()))
    }
}

impl TryFrom<String> for Anchor {
    type Error = ParseAnchorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Anchor> for String {
    fn from(anchor: Anchor) -> Self {
        anchor.to_string()
    }
}

fn relative_align_pos(align: Align, length: i32) -> i32 {
    match align {
        Align::Start => 0,
        Align::Center => length / 2,
        Align::End => length,
    }
}

/// Computes where each line of a block goes so that the point of the
/// block selected by `anchor` lands on `anchor_point`.
///
/// Returns one offset per line, to be added to the block-relative
/// glyph positions of that line. Lines are aligned horizontally one
/// by one, so lines of different widths are each centered or
/// right-aligned on their own.
pub fn resolve_origins(block: &BlockMetrics, anchor_point: IVec2, anchor: Anchor) -> Vec<IVec2> {
    let top = anchor_point.y - relative_align_pos(anchor.vertical, block.height());

    block
        .line_widths
        .iter()
        .map(|&width| {
            ivec2(
                anchor_point.x - relative_align_pos(anchor.horizontal, width),
                top,
            )
        })
        .collect()
}
