//! Fill and stroke per point type.

use serde::{Deserialize, Serialize};

use crate::core::{Color, DataPoint};

/// Style entry for one point type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
}

impl TypeStyle {
    pub fn new(kind: impl Into<String>, color: Color) -> Self {
        Self {
            kind: kind.into(),
            color,
            stroke: None,
        }
    }

    #[inline]
    pub fn stroke(mut self, c: Color) -> Self {
        self.stroke = Some(c);
        self
    }
}

/// The twenty-color categorical palette used for unstyled types.
pub const CATEGORY20: [Color; 20] = [
    Color::hex(0x1f77b4),
    Color::hex(0xaec7e8),
    Color::hex(0xff7f0e),
    Color::hex(0xffbb78),
    Color::hex(0x2ca02c),
    Color::hex(0x98df8a),
    Color::hex(0xd62728),
    Color::hex(0xff9896),
    Color::hex(0x9467bd),
    Color::hex(0xc5b0d5),
    Color::hex(0x8c564b),
    Color::hex(0xc49c94),
    Color::hex(0xe377c2),
    Color::hex(0xf7b6d2),
    Color::hex(0x7f7f7f),
    Color::hex(0xc7c7c7),
    Color::hex(0xbcbd22),
    Color::hex(0xdbdb8d),
    Color::hex(0x17becf),
    Color::hex(0x9edae5),
];

/// Type → style lookup with a deterministic fallback.
///
/// Types without an entry take their fill from [`CATEGORY20`] at the FNV-1a
/// hash of the type name and have no stroke. Points with no type hash the
/// empty string.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    styles: Vec<TypeStyle>,
}

impl Palette {
    pub fn new(styles: Vec<TypeStyle>) -> Self {
        Self { styles }
    }

    pub fn style_for(&self, kind: Option<&str>) -> Option<&TypeStyle> {
        let kind = kind?;
        self.styles.iter().find(|s| s.kind == kind)
    }

    pub fn fill(&self, point: &DataPoint) -> Color {
        let kind = point.kind.as_deref();
        match self.style_for(kind) {
            Some(style) => style.color,
            None => fallback_color(kind.unwrap_or_default()),
        }
    }

    pub fn stroke(&self, point: &DataPoint) -> Option<Color> {
        self.style_for(point.kind.as_deref())
            .and_then(|style| style.stroke)
    }
}

pub fn fallback_color(kind: &str) -> Color {
    CATEGORY20[(fnv1a(kind.as_bytes()) % CATEGORY20.len() as u64) as usize]
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
