use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// A data coordinate: a number, or a string holding an ordinal label or a date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// The value as an ordinal label. Whole numbers print without a fraction.
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One input point. Owned by the caller; the engine only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: Value,
    pub y: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl DataPoint {
    pub fn new(x: impl Into<Value>, y: impl Into<Value>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: None,
            kind: None,
        }
    }

    #[inline]
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    #[inline]
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn coordinate(&self, role: AxisRole) -> &Value {
        match role {
            AxisRole::X => &self.x,
            AxisRole::Y => &self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRole {
    X,
    Y,
}

impl AxisRole {
    pub fn is_horizontal(self) -> bool {
        self == Self::X
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Data type carried by one axis. Fixed for the lifetime of a chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AxisType {
    #[default]
    Linear,
    Ordinal,
    Time,
}

impl AxisType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ordinal => "ordinal",
            Self::Time => "time",
        }
    }
}

impl FromStr for AxisType {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            // `text` is the older spelling of ordinal
            "ordinal" | "text" => Ok(Self::Ordinal),
            "time" => Ok(Self::Time),
            other => Err(PlotError::UnknownAxisType(other.to_string())),
        }
    }
}

impl TryFrom<String> for AxisType {
    type Error = PlotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AxisType> for String {
    fn from(t: AxisType) -> Self {
        t.name().to_string()
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

/// RGBA color. Serialized as a CSS hex string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub fn to_hex(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b) = (channel(self.r), channel(self.g), channel(self.b));
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{:02x}", channel(self.a))
        }
    }
}

impl FromStr for Color {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlotError::InvalidConfig(format!("`{s}` is not a hex color"));
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        let byte = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .map(|v| f32::from(v) / 255.0)
                .ok_or_else(invalid)
        };
        match digits.len() {
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
