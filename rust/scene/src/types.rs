// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plan input and scene solids

use floorplan3d_geometry::{Point2, Profile2D};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point, stored in JSON as `[x, y]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Implicitly closed outline, stored in JSON as an array of points
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<Point2D>,
}

impl Polygon {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self {
            points: coords.iter().copied().map(Point2D::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Geometry profile with repeated points removed
    pub fn to_profile(&self) -> Profile2D {
        Profile2D::from_ring(self.points.iter().map(Point2D::to_nalgebra))
    }
}

/// 24-bit RGB color
///
/// Serialized as `"#rrggbb"`; integers are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Color(u32);

/// Largest valid color value
pub const MAX_COLOR: u32 = 0xFF_FFFF;

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Create a color, keeping only the low 24 bits
    ///
    /// Channel extraction as `(hex >> 16) & 255` behaves identically, so an
    /// oversized literal such as `0xf302013` resolves to `0x302013`.
    pub const fn from_hex(hex: u32) -> Self {
        Color(hex & MAX_COLOR)
    }

    /// Create a color, rejecting values wider than 24 bits
    pub fn try_from_hex(hex: u64) -> Result<Self, ColorError> {
        if hex > MAX_COLOR as u64 {
            return Err(ColorError::OutOfRange(hex));
        }
        Ok(Color(hex as u32))
    }

    pub const fn hex(&self) -> u32 {
        self.0
    }

    pub const fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// Channels scaled to `[0, 1]`
    pub fn to_rgb_f32(&self) -> [f32; 3] {
        let (r, g, b) = self.rgb();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u64),
    Hex(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Int(hex) => Color::try_from_hex(hex),
            ColorRepr::Hex(s) => {
                let digits = s
                    .strip_prefix('#')
                    .or_else(|| s.strip_prefix("0x"))
                    .unwrap_or(&s);
                let hex = u64::from_str_radix(digits, 16)
                    .map_err(|_| ColorError::Malformed(s.clone()))?;
                Color::try_from_hex(hex)
            }
        }
    }
}

/// Color parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Color {0:#x} exceeds 24 bits")]
    OutOfRange(u64),
    #[error("Malformed color literal: {0}")]
    Malformed(String),
}

/// Input category, one JSON file each
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wall,
    Door,
    Window,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Wall, Category::Door, Category::Window];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wall => "wall",
            Category::Door => "door",
            Category::Window => "window",
        }
    }

    /// Default file name under the input directory
    pub fn asset_file_name(&self) -> &'static str {
        match self {
            Category::Wall => "walls.json",
            Category::Door => "doors.json",
            Category::Window => "windows.json",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a solid in the scene represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SolidKind {
    Wall,
    Door,
    Window,
    Floor,
}

impl SolidKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolidKind::Wall => "wall",
            SolidKind::Door => "door",
            SolidKind::Window => "window",
            SolidKind::Floor => "floor",
        }
    }
}

impl From<Category> for SolidKind {
    fn from(category: Category) -> Self {
        match category {
            Category::Wall => SolidKind::Wall,
            Category::Door => SolidKind::Door,
            Category::Window => SolidKind::Window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_json_shape() {
        let polygons: Vec<Polygon> =
            serde_json::from_str("[[[0,0],[100,0],[100,100],[0,100]]]").unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].points[2], Point2D::new(100.0, 100.0));

        let json = serde_json::to_string(&polygons[0]).unwrap();
        assert_eq!(json, "[[0.0,0.0],[100.0,0.0],[100.0,100.0],[0.0,100.0]]");
    }

    #[test]
    fn test_point_requires_two_coordinates() {
        assert!(serde_json::from_str::<Point2D>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Point2D>("[1]").is_err());
    }

    #[test]
    fn test_door_color_masked_to_24_bits() {
        let door = Color::from_hex(0xf302013);
        assert_eq!(door.hex(), 0x302013);
        assert_eq!(door.rgb(), (0x30, 0x20, 0x13));
        assert_eq!(door.to_string(), "#302013");
    }

    #[test]
    fn test_strict_color_rejects_wide_values() {
        assert_eq!(
            Color::try_from_hex(0xf302013),
            Err(ColorError::OutOfRange(0xf302013))
        );
        assert_eq!(Color::try_from_hex(0xf08000).unwrap().hex(), 0xf08000);
    }

    #[test]
    fn test_color_serde() {
        let c: Color = serde_json::from_str("\"#6e2c00\"").unwrap();
        assert_eq!(c.hex(), 0x6e2c00);
        let c: Color = serde_json::from_str("15761408").unwrap();
        assert_eq!(c.hex(), 0xf08000);
        assert!(serde_json::from_str::<Color>("\"#zz0000\"").is_err());
        assert!(serde_json::from_str::<Color>("254812179").is_err());
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#f08000\"");
    }

    #[test]
    fn test_color_channels() {
        let [r, g, b] = Color::from_hex(0xff8000).to_rgb_f32();
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Door.asset_file_name(), "doors.json");
        assert_eq!(SolidKind::from(Category::Window), SolidKind::Window);
        assert_eq!(serde_json::to_string(&Category::Wall).unwrap(), "\"wall\"");
    }
}
