//! Vector paths (component G): a named ordered list of [`Stroke`]s, each an
//! ordered list of [`Point`]s carrying optional per-point pen dynamics.
//!
//! Encoded inside a document's `PROP_VECTORS` payload (spec §4.G); this
//! module only knows how to read/write the `Vector` records themselves, not
//! the surrounding `u32 version; u32 active_index; u32 num_paths` framing,
//! which lives in [`crate::property`].

use crate::cursor::{Cursor, Sink};
use crate::error::Result;
use crate::property::Parasite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeType {
    None,
    Bezier,
}

impl StrokeType {
    fn from_u32(value: u32) -> Self {
        match value {
            1 => StrokeType::Bezier,
            _ => StrokeType::None,
        }
    }

    fn to_u32(self) -> u32 {
        match self {
            StrokeType::None => 0,
            StrokeType::Bezier => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointType {
    Anchor,
    BezierControl,
}

impl PointType {
    fn from_u32(value: u32) -> Self {
        match value {
            1 => PointType::BezierControl,
            _ => PointType::Anchor,
        }
    }

    fn to_u32(self) -> u32 {
        match self {
            PointType::Anchor => 0,
            PointType::BezierControl => 1,
        }
    }
}

/// A point carries `x, y` unconditionally; the remaining dynamics are
/// present only up to `floats_per_point`, defaulting per spec §3.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub kind: PointType,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub xtilt: f32,
    pub ytilt: f32,
    pub wheel: f32,
}

impl Point {
    const DEFAULT_PRESSURE: f32 = 1.0;
    const DEFAULT_XTILT: f32 = 0.5;
    const DEFAULT_YTILT: f32 = 0.5;
    const DEFAULT_WHEEL: f32 = 0.5;

    fn decode(cursor: &mut Cursor<'_>, floats_per_point: u32) -> Result<Self> {
        let kind = PointType::from_u32(cursor.read_u32()?);
        let mut floats = [
            0.0,
            0.0,
            Self::DEFAULT_PRESSURE,
            Self::DEFAULT_XTILT,
            Self::DEFAULT_YTILT,
            Self::DEFAULT_WHEEL,
        ];
        for slot in floats.iter_mut().take(floats_per_point.min(6) as usize) {
            *slot = cursor.read_f32()?;
        }

        Ok(Point {
            kind,
            x: floats[0],
            y: floats[1],
            pressure: floats[2],
            xtilt: floats[3],
            ytilt: floats[4],
            wheel: floats[5],
        })
    }

    fn encode(&self, sink: &mut Sink, floats_per_point: u32) {
        sink.write_u32(self.kind.to_u32());
        let floats = [self.x, self.y, self.pressure, self.xtilt, self.ytilt, self.wheel];
        for value in floats.iter().take(floats_per_point.min(6) as usize) {
            sink.write_f32(*value);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub kind: StrokeType,
    pub closed: bool,
    pub floats_per_point: u32,
    pub points: Vec<Point>,
}

impl Stroke {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let kind = StrokeType::from_u32(cursor.read_u32()?);
        let closed = cursor.read_bool32()?;
        let floats_per_point = cursor.read_u32()?;
        let num_points = cursor.read_u32()?;

        let mut points = Vec::with_capacity(num_points as usize);
        for _ in 0..num_points {
            points.push(Point::decode(cursor, floats_per_point)?);
        }

        Ok(Stroke { kind, closed, floats_per_point, points })
    }

    fn encode(&self, sink: &mut Sink) {
        sink.write_u32(self.kind.to_u32());
        sink.write_bool32(self.closed);
        sink.write_u32(self.floats_per_point);
        sink.write_u32(self.points.len() as u32);
        for point in &self.points {
            point.encode(sink, self.floats_per_point);
        }
    }

    /// Renders this stroke as an SVG path data sequence (`M`/`L`/`Q`/`Z`),
    /// used by the `--show` CLI surface and by callers embedding a path in
    /// an SVG document directly.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for (i, point) in self.points.iter().enumerate() {
            let segment = match (i, point.kind) {
                (0, _) => format!("M {} {}", point.x, point.y),
                (_, PointType::BezierControl) => format!(" Q {} {}", point.x, point.y),
                (_, PointType::Anchor) => format!(" L {} {}", point.x, point.y),
            };
            out.push_str(&segment);
        }
        if self.closed {
            out.push_str(" Z");
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    pub name: String,
    pub tattoo: u32,
    pub visible: bool,
    pub linked: bool,
    pub parasites: Vec<Parasite>,
    pub strokes: Vec<Stroke>,
}

impl Vector {
    pub(crate) fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let name = cursor.read_xcf_string()?;
        let tattoo = cursor.read_u32()?;
        let visible = cursor.read_bool32()?;
        let linked = cursor.read_bool32()?;
        let num_parasites = cursor.read_u32()?;
        let num_strokes = cursor.read_u32()?;

        let mut parasites = Vec::with_capacity(num_parasites as usize);
        for _ in 0..num_parasites {
            parasites.push(Parasite::decode(cursor)?);
        }

        let mut strokes = Vec::with_capacity(num_strokes as usize);
        for _ in 0..num_strokes {
            strokes.push(Stroke::decode(cursor)?);
        }

        Ok(Vector { name, tattoo, visible, linked, parasites, strokes })
    }

    pub(crate) fn encode(&self, sink: &mut Sink) {
        sink.write_xcf_string(&self.name);
        sink.write_u32(self.tattoo);
        sink.write_bool32(self.visible);
        sink.write_bool32(self.linked);
        sink.write_u32(self.parasites.len() as u32);
        sink.write_u32(self.strokes.len() as u32);
        for parasite in &self.parasites {
            parasite.encode(sink);
        }
        for stroke in &self.strokes {
            stroke.encode(sink);
        }
    }

    /// Concatenates every stroke's SVG path data into one `<path d="…">`
    /// body, per spec §8 scenario 5.
    pub fn to_svg_path(&self) -> String {
        self.strokes.iter().map(Stroke::to_svg_path).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_round_trips() {
        let stroke = Stroke {
            kind: StrokeType::Bezier,
            closed: true,
            floats_per_point: 3,
            points: vec![Point {
                kind: PointType::Anchor,
                x: 1.0,
                y: 2.0,
                pressure: 0.75,
                xtilt: 0.5,
                ytilt: 0.5,
                wheel: 0.5,
            }],
        };

        let mut sink = Sink::new();
        stroke.encode(&mut sink);
        let bytes = sink.into_bytes();
        let mut cursor = Cursor::new(&bytes);
        let decoded = Stroke::decode(&mut cursor).unwrap();
        assert_eq!(decoded, stroke);
    }

    #[test]
    fn svg_path_sequences_moveto_then_lineto() {
        let stroke = Stroke {
            kind: StrokeType::Bezier,
            closed: true,
            floats_per_point: 2,
            points: vec![
                Point { kind: PointType::Anchor, x: 0.0, y: 0.0, pressure: 1.0, xtilt: 0.5, ytilt: 0.5, wheel: 0.5 },
                Point { kind: PointType::BezierControl, x: 1.0, y: 1.0, pressure: 1.0, xtilt: 0.5, ytilt: 0.5, wheel: 0.5 },
                Point { kind: PointType::Anchor, x: 2.0, y: 0.0, pressure: 1.0, xtilt: 0.5, ytilt: 0.5, wheel: 0.5 },
            ],
        };
        assert_eq!(stroke.to_svg_path(), "M 0 0 Q 1 1 L 2 0 Z");
    }
}
