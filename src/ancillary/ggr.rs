//! Gradient `.ggr` (spec §6): line-oriented UTF-8, magic `"GIMP Gradient"`,
//! `Name: …`, segment count, then one segment per line: 11 floats plus
//! optional trailing ints.

use crate::error::{Error, Result};

const MAGIC: &str = "GIMP Gradient";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub f32, pub f32, pub f32, pub f32);

#[derive(Clone, Debug, PartialEq)]
pub struct GradientSegment {
    pub left_position: f32,
    pub middle_position: f32,
    pub right_position: f32,
    pub left_color: Rgba,
    pub right_color: Rgba,
    pub blend_func: Option<i32>,
    pub color_type: Option<i32>,
    pub left_color_type: Option<i32>,
    pub right_color_type: Option<i32>,
}

impl GradientSegment {
    fn decode(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() < 11 || fields.len() > 15 {
            return Err(Error::InvalidString { offset: 0 });
        }
        let f = |i: usize| -> Result<f32> { fields[i].parse().map_err(|_| Error::InvalidString { offset: i }) };
        let int_at = |i: usize| -> Option<i32> { fields.get(i).and_then(|s| s.parse().ok()) };

        Ok(GradientSegment {
            left_position: f(0)?,
            middle_position: f(1)?,
            right_position: f(2)?,
            left_color: Rgba(f(3)?, f(4)?, f(5)?, f(6)?),
            right_color: Rgba(f(7)?, f(8)?, f(9)?, f(10)?),
            blend_func: int_at(11),
            color_type: int_at(12),
            left_color_type: int_at(13),
            right_color_type: int_at(14),
        })
    }

    fn encode(&self) -> String {
        let mut fields = vec![
            format!("{:.6}", self.left_position),
            format!("{:.6}", self.middle_position),
            format!("{:.6}", self.right_position),
        ];
        for channel in [self.left_color.0, self.left_color.1, self.left_color.2, self.left_color.3] {
            fields.push(format!("{channel:.6}"));
        }
        for channel in [self.right_color.0, self.right_color.1, self.right_color.2, self.right_color.3] {
            fields.push(format!("{channel:.6}"));
        }
        if let Some(blend_func) = self.blend_func {
            fields.push(blend_func.to_string());
            if let Some(color_type) = self.color_type {
                fields.push(color_type.to_string());
                if let Some(left) = self.left_color_type {
                    fields.push(left.to_string());
                    if let Some(right) = self.right_color_type {
                        fields.push(right.to_string());
                    }
                }
            }
        }
        fields.join(" ")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GgrGradient {
    pub name: String,
    pub segments: Vec<GradientSegment>,
}

impl GgrGradient {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).map_err(|_| Error::InvalidString { offset: 0 })?;
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        if lines.first() != Some(&MAGIC) {
            return Err(Error::BadMagic { offset: 0 });
        }
        let name = lines
            .get(1)
            .and_then(|l| l.split_once(':'))
            .map(|(_, rest)| rest.trim().to_string())
            .ok_or(Error::InvalidString { offset: 0 })?;
        let num_segments: usize =
            lines.get(2).and_then(|s| s.parse().ok()).ok_or(Error::InvalidString { offset: 0 })?;

        let mut segments = Vec::with_capacity(num_segments);
        for i in 0..num_segments {
            let line = lines.get(3 + i).ok_or(Error::Truncated { offset: 0, needed: 1, available: 0 })?;
            segments.push(GradientSegment::decode(line)?);
        }

        Ok(GgrGradient { name, segments })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut lines = vec![MAGIC.to_string(), format!("Name: {}", self.name), self.segments.len().to_string()];
        lines.extend(self.segments.iter().map(GradientSegment::encode));
        let mut text = lines.join("\n");
        text.push('\n');
        text.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_segments() {
        let gradient = GgrGradient {
            name: "Plasma".to_string(),
            segments: vec![GradientSegment {
                left_position: 0.0,
                middle_position: 0.5,
                right_position: 1.0,
                left_color: Rgba(0.0, 0.0, 0.0, 1.0),
                right_color: Rgba(1.0, 1.0, 1.0, 1.0),
                blend_func: Some(0),
                color_type: Some(0),
                left_color_type: None,
                right_color_type: None,
            }],
        };
        let encoded = gradient.to_bytes();
        assert_eq!(GgrGradient::from_bytes(&encoded).unwrap(), gradient);
    }
}
