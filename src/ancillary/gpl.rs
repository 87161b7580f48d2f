//! Palette `.gpl` (spec §6): line-oriented UTF-8, magic `"GIMP Palette"`,
//! `Name:`, `Columns:`, `#`, then `R G B [\tName]` per color.

use crate::error::{Error, Result};

const MAGIC: &str = "GIMP Palette";

#[derive(Clone, Debug, PartialEq)]
pub struct GplPalette {
    pub name: String,
    pub columns: u32,
    pub colors: Vec<(u8, u8, u8)>,
    pub color_names: Vec<Option<String>>,
}

impl GplPalette {
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
        let columns: u32 = lines
            .get(2)
            .and_then(|l| l.split_once(':'))
            .and_then(|(_, rest)| rest.trim().parse().ok())
            .ok_or(Error::InvalidString { offset: 0 })?;
        if lines.get(3) != Some(&"#") {
            return Err(Error::InvalidString { offset: 0 });
        }

        let mut colors = Vec::new();
        let mut color_names = Vec::new();
        for line in &lines[4..] {
            let mut parts = line.splitn(4, char::is_whitespace).filter(|s| !s.is_empty());
            let r: Option<u8> = parts.next().and_then(|s| s.parse().ok());
            let g: Option<u8> = parts.next().and_then(|s| s.parse().ok());
            let b: Option<u8> = parts.next().and_then(|s| s.parse().ok());
            let (r, g, b) = match (r, g, b) {
                (Some(r), Some(g), Some(b)) => (r, g, b),
                _ => continue,
            };
            let rest = line.splitn(4, char::is_whitespace).nth(3).map(str::trim).filter(|s| !s.is_empty());
            colors.push((r, g, b));
            color_names.push(rest.map(str::to_string));
        }

        Ok(GplPalette { name, columns, colors, color_names })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut lines = vec![MAGIC.to_string(), format!("Name: {}", self.name), format!("Columns: {}", self.columns), "#".to_string()];

        for (i, (r, g, b)) in self.colors.iter().enumerate() {
            let mut line = format!("{:>3} {:>3} {:>3}", r, g, b);
            if let Some(Some(name)) = self.color_names.get(i) {
                line.push('\t');
                line.push_str(name);
            }
            lines.push(line);
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_color_matches_reference() {
        let palette = GplPalette {
            name: "Plasma".to_string(),
            columns: 16,
            colors: vec![(13, 8, 135), (255, 255, 255)],
            color_names: vec![None, Some("white".to_string())],
        };
        let encoded = palette.to_bytes();
        let decoded = GplPalette::from_bytes(&encoded).unwrap();
        assert_eq!(decoded.colors[0], (13, 8, 135));
        assert_eq!(decoded.to_bytes(), encoded);
    }
}
