//! Brush pipe `.gih` (spec §6): two lines of UTF-8 text (name; then `count
//! param:value …`), then `count` back-to-back `.gbr` blobs.

use crate::ancillary::gbr::GbrBrush;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use linked_hash_map::LinkedHashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct GihBrushSet {
    pub name: String,
    /// `param:value` pairs from the second line (`ncells`, `dim`, `cols`,
    /// `rows`, `placement`, `rank0`, `sel0`, …), in the reference editor's
    /// `gimp-image-pipe-parameters` parasite shape. Kept in on-disk order —
    /// the pipe editor relies on position (`rows`/`cols` before
    /// `placement`), not key lookup.
    pub params: LinkedHashMap<String, String>,
    pub brushes: Vec<GbrBrush>,
}

impl GihBrushSet {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text_end = find_nth_newline(data, 2).ok_or(Error::Truncated {
            offset: 0,
            needed: 1,
            available: data.len(),
        })?;
        let text = std::str::from_utf8(&data[..text_end]).map_err(|_| Error::InvalidString { offset: 0 })?;
        let mut lines = text.lines();

        let name = lines.next().ok_or(Error::Truncated { offset: 0, needed: 1, available: 0 })?.to_string();
        let second_line = lines.next().ok_or(Error::Truncated { offset: 0, needed: 1, available: 0 })?;
        let mut fields = second_line.split(' ');

        let count: usize = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::InvalidString { offset: name.len() + 1 })?;

        let mut params = LinkedHashMap::new();
        for field in fields {
            if let Some((key, value)) = field.split_once(':') {
                params.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        let mut offset = text_end;
        let mut brushes = Vec::with_capacity(count);
        for _ in 0..count {
            let brush = GbrBrush::from_bytes(&data[offset..])?;
            offset += brush_blob_len(&data[offset..], &brush)?;
            brushes.push(brush);
        }

        Ok(GihBrushSet { name, params, brushes })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(self.name.as_bytes());
        out.push(b'\n');

        let mut second_line = self.brushes.len().to_string();
        for (key, value) in &self.params {
            second_line.push(' ');
            second_line.push_str(key);
            second_line.push(':');
            second_line.push_str(value);
        }
        out.extend_from_slice(second_line.as_bytes());
        out.push(b'\n');

        for brush in &self.brushes {
            out.extend(brush.to_bytes());
        }
        out
    }
}

/// `.gbr`'s own `header_size` field gives the offset where its pixel
/// payload starts; the blob ends after that payload.
fn brush_blob_len(blob: &[u8], brush: &GbrBrush) -> Result<usize> {
    let header_size = Cursor::new(blob).read_u32()? as usize;
    Ok(header_size + brush.pixels.len())
}

fn find_nth_newline(data: &[u8], n: usize) -> Option<usize> {
    let mut found = 0;
    for (i, &byte) in data.iter().enumerate() {
        if byte == b'\n' {
            found += 1;
            if found == n {
                return Some(i + 1);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sub_brushes() {
        let brush = |name: &str| GbrBrush {
            width: 2,
            height: 2,
            bpp: 1,
            spacing: 10,
            name: name.to_string(),
            pixels: vec![1, 2, 3, 4],
        };

        let mut params = LinkedHashMap::new();
        params.insert("ncells".to_string(), "7".to_string());
        params.insert("cols".to_string(), "1".to_string());
        params.insert("rows".to_string(), "7".to_string());
        params.insert("placement".to_string(), "constant".to_string());

        let set = GihBrushSet {
            name: "pipe".to_string(),
            params,
            brushes: (0..7).map(|i| brush(&format!("cell{i}"))).collect(),
        };

        let encoded = set.to_bytes();
        let decoded = GihBrushSet::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, set);
        assert_eq!(decoded.brushes.len(), 7);

        let second_line = std::str::from_utf8(&encoded).unwrap().lines().nth(1).unwrap();
        assert_eq!(second_line, "7 ncells:7 cols:1 rows:7 placement:constant");
    }
}
