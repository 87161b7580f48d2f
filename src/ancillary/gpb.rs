//! Legacy brush+pattern `.gpb` (spec §6): one `.gbr` blob immediately
//! followed by one `.pat` blob.

use crate::ancillary::gbr::GbrBrush;
use crate::ancillary::pat::PatPattern;
use crate::cursor::Cursor;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct GpbBrushPattern {
    pub brush: GbrBrush,
    pub pattern: PatPattern,
}

impl GpbBrushPattern {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let brush = GbrBrush::from_bytes(data)?;

        // `.gbr`'s own `header_size` field gives the offset where its
        // pixel payload starts; the blob ends after that payload.
        let header_size = { let mut c = Cursor::new(data); c.read_u32()? as usize };
        let brush_len = header_size + brush.pixels.len();

        let pattern = PatPattern::from_bytes(&data[brush_len..])?;
        Ok(GpbBrushPattern { brush, pattern })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.brush.to_bytes();
        out.extend(self.pattern.to_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_concatenated_blobs() {
        let brush =
            GbrBrush { width: 2, height: 2, bpp: 1, spacing: 10, name: "b".into(), pixels: vec![1; 4] };
        let pattern = PatPattern { width: 2, height: 2, bpp: 1, name: "p".into(), pixels: vec![2; 4] };

        let mut bytes = brush.to_bytes();
        bytes.extend(pattern.to_bytes());

        let decoded = GpbBrushPattern::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.brush, brush);
        assert_eq!(decoded.pattern, pattern);
    }
}
