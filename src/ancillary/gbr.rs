//! Single brush `.gbr` (spec §6): `u32 header_size; u32 version(=2); u32 w;
//! u32 h; u32 bpp; "GIMP"; u32 spacing; UTF-8 name; pixel bytes`.

use crate::cursor::{Cursor, Sink};
use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"GIMP";
const VERSION: u32 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct GbrBrush {
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    pub spacing: u32,
    pub name: String,
    pub pixels: Vec<u8>,
}

impl GbrBrush {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let header_size = cursor.read_u32()?;
        let version_offset = cursor.position();
        let version = cursor.read_u32()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion { offset: version_offset, found: version });
        }

        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        let bpp = cursor.read_u32()?;

        let magic_offset = cursor.position();
        let magic = cursor.read_array::<4>()?;
        if &magic != MAGIC {
            return Err(Error::BadMagic { offset: magic_offset });
        }

        let spacing = cursor.read_u32()?;

        let name_len = (header_size as usize).saturating_sub(cursor.position());
        let name_bytes = cursor.read_slice(name_len)?;
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| Error::InvalidString { offset: cursor.position() - name_len })?
            .trim_end_matches('\0')
            .to_string();

        let pixel_count = (width * height * bpp) as usize;
        let pixels = cursor.read_slice(pixel_count)?.to_vec();

        Ok(GbrBrush { width, height, bpp, spacing, name, pixels })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut sink = Sink::new();

        // header_size = everything up to and including the name, patched
        // once its length is known.
        let header_size_slot = sink.reserve_u32();
        sink.write_u32(VERSION);
        sink.write_u32(self.width);
        sink.write_u32(self.height);
        sink.write_u32(self.bpp);
        sink.write_bytes(MAGIC);
        sink.write_u32(self.spacing);
        sink.write_bytes(self.name.as_bytes());
        sink.write_u8(0);

        let header_size = sink.position() as u32;
        sink.patch_u32(header_size_slot, header_size);

        sink.write_bytes(&self.pixels);
        sink.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_byte_identical() {
        let brush = GbrBrush {
            width: 4,
            height: 4,
            bpp: 1,
            spacing: 25,
            name: "pepper".to_string(),
            pixels: vec![1; 16],
        };
        let encoded = brush.to_bytes();
        let decoded = GbrBrush::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, brush);
        assert_eq!(GbrBrush::from_bytes(&encoded).unwrap().to_bytes(), encoded);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut sink = Sink::new();
        sink.write_u32(20);
        sink.write_u32(99);
        let bytes = sink.into_bytes();
        assert!(matches!(GbrBrush::from_bytes(&bytes), Err(Error::UnsupportedVersion { .. })));
    }
}
