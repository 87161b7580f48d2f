//! Hierarchy / level (component D): assembles tiles into a level, and
//! levels into a pyramid of which only the top level is authoritative in
//! practice (spec §4.D).

use crate::cursor::{Cursor, PointerWidth, Sink};
use crate::error::{Error, Result};
use crate::tile::{self, Compression};

/// One resolution level of a [`Hierarchy`]. Tiles are stored lazily as raw
/// encoded byte ranges (spec §9: "implementations SHOULD expose tiles as a
/// lazy sequence ... sharing the underlying buffer by slice when
/// compression is none"); [`Level::tile`] decodes one on demand and
/// [`Level::raster`] materializes the whole level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    bpp: u32,
    compression: Compression,
    /// Decoded tile pixel bytes, row-major `(ty, tx)`, each already
    /// channel-interleaved and decompressed. Kept fully materialized rather
    /// than sharing a buffer slice, since encoded tile compression differs
    /// per document and this crate's `Level` is also the encoder's input.
    tiles: Vec<Vec<u8>>,
}

impl Level {
    pub fn new(width: u32, height: u32, bpp: u32, compression: Compression, tiles: Vec<Vec<u8>>) -> Self {
        Level { width, height, bpp, compression, tiles }
    }

    fn tile_count(&self) -> usize {
        let (tx, ty) = tile::tile_grid(self.width, self.height);
        (tx * ty) as usize
    }

    /// The decoded pixel bytes of tile `(tx, ty)`, channel-interleaved.
    pub fn tile(&self, tx: u32, ty: u32) -> Option<&[u8]> {
        let (tiles_x, _) = tile::tile_grid(self.width, self.height);
        self.tiles.get((ty * tiles_x + tx) as usize).map(Vec::as_slice)
    }

    /// Concatenates every tile into one `width * height * bpp` raster in
    /// row-major pixel order.
    pub fn raster(&self) -> Vec<u8> {
        let mut out = vec![0u8; (self.width * self.height * self.bpp) as usize];
        let (tiles_x, tiles_y) = tile::tile_grid(self.width, self.height);

        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let (tw, th) = tile::tile_dims(self.width, self.height, tx, ty);
                let tile_bytes = self.tile(tx, ty).expect("tile grid index in range");

                for row in 0..th {
                    let src_start = (row * tw * self.bpp) as usize;
                    let src = &tile_bytes[src_start..src_start + (tw * self.bpp) as usize];

                    let dst_x = tx * tile::TILE_SIZE;
                    let dst_y = ty * tile::TILE_SIZE + row;
                    let dst_start = ((dst_y * self.width + dst_x) * self.bpp) as usize;
                    out[dst_start..dst_start + src.len()].copy_from_slice(src);
                }
            }
        }

        out
    }

    pub(crate) fn decode(
        cursor: &mut Cursor<'_>,
        parent_width: u32,
        parent_height: u32,
        bpp: u32,
        pointer_width: PointerWidth,
        compression: Compression,
    ) -> Result<Self> {
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        if (width, height) != (parent_width, parent_height) {
            return Err(Error::LevelSizeMismatch {
                expected: (parent_width, parent_height),
                found: (width, height),
            });
        }

        let (tiles_x, tiles_y) = tile::tile_grid(width, height);
        let tile_count = (tiles_x * tiles_y) as usize;

        let mut pointers = Vec::with_capacity(tile_count);
        loop {
            let pointer = cursor.read_pointer(pointer_width)?;
            if pointer == 0 {
                break;
            }
            pointers.push(pointer);
        }

        if pointers.len() != tile_count {
            return Err(Error::LevelSizeMismatch { expected: (tiles_x, tiles_y), found: (pointers.len() as u32, 1) });
        }

        let buffer_len = cursor.len();
        let mut tiles = Vec::with_capacity(tile_count);
        for (i, &pointer) in pointers.iter().enumerate() {
            let tx = i as u32 % tiles_x;
            let ty = i as u32 / tiles_x;
            let (tw, th) = tile::tile_dims(width, height, tx, ty);

            let offset = usize::try_from(pointer)
                .map_err(|_| Error::PointerOutOfRange { offset: cursor.position(), pointer, buffer_len })?;
            if offset > buffer_len {
                return Err(Error::PointerOutOfRange { offset: cursor.position(), pointer, buffer_len });
            }

            let tile_cursor_data = Cursor::at(tile_bytes_from(cursor), offset);
            let raw = tile_cursor_data.remaining_slice();
            let decoded = tile::decode_tile(raw, offset, tw, th, bpp, compression)?;
            tiles.push(decoded);
        }

        Ok(Level { width, height, bpp, compression, tiles })
    }

    pub(crate) fn encode(&self, sink: &mut Sink, pointer_width: PointerWidth) {
        sink.write_u32(self.width);
        sink.write_u32(self.height);

        let (tiles_x, tiles_y) = tile::tile_grid(self.width, self.height);
        let tile_count = (tiles_x * tiles_y) as usize;

        let pointer_slots: Vec<usize> =
            (0..tile_count).map(|_| sink.reserve_pointer(pointer_width)).collect();
        sink.write_pointer(pointer_width, 0);

        for i in 0..tile_count {
            let tx = i as u32 % tiles_x;
            let ty = i as u32 / tiles_x;
            let (tw, th) = tile::tile_dims(self.width, self.height, tx, ty);

            let offset = sink.position() as u64;
            sink.patch_pointer(pointer_slots[i], pointer_width, offset);

            let encoded = tile::encode_tile(&self.tiles[i], tw, th, self.bpp, self.compression);
            sink.write_bytes(&encoded);
        }
    }
}

/// Container of [`Level`]s; owns `width`/`height`/`bpp` for a channel or
/// layer (spec §3 "Hierarchy").
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    pub width: u32,
    pub height: u32,
    pub bpp: u32,
    levels: Vec<Level>,
}

impl Hierarchy {
    pub fn new(width: u32, height: u32, bpp: u32, top_level: Level) -> Result<Self> {
        if !(1..=4).contains(&bpp) {
            return Err(Error::CorruptBpp { offset: 0, bpp });
        }
        Ok(Hierarchy { width, height, bpp, levels: vec![top_level] })
    }

    /// The authoritative (highest-resolution) level. Spec §4.D: "Implementations
    /// that read more than one level MUST discard all levels below the first."
    pub fn top_level(&self) -> &Level {
        &self.levels[0]
    }

    pub(crate) fn decode(
        cursor: &mut Cursor<'_>,
        pointer_width: PointerWidth,
        compression: Compression,
    ) -> Result<Self> {
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        let bpp = cursor.read_u32()?;
        if !(1..=4).contains(&bpp) {
            return Err(Error::CorruptBpp { offset: cursor.position(), bpp });
        }

        let mut pointers = Vec::new();
        loop {
            let pointer = cursor.read_pointer(pointer_width)?;
            if pointer == 0 {
                break;
            }
            pointers.push(pointer);
        }

        let buffer_len = cursor.len();
        let top_pointer = *pointers
            .first()
            .ok_or(Error::LevelSizeMismatch { expected: (width, height), found: (0, 0) })?;
        let offset = usize::try_from(top_pointer)
            .map_err(|_| Error::PointerOutOfRange { offset: cursor.position(), pointer: top_pointer, buffer_len })?;
        if offset > buffer_len {
            return Err(Error::PointerOutOfRange { offset: cursor.position(), pointer: top_pointer, buffer_len });
        }

        let mut level_cursor = Cursor::at(tile_bytes_from(cursor), offset);
        let top_level =
            Level::decode(&mut level_cursor, width, height, bpp, pointer_width, compression)?;

        Ok(Hierarchy { width, height, bpp, levels: vec![top_level] })
    }

    pub(crate) fn encode(&self, sink: &mut Sink, pointer_width: PointerWidth) {
        sink.write_u32(self.width);
        sink.write_u32(self.height);
        sink.write_u32(self.bpp);

        let level_slot = sink.reserve_pointer(pointer_width);
        sink.write_pointer(pointer_width, 0);

        let offset = sink.position() as u64;
        sink.patch_pointer(level_slot, pointer_width, offset);
        self.top_level().encode(sink, pointer_width);
    }
}

/// Helper exposing the full underlying buffer behind a `Cursor` so levels
/// and tiles (which are addressed by absolute pointer, not relative to the
/// current read position) can re-seek into it.
fn tile_bytes_from<'a>(cursor: &Cursor<'a>) -> &'a [u8] {
    cursor.full_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_tile(value: u8, w: u32, h: u32, bpp: u32) -> Vec<u8> {
        vec![value; (w * h * bpp) as usize]
    }

    #[test]
    fn level_raster_assembles_single_tile() {
        let tile = solid_tile(42, 10, 10, 1);
        let level = Level::new(10, 10, 1, Compression::None, vec![tile]);
        let raster = level.raster();
        assert_eq!(raster.len(), 100);
        assert!(raster.iter().all(|&b| b == 42));
    }

    #[test]
    fn hierarchy_rejects_bad_bpp() {
        let err = Hierarchy::new(4, 4, 5, Level::new(4, 4, 5, Compression::None, vec![]));
        assert!(matches!(err, Err(Error::CorruptBpp { bpp: 5, .. })));
    }
}
