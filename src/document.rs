//! Document codec (component H): the top-level container — header,
//! properties, layers, channels. Owns the two-pass pointer layout described
//! in spec §4.H.
//!
//! Mirrors the teacher's `SaiDocument` facade shape (`open`/`from_bytes`/
//! `save`/`to_bytes`), generalized from SAI's fixed encrypted-block layout
//! to XCF's self-describing, pointer-based one.

use std::fs;
use std::path::Path;

use crate::channel::Channel;
use crate::cursor::{Cursor, PointerWidth, Sink};
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::property::{Property, PropertyBag};
use crate::tile::Compression;
use crate::vector::Vector;

const MAGIC: &[u8; 9] = b"gimp xcf ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseColorMode {
    Rgb,
    Grayscale,
    Indexed,
}

impl BaseColorMode {
    fn from_code(code: u32) -> Self {
        match code {
            1 => BaseColorMode::Grayscale,
            2 => BaseColorMode::Indexed,
            _ => BaseColorMode::Rgb,
        }
    }

    fn to_code(self) -> u32 {
        match self {
            BaseColorMode::Rgb => 0,
            BaseColorMode::Grayscale => 1,
            BaseColorMode::Indexed => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gamma {
    Linear,
    Perceptual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Numeric {
    Integer,
    Float,
}

/// Pixel sample format at the document level: bit depth, gamma curve, and
/// integer-vs-float storage (spec §3, version-coupled encoding in §4.H).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    pub bits: u8,
    pub gamma: Gamma,
    pub numeric: Numeric,
}

impl Precision {
    pub const IMPLICIT_LEGACY: Precision =
        Precision { bits: 8, gamma: Gamma::Perceptual, numeric: Numeric::Integer };

    /// The minimum document version that can encode this precision.
    /// Version 4 only has five fixed `(gamma, bits, numeric)` combinations;
    /// versions ≥5 can express any gamma for 8/16/32-bit depths, and only
    /// versions ≥7 admit 64-bit float.
    pub fn required_version(&self) -> u32 {
        if *self == Self::IMPLICIT_LEGACY {
            return 0;
        }
        if self.bits == 64 {
            return 7;
        }
        const VERSION_4_COMBOS: [(Gamma, u8, Numeric); 5] = [
            (Gamma::Perceptual, 8, Numeric::Integer),
            (Gamma::Perceptual, 16, Numeric::Integer),
            (Gamma::Linear, 32, Numeric::Integer),
            (Gamma::Linear, 16, Numeric::Float),
            (Gamma::Linear, 32, Numeric::Float),
        ];
        if VERSION_4_COMBOS.contains(&(self.gamma, self.bits, self.numeric)) {
            4
        } else {
            5
        }
    }

    fn decode(cursor: &mut Cursor<'_>, version: u32) -> Result<Self> {
        if version < 4 {
            return Ok(Self::IMPLICIT_LEGACY);
        }

        let offset = cursor.position();
        let code = cursor.read_u32()?;

        if version == 4 {
            let (gamma, bits, numeric) = match code {
                0 => (Gamma::Perceptual, 8, Numeric::Integer),
                1 => (Gamma::Perceptual, 16, Numeric::Integer),
                2 => (Gamma::Linear, 32, Numeric::Integer),
                3 => (Gamma::Linear, 16, Numeric::Float),
                4 => (Gamma::Linear, 32, Numeric::Float),
                _ => return Err(Error::UnknownPrecision { offset, code }),
            };
            return Ok(Precision { bits, gamma, numeric });
        }

        let max_sub = if version >= 7 { 5 } else { 4 };
        let sub = code / 100;
        if sub > max_sub {
            return Err(Error::UnknownPrecision { offset, code });
        }
        let gamma = if code % 100 != 0 { Gamma::Perceptual } else { Gamma::Linear };
        let (bits, numeric) = match sub {
            0 => (8, Numeric::Integer),
            1 => (16, Numeric::Integer),
            2 => (32, Numeric::Integer),
            3 => (16, Numeric::Float),
            4 => (32, Numeric::Float),
            5 => (64, Numeric::Float),
            _ => return Err(Error::UnknownPrecision { offset, code }),
        };
        Ok(Precision { bits, gamma, numeric })
    }

    fn encode(&self, sink: &mut Sink, version: u32) {
        if version < 4 {
            return;
        }
        if version == 4 {
            let code = match (self.gamma, self.bits, self.numeric) {
                (Gamma::Perceptual, 8, Numeric::Integer) => 0,
                (Gamma::Perceptual, 16, Numeric::Integer) => 1,
                (Gamma::Linear, 32, Numeric::Integer) => 2,
                (Gamma::Linear, 16, Numeric::Float) => 3,
                _ => 4,
            };
            sink.write_u32(code);
            return;
        }
        let sub = match (self.bits, self.numeric) {
            (8, Numeric::Integer) => 0,
            (16, Numeric::Integer) => 1,
            (32, Numeric::Integer) => 2,
            (16, Numeric::Float) => 3,
            (32, Numeric::Float) => 4,
            (64, Numeric::Float) => 5,
            _ => 4,
        };
        let gamma_bit = if self.gamma == Gamma::Perceptual { 1 } else { 0 };
        sink.write_u32(sub * 100 + gamma_bit);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub base_color_mode: BaseColorMode,
    pub precision: Precision,
    pub properties: PropertyBag,
    /// Paint order: index 0 is the bottom of the stack, matching on-disk
    /// order (spec §3).
    pub layers: Vec<Layer>,
    pub channels: Vec<Channel>,
}

impl Document {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Checks the invariants `to_bytes` must hold before any byte is
    /// written (spec §4.H: "On encode, validation errors are raised before
    /// any output is produced."), so a programmatically-constructed
    /// `Document` (spec §3) can't silently serialize into a file its own
    /// decoder would reject.
    fn validate(&self) -> Result<()> {
        if self.precision.required_version() > self.version {
            return Err(Error::PrecisionVersionMismatch {
                required: self.precision.required_version(),
                version: self.version,
            });
        }

        for layer in &self.layers {
            let expected_bpp = layer.color_mode.bpp();
            if expected_bpp != layer.hierarchy.bpp {
                return Err(Error::InconsistentColorMode {
                    expected_bpp,
                    hierarchy_bpp: layer.hierarchy.bpp,
                });
            }
        }

        Ok(())
    }

    pub fn compression(&self) -> Compression {
        match self.properties.find(|p| matches!(p, Property::Compression(_))) {
            Some(Property::Compression(compression)) => *compression,
            _ => Compression::None,
        }
    }

    /// Vectors live inside `PROP_VECTORS`, not a dedicated field (spec §3).
    pub fn vectors(&self) -> &[Vector] {
        match self.properties.find(|p| matches!(p, Property::Vectors { .. })) {
            Some(Property::Vectors { vectors, .. }) => vectors,
            _ => &[],
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let magic = cursor.read_slice(9)?;
        if magic != MAGIC {
            return Err(Error::BadMagic { offset: 0 });
        }

        let token_offset = cursor.position();
        let token = cursor.read_c_string()?;
        let version = parse_version_token(&token, token_offset)?;

        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        let base_color_mode = BaseColorMode::from_code(cursor.read_u32()?);
        let precision = Precision::decode(&mut cursor, version)?;
        let properties = PropertyBag::decode(&mut cursor)?;

        let pointer_width = PointerWidth::for_version(version);
        let compression = match properties.find(|p| matches!(p, Property::Compression(_))) {
            Some(Property::Compression(c)) => *c,
            _ => Compression::None,
        };

        let layer_pointers = read_pointer_list(&mut cursor, pointer_width)?;
        let channel_pointers = read_pointer_list(&mut cursor, pointer_width)?;

        let buffer_len = cursor.len();
        let full = cursor.full_buffer();

        let mut layers = Vec::with_capacity(layer_pointers.len());
        for pointer in layer_pointers {
            let offset = pointer_offset(pointer, buffer_len, cursor.position())?;
            let mut layer_cursor = Cursor::at(full, offset);
            layers.push(Layer::decode(&mut layer_cursor, pointer_width, compression)?);
        }

        let mut channels = Vec::with_capacity(channel_pointers.len());
        for pointer in channel_pointers {
            let offset = pointer_offset(pointer, buffer_len, cursor.position())?;
            let mut channel_cursor = Cursor::at(full, offset);
            channels.push(Channel::decode(&mut channel_cursor, pointer_width, compression)?);
        }

        Ok(Document { version, width, height, base_color_mode, precision, properties, layers, channels })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let pointer_width = PointerWidth::for_version(self.version);
        let compression = self.compression();

        let mut sink = Sink::new();
        sink.write_bytes(MAGIC);
        sink.write_c_string(&version_token(self.version));
        sink.write_u32(self.width);
        sink.write_u32(self.height);
        sink.write_u32(self.base_color_mode.to_code());
        self.precision.encode(&mut sink, self.version);
        self.properties.encode(&mut sink);

        let layer_slots: Vec<usize> =
            (0..self.layers.len()).map(|_| sink.reserve_pointer(pointer_width)).collect();
        sink.write_pointer(pointer_width, 0);

        let channel_slots: Vec<usize> =
            (0..self.channels.len()).map(|_| sink.reserve_pointer(pointer_width)).collect();
        sink.write_pointer(pointer_width, 0);

        for (layer, slot) in self.layers.iter().zip(layer_slots) {
            let offset = sink.position() as u64;
            sink.patch_pointer(slot, pointer_width, offset);
            encode_layer(layer, &mut sink, pointer_width, compression);
        }

        for (channel, slot) in self.channels.iter().zip(channel_slots) {
            let offset = sink.position() as u64;
            sink.patch_pointer(slot, pointer_width, offset);
            encode_channel(channel, &mut sink, pointer_width, compression);
        }

        Ok(sink.into_bytes())
    }
}

fn encode_channel(channel: &Channel, sink: &mut Sink, pointer_width: PointerWidth, _compression: Compression) {
    channel.encode_header(sink);
    let hierarchy_slot = sink.reserve_pointer(pointer_width);
    let hierarchy_offset = sink.position() as u64;
    sink.patch_pointer(hierarchy_slot, pointer_width, hierarchy_offset);
    channel.hierarchy.encode(sink, pointer_width);
}

fn encode_layer(layer: &Layer, sink: &mut Sink, pointer_width: PointerWidth, compression: Compression) {
    layer.encode_header(sink);

    let hierarchy_slot = sink.reserve_pointer(pointer_width);
    let mask_slot = sink.reserve_pointer(pointer_width);

    let hierarchy_offset = sink.position() as u64;
    sink.patch_pointer(hierarchy_slot, pointer_width, hierarchy_offset);
    layer.hierarchy.encode(sink, pointer_width);

    match &layer.mask {
        Some(mask) => {
            let mask_offset = sink.position() as u64;
            sink.patch_pointer(mask_slot, pointer_width, mask_offset);
            encode_channel(mask, sink, pointer_width, compression);
        }
        None => sink.patch_pointer(mask_slot, pointer_width, 0),
    }
}

fn read_pointer_list(cursor: &mut Cursor<'_>, pointer_width: PointerWidth) -> Result<Vec<u64>> {
    let mut pointers = Vec::new();
    loop {
        let pointer = cursor.read_pointer(pointer_width)?;
        if pointer == 0 {
            break;
        }
        pointers.push(pointer);
    }
    Ok(pointers)
}

fn pointer_offset(pointer: u64, buffer_len: usize, error_offset: usize) -> Result<usize> {
    let offset = usize::try_from(pointer)
        .map_err(|_| Error::PointerOutOfRange { offset: error_offset, pointer, buffer_len })?;
    if offset > buffer_len {
        return Err(Error::PointerOutOfRange { offset: error_offset, pointer, buffer_len });
    }
    Ok(offset)
}

fn parse_version_token(token: &str, offset: usize) -> Result<u32> {
    if token == "file" {
        return Ok(0);
    }
    token
        .strip_prefix('v')
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or(Error::BadMagic { offset })
}

fn version_token(version: u32) -> String {
    if version == 0 {
        "file".to_string()
    } else {
        format!("v{version:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{Hierarchy, Level};
    use crate::layer::ColorMode;

    fn tiny_layer(name: &str) -> Layer {
        let level = Level::new(1, 1, 3, Compression::None, vec![vec![10, 20, 30]]);
        let hierarchy = Hierarchy::new(1, 1, 3, level).unwrap();
        Layer {
            width: 1,
            height: 1,
            color_mode: ColorMode::Rgb,
            name: name.to_string(),
            properties: PropertyBag::new(),
            mask: None,
            hierarchy,
        }
    }

    #[test]
    fn version_token_round_trips() {
        assert_eq!(parse_version_token("file", 0).unwrap(), 0);
        assert_eq!(parse_version_token("v011", 0).unwrap(), 11);
        assert_eq!(version_token(0), "file");
        assert_eq!(version_token(11), "v011");
    }

    #[test]
    fn rejects_bad_magic() {
        let data = b"not an xcf file at all..............";
        assert!(matches!(Document::from_bytes(data), Err(Error::BadMagic { .. })));
    }

    #[test]
    fn document_round_trips_through_encode_decode() {
        let doc = Document {
            version: 11,
            width: 1,
            height: 1,
            base_color_mode: BaseColorMode::Rgb,
            precision: Precision::IMPLICIT_LEGACY,
            properties: PropertyBag::new(),
            layers: vec![tiny_layer("bg")],
            channels: vec![],
        };

        let bytes = doc.to_bytes().unwrap();
        let decoded = Document::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.version, doc.version);
        assert_eq!(decoded.layers.len(), 1);
        assert_eq!(decoded.layers[0].name, "bg");
        assert_eq!(decoded.layers[0].hierarchy.top_level().raster(), vec![10, 20, 30]);
    }

    #[test]
    fn precision_required_version_gates_64_bit_float() {
        let precision = Precision { bits: 64, gamma: Gamma::Linear, numeric: Numeric::Float };
        assert_eq!(precision.required_version(), 7);
    }

    #[test]
    fn two_layer_rgba_rle_document_round_trips() {
        let pixels: Vec<u8> = (0..(4 * 4 * 4)).map(|i| (i * 13 % 255) as u8).collect();
        let rgba_layer = |name: &str| {
            let level = Level::new(4, 4, 4, Compression::Rle, vec![pixels.clone()]);
            let hierarchy = Hierarchy::new(4, 4, 4, level).unwrap();
            Layer {
                width: 4,
                height: 4,
                color_mode: ColorMode::RgbAlpha,
                name: name.to_string(),
                properties: PropertyBag::new(),
                mask: None,
                hierarchy,
            }
        };

        let doc = Document {
            version: 11,
            width: 4,
            height: 4,
            base_color_mode: BaseColorMode::Rgb,
            precision: Precision::IMPLICIT_LEGACY,
            properties: PropertyBag::new(),
            layers: vec![rgba_layer("bottom"), rgba_layer("top")],
            channels: vec![],
        };

        let bytes = doc.to_bytes().unwrap();
        let decoded = Document::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.layers.len(), 2);
        assert_eq!(decoded.layers[0].width, decoded.width);
        assert_eq!(decoded.layers[0].color_mode, ColorMode::RgbAlpha);
        for layer in &decoded.layers {
            assert_eq!(layer.hierarchy.top_level().raster(), pixels);
        }
    }

    #[test]
    fn to_bytes_rejects_color_mode_bpp_mismatch() {
        let mut layer = tiny_layer("bg");
        layer.color_mode = ColorMode::RgbAlpha; // bpp 4, hierarchy is bpp 3

        let doc = Document {
            version: 11,
            width: 1,
            height: 1,
            base_color_mode: BaseColorMode::Rgb,
            precision: Precision::IMPLICIT_LEGACY,
            properties: PropertyBag::new(),
            layers: vec![layer],
            channels: vec![],
        };

        assert!(matches!(
            doc.to_bytes(),
            Err(Error::InconsistentColorMode { expected_bpp: 4, hierarchy_bpp: 3 })
        ));
    }

    #[test]
    fn to_bytes_rejects_precision_above_document_version() {
        let doc = Document {
            version: 3,
            width: 1,
            height: 1,
            base_color_mode: BaseColorMode::Rgb,
            precision: Precision { bits: 64, gamma: Gamma::Linear, numeric: Numeric::Float },
            properties: PropertyBag::new(),
            layers: vec![],
            channels: vec![],
        };

        assert!(matches!(
            doc.to_bytes(),
            Err(Error::PrecisionVersionMismatch { required: 7, version: 3 })
        ));
    }
}
