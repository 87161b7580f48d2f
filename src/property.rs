//! Property codec (component B): the self-describing typed stream shared by
//! [`crate::document::Document`], [`crate::layer::Layer`], and
//! [`crate::channel::Channel`].
//!
//! Wire shape per entry: `u32 type; u32 payload_length; payload`. Decoding
//! is a dispatch loop keyed on the type id, in the same shape as the
//! teacher's `doc::canvas` stream-tag loop (`while let Some((tag, size)) =
//! reader.read_stream_header()`), generalized from a fixed small tag set to
//! the 39 property ids enumerated in spec §4.B.

use crate::cursor::{Cursor, Sink};
use crate::error::{Error, Result};
use crate::tile::Compression;
use crate::vector::Vector;

const PROP_END: u32 = 0;
const PROP_COLORMAP: u32 = 1;
const PROP_ACTIVE_LAYER: u32 = 2;
const PROP_ACTIVE_CHANNEL: u32 = 3;
const PROP_SELECTION: u32 = 4;
const PROP_FLOATING_SELECTION: u32 = 5;
const PROP_OPACITY: u32 = 6;
const PROP_MODE: u32 = 7;
const PROP_VISIBLE: u32 = 8;
const PROP_LINKED: u32 = 9;
const PROP_LOCK_ALPHA: u32 = 10;
const PROP_APPLY_MASK: u32 = 11;
const PROP_EDIT_MASK: u32 = 12;
const PROP_SHOW_MASK: u32 = 13;
const PROP_SHOW_MASKED: u32 = 14;
const PROP_OFFSETS: u32 = 15;
const PROP_COLOR: u32 = 16;
const PROP_COMPRESSION: u32 = 17;
const PROP_GUIDES: u32 = 18;
const PROP_RESOLUTION: u32 = 19;
const PROP_TATTOO: u32 = 20;
const PROP_PARASITES: u32 = 21;
const PROP_UNIT: u32 = 22;
const PROP_PATHS: u32 = 23;
const PROP_USER_UNIT: u32 = 24;
const PROP_VECTORS: u32 = 25;
const PROP_TEXT_LAYER_FLAGS: u32 = 26;
const PROP_OLD_SAMPLE_POINTS: u32 = 27;
const PROP_LOCK_CONTENT: u32 = 28;
const PROP_GROUP_ITEM: u32 = 29;
const PROP_ITEM_PATH: u32 = 30;
const PROP_GROUP_ITEM_FLAGS: u32 = 31;
const PROP_LOCK_POSITION: u32 = 32;
const PROP_FLOAT_OPACITY: u32 = 33;
const PROP_COLOR_TAG: u32 = 34;
const PROP_COMPOSITE_MODE: u32 = 35;
const PROP_COMPOSITE_SPACE: u32 = 36;
const PROP_BLEND_SPACE: u32 = 37;
const PROP_FLOAT_COLOR: u32 = 38;
const PROP_SAMPLE_POINTS: u32 = 39;

/// Full legacy+new blend mode name table, extracted from the reference
/// editor's own `BLEND_MODES` list (index == on-disk `PROP_MODE` value).
pub const BLEND_MODE_NAMES: [&str; 62] = [
    "Normal (legacy)",
    "Dissolve (legacy)",
    "Behind (legacy)",
    "Multiply (legacy)",
    "Screen (legacy)",
    "Old broken Overlay",
    "Difference (legacy)",
    "Addition (legacy)",
    "Subtract (legacy)",
    "Darken only (legacy)",
    "Lighten only (legacy)",
    "Hue (HSV) (legacy)",
    "Saturation (HSV) (legacy)",
    "Color (HSL) (legacy)",
    "Value (HSV) (legacy)",
    "Divide (legacy)",
    "Dodge (legacy)",
    "Burn (legacy)",
    "Hard Light (legacy)",
    "Soft light (legacy)",
    "Grain extract (legacy)",
    "Grain merge (legacy)",
    "Color erase (legacy)",
    "Overlay",
    "Hue (LCH)",
    "Chroma (LCH)",
    "Color (LCH)",
    "Lightness (LCH)",
    "Normal",
    "Behind",
    "Multiply",
    "Screen",
    "Difference",
    "Addition",
    "Substract",
    "Darken only",
    "Lighten only",
    "Hue (HSV)",
    "Saturation (HSV)",
    "Color (HSL)",
    "Value (HSV)",
    "Divide",
    "Dodge",
    "Burn",
    "Hard light",
    "Soft light",
    "Grain extract",
    "Grain merge",
    "Vivid light",
    "Pin light",
    "Linear light",
    "Hard mix",
    "Exclusion",
    "Linear burn",
    "Luma/Luminance darken only",
    "Luma/Luminance lighten only",
    "Luminance",
    "Color erase",
    "Erase",
    "Merge",
    "Split",
    "Pass through",
];

pub const COMPOSITE_MODE_NAMES: [&str; 4] = ["Union", "Clip to backdrop", "Clip to layer", "Intersection"];
pub const COMPOSITE_SPACE_NAMES: [&str; 3] = ["RGB (linear)", "RGB (perceptual)", "LAB"];
pub const TAG_COLOR_NAMES: [&str; 9] =
    ["None", "Blue", "Green", "Yellow", "Orange", "Brown", "Red", "Violet", "Gray"];
pub const UNIT_NAMES: [&str; 4] = ["Inches", "Millimeters", "Points", "Picas"];

/// A blend mode, stored as the raw on-disk integer with a textual name
/// accessor (spec §4.B: "decoder stores the integer and exposes a textual
/// name").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendMode(pub u32);

impl BlendMode {
    pub fn name(self) -> &'static str {
        BLEND_MODE_NAMES.get(self.0 as usize).copied().unwrap_or("Unknown")
    }

    /// Reverse lookup for tooling that accepts a mode by name (e.g. the CLI).
    pub fn from_name(name: &str) -> Option<BlendMode> {
        BLEND_MODE_NAMES.iter().position(|candidate| *candidate == name).map(|i| BlendMode(i as u32))
    }
}

macro_rules! named_index_enum {
    ($name:ident, $table:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name(pub u32);

        impl $name {
            pub fn name(self) -> &'static str {
                $table.get(self.0 as usize).copied().unwrap_or("Unknown")
            }
        }
    };
}

named_index_enum!(Unit, UNIT_NAMES);
named_index_enum!(TagColor, TAG_COLOR_NAMES);

/// `PROP_COMPOSITE_MODE`/`PROP_COMPOSITE_SPACE` are signed: a negative value
/// means "auto", with the mode index in its absolute value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedMode {
    pub auto: bool,
    pub index: u32,
}

impl SignedMode {
    fn decode(raw: i32) -> Self {
        SignedMode { auto: raw < 0, index: raw.unsigned_abs() }
    }

    fn encode(self) -> i32 {
        let magnitude = self.index as i32;
        if self.auto {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn composite_mode_name(self) -> &'static str {
        COMPOSITE_MODE_NAMES.get(self.index as usize).copied().unwrap_or("Unknown")
    }

    pub fn composite_space_name(self) -> &'static str {
        COMPOSITE_SPACE_NAMES.get(self.index as usize).copied().unwrap_or("Unknown")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserUnit {
    pub factor: f32,
    pub digits: u32,
    /// `[identifier, symbol, abbreviation, singular, plural]`, per the
    /// reference editor's user-unit record.
    pub names: [String; 5],
}

/// Arbitrary named metadata attachable to any property-carrying entity
/// (spec §3 "Parasite"). Decode-only in the source this is grounded on;
/// encode is added here since this crate is read/write.
#[derive(Clone, Debug, PartialEq)]
pub struct Parasite {
    pub name: String,
    pub flags: u32,
    pub payload: Vec<u8>,
}

impl Parasite {
    pub(crate) fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let name = cursor.read_xcf_string()?;
        let flags = cursor.read_u32()?;
        let len = cursor.read_u32()? as usize;
        let payload = cursor.read_slice(len)?.to_vec();
        Ok(Parasite { name, flags, payload })
    }

    pub(crate) fn encode(&self, sink: &mut Sink) {
        sink.write_xcf_string(&self.name);
        sink.write_u32(self.flags);
        sink.write_u32(self.payload.len() as u32);
        sink.write_bytes(&self.payload);
    }
}

/// One decoded property entry. `Unknown` is the forward-compat catch-all
/// spec §9 calls for: any id this crate doesn't recognize is preserved as
/// raw bytes rather than failing the whole document (`PROP_OLD_SAMPLE_POINTS`
/// is the one id that instead fails outright, per spec — GIMP itself never
/// writes it and treats it as a removed legacy feature).
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Colormap(Vec<(u8, u8, u8)>),
    ActiveLayer,
    ActiveChannel,
    Selection,
    FloatingSelection { attached_to: u32 },
    Opacity(u32),
    Mode(BlendMode),
    Visible(bool),
    Linked(bool),
    LockAlpha(bool),
    ApplyMask(bool),
    EditMask(bool),
    ShowMask(bool),
    ShowMasked(bool),
    Offsets { x: i32, y: i32 },
    Color(u8, u8, u8),
    Compression(Compression),
    Guides(Vec<(i32, GuideOrientation)>),
    Resolution { xres: f32, yres: f32 },
    Tattoo(u32),
    Parasites(Vec<Parasite>),
    Unit(Unit),
    Paths(Vec<u8>),
    UserUnit(UserUnit),
    Vectors { version: u32, active_index: u32, vectors: Vec<Vector> },
    TextLayerFlags(u32),
    LockContent(bool),
    GroupItem,
    ItemPath(Vec<u32>),
    GroupItemFlags(u32),
    LockPosition(bool),
    FloatOpacity(f32),
    ColorTag(TagColor),
    CompositeMode(SignedMode),
    CompositeSpace(SignedMode),
    BlendSpace(u32),
    FloatColor(f32, f32, f32),
    SamplePoints(Vec<(i32, i32)>),
    Unknown { id: u32, payload: Vec<u8> },
}

impl Property {
    fn id(&self) -> u32 {
        match self {
            Property::Colormap(_) => PROP_COLORMAP,
            Property::ActiveLayer => PROP_ACTIVE_LAYER,
            Property::ActiveChannel => PROP_ACTIVE_CHANNEL,
            Property::Selection => PROP_SELECTION,
            Property::FloatingSelection { .. } => PROP_FLOATING_SELECTION,
            Property::Opacity(_) => PROP_OPACITY,
            Property::Mode(_) => PROP_MODE,
            Property::Visible(_) => PROP_VISIBLE,
            Property::Linked(_) => PROP_LINKED,
            Property::LockAlpha(_) => PROP_LOCK_ALPHA,
            Property::ApplyMask(_) => PROP_APPLY_MASK,
            Property::EditMask(_) => PROP_EDIT_MASK,
            Property::ShowMask(_) => PROP_SHOW_MASK,
            Property::ShowMasked(_) => PROP_SHOW_MASKED,
            Property::Offsets { .. } => PROP_OFFSETS,
            Property::Color(..) => PROP_COLOR,
            Property::Compression(_) => PROP_COMPRESSION,
            Property::Guides(_) => PROP_GUIDES,
            Property::Resolution { .. } => PROP_RESOLUTION,
            Property::Tattoo(_) => PROP_TATTOO,
            Property::Parasites(_) => PROP_PARASITES,
            Property::Unit(_) => PROP_UNIT,
            Property::Paths(_) => PROP_PATHS,
            Property::UserUnit(_) => PROP_USER_UNIT,
            Property::Vectors { .. } => PROP_VECTORS,
            Property::TextLayerFlags(_) => PROP_TEXT_LAYER_FLAGS,
            Property::LockContent(_) => PROP_LOCK_CONTENT,
            Property::GroupItem => PROP_GROUP_ITEM,
            Property::ItemPath(_) => PROP_ITEM_PATH,
            Property::GroupItemFlags(_) => PROP_GROUP_ITEM_FLAGS,
            Property::LockPosition(_) => PROP_LOCK_POSITION,
            Property::FloatOpacity(_) => PROP_FLOAT_OPACITY,
            Property::ColorTag(_) => PROP_COLOR_TAG,
            Property::CompositeMode(_) => PROP_COMPOSITE_MODE,
            Property::CompositeSpace(_) => PROP_COMPOSITE_SPACE,
            Property::BlendSpace(_) => PROP_BLEND_SPACE,
            Property::FloatColor(..) => PROP_FLOAT_COLOR,
            Property::SamplePoints(_) => PROP_SAMPLE_POINTS,
            Property::Unknown { id, .. } => *id,
        }
    }

    fn decode_payload(id: u32, offset: usize, payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);
        Ok(match id {
            PROP_COLORMAP => {
                let n = cursor.read_u32()?;
                let mut colors = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    colors.push((cursor.read_u8()?, cursor.read_u8()?, cursor.read_u8()?));
                }
                Property::Colormap(colors)
            }
            PROP_ACTIVE_LAYER => Property::ActiveLayer,
            PROP_ACTIVE_CHANNEL => Property::ActiveChannel,
            PROP_SELECTION => Property::Selection,
            PROP_FLOATING_SELECTION => {
                Property::FloatingSelection { attached_to: cursor.read_u32()? }
            }
            PROP_OPACITY => Property::Opacity(cursor.read_u32()?),
            PROP_MODE => Property::Mode(BlendMode(cursor.read_u32()?)),
            PROP_VISIBLE => Property::Visible(cursor.read_bool32()?),
            PROP_LINKED => Property::Linked(cursor.read_bool32()?),
            PROP_LOCK_ALPHA => Property::LockAlpha(cursor.read_bool32()?),
            PROP_APPLY_MASK => Property::ApplyMask(cursor.read_bool32()?),
            PROP_EDIT_MASK => Property::EditMask(cursor.read_bool32()?),
            PROP_SHOW_MASK => Property::ShowMask(cursor.read_bool32()?),
            PROP_SHOW_MASKED => Property::ShowMasked(cursor.read_bool32()?),
            PROP_OFFSETS => Property::Offsets { x: cursor.read_i32()?, y: cursor.read_i32()? },
            PROP_COLOR => Property::Color(cursor.read_u8()?, cursor.read_u8()?, cursor.read_u8()?),
            PROP_COMPRESSION => {
                let code = cursor.read_u8()? as u32;
                Property::Compression(Compression::from_code(offset, code)?)
            }
            PROP_GUIDES => {
                let mut guides = Vec::new();
                while cursor.remaining() > 0 {
                    let position = cursor.read_i32()?;
                    let orientation = match cursor.read_u8()? {
                        2 => GuideOrientation::Vertical,
                        _ => GuideOrientation::Horizontal,
                    };
                    guides.push((position, orientation));
                }
                Property::Guides(guides)
            }
            PROP_RESOLUTION => {
                Property::Resolution { xres: cursor.read_f32()?, yres: cursor.read_f32()? }
            }
            PROP_TATTOO => Property::Tattoo(cursor.read_u32()?),
            PROP_PARASITES => {
                let mut parasites = Vec::new();
                while cursor.remaining() > 0 {
                    parasites.push(Parasite::decode(&mut cursor)?);
                }
                Property::Parasites(parasites)
            }
            PROP_UNIT => Property::Unit(Unit(cursor.read_u32()?)),
            PROP_PATHS => Property::Paths(payload.to_vec()),
            PROP_USER_UNIT => {
                let factor = cursor.read_f32()?;
                let digits = cursor.read_u32()?;
                let names = [
                    cursor.read_xcf_string()?,
                    cursor.read_xcf_string()?,
                    cursor.read_xcf_string()?,
                    cursor.read_xcf_string()?,
                    cursor.read_xcf_string()?,
                ];
                Property::UserUnit(UserUnit { factor, digits, names })
            }
            PROP_VECTORS => {
                let version = cursor.read_u32()?;
                let active_index = cursor.read_u32()?;
                let n = cursor.read_u32()?;
                let mut vectors = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    vectors.push(Vector::decode(&mut cursor)?);
                }
                Property::Vectors { version, active_index, vectors }
            }
            PROP_TEXT_LAYER_FLAGS => Property::TextLayerFlags(cursor.read_u32()?),
            PROP_OLD_SAMPLE_POINTS => {
                return Err(Error::UnsupportedFeature { what: "PROP_OLD_SAMPLE_POINTS" })
            }
            PROP_LOCK_CONTENT => Property::LockContent(cursor.read_bool32()?),
            PROP_GROUP_ITEM => Property::GroupItem,
            PROP_ITEM_PATH => {
                let mut path = Vec::new();
                while cursor.remaining() > 0 {
                    path.push(cursor.read_u32()?);
                }
                Property::ItemPath(path)
            }
            PROP_GROUP_ITEM_FLAGS => Property::GroupItemFlags(cursor.read_u32()?),
            PROP_LOCK_POSITION => Property::LockPosition(cursor.read_bool32()?),
            PROP_FLOAT_OPACITY => Property::FloatOpacity(cursor.read_f32()?),
            PROP_COLOR_TAG => Property::ColorTag(TagColor(cursor.read_u32()?)),
            PROP_COMPOSITE_MODE => Property::CompositeMode(SignedMode::decode(cursor.read_i32()?)),
            PROP_COMPOSITE_SPACE => Property::CompositeSpace(SignedMode::decode(cursor.read_i32()?)),
            PROP_BLEND_SPACE => Property::BlendSpace(cursor.read_u32()?),
            PROP_FLOAT_COLOR => {
                Property::FloatColor(cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?)
            }
            PROP_SAMPLE_POINTS => {
                let mut points = Vec::new();
                while cursor.remaining() > 0 {
                    points.push((cursor.read_i32()?, cursor.read_i32()?));
                }
                Property::SamplePoints(points)
            }
            _ => Property::Unknown { id, payload: payload.to_vec() },
        })
    }

    fn encode_payload(&self, sink: &mut Sink) {
        match self {
            Property::Colormap(colors) => {
                sink.write_u32(colors.len() as u32);
                for (r, g, b) in colors {
                    sink.write_u8(*r);
                    sink.write_u8(*g);
                    sink.write_u8(*b);
                }
            }
            Property::ActiveLayer
            | Property::ActiveChannel
            | Property::Selection
            | Property::GroupItem => {}
            Property::FloatingSelection { attached_to } => sink.write_u32(*attached_to),
            Property::Opacity(value) => sink.write_u32(*value),
            Property::Mode(mode) => sink.write_u32(mode.0),
            Property::Visible(value)
            | Property::Linked(value)
            | Property::LockAlpha(value)
            | Property::ApplyMask(value)
            | Property::EditMask(value)
            | Property::ShowMask(value)
            | Property::ShowMasked(value)
            | Property::LockContent(value)
            | Property::LockPosition(value) => sink.write_bool32(*value),
            Property::Offsets { x, y } => {
                sink.write_i32(*x);
                sink.write_i32(*y);
            }
            Property::Color(r, g, b) => {
                sink.write_u8(*r);
                sink.write_u8(*g);
                sink.write_u8(*b);
            }
            Property::Compression(compression) => sink.write_u8(compression.code() as u8),
            Property::Guides(guides) => {
                for (position, orientation) in guides {
                    sink.write_i32(*position);
                    sink.write_u8(match orientation {
                        GuideOrientation::Horizontal => 1,
                        GuideOrientation::Vertical => 2,
                    });
                }
            }
            Property::Resolution { xres, yres } => {
                sink.write_f32(*xres);
                sink.write_f32(*yres);
            }
            Property::Tattoo(value) => sink.write_u32(*value),
            Property::Parasites(parasites) => {
                for parasite in parasites {
                    parasite.encode(sink);
                }
            }
            Property::Unit(unit) => sink.write_u32(unit.0),
            Property::Paths(raw) => sink.write_bytes(raw),
            Property::UserUnit(unit) => {
                sink.write_f32(unit.factor);
                sink.write_u32(unit.digits);
                for name in &unit.names {
                    sink.write_xcf_string(name);
                }
            }
            Property::Vectors { version, active_index, vectors } => {
                sink.write_u32(*version);
                sink.write_u32(*active_index);
                sink.write_u32(vectors.len() as u32);
                for vector in vectors {
                    vector.encode(sink);
                }
            }
            Property::TextLayerFlags(value) => sink.write_u32(*value),
            Property::ItemPath(path) => {
                for id in path {
                    sink.write_u32(*id);
                }
            }
            Property::GroupItemFlags(value) => sink.write_u32(*value),
            Property::FloatOpacity(value) => sink.write_f32(*value),
            Property::ColorTag(tag) => sink.write_u32(tag.0),
            Property::CompositeMode(mode) => sink.write_i32(mode.encode()),
            Property::CompositeSpace(mode) => sink.write_i32(mode.encode()),
            Property::BlendSpace(value) => sink.write_u32(*value),
            Property::FloatColor(r, g, b) => {
                sink.write_f32(*r);
                sink.write_f32(*g);
                sink.write_f32(*b);
            }
            Property::SamplePoints(points) => {
                for (x, y) in points {
                    sink.write_i32(*x);
                    sink.write_i32(*y);
                }
            }
            Property::Unknown { payload, .. } => sink.write_bytes(payload),
        }
    }
}

/// An ordered, terminator-marked stream of [`Property`] entries (spec §3
/// "PropertyBag").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    properties: Vec<Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn find(&self, mut matcher: impl FnMut(&Property) -> bool) -> Option<&Property> {
        self.properties.iter().find(|p| matcher(p))
    }

    pub(crate) fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let mut bag = PropertyBag::new();
        loop {
            let offset = cursor.position();
            let id = cursor.read_u32()?;
            let len = cursor.read_u32()? as usize;

            if id == PROP_END {
                break;
            }

            let payload = cursor.read_slice(len)?;
            bag.push(Property::decode_payload(id, offset, payload)?);
        }
        Ok(bag)
    }

    pub(crate) fn encode(&self, sink: &mut Sink) {
        // Canonical order: iterate ids 1..=39 and emit each property that
        // was set, in id order, regardless of the order entries were
        // pushed in (spec §4.B "Ordering on encode").
        use itertools::Itertools;
        let ordered = self.properties.iter().sorted_by_key(|p| p.id());

        for property in ordered {
            let mut payload = Sink::new();
            property.encode_payload(&mut payload);
            let payload = payload.into_bytes();

            sink.write_u32(property.id());
            sink.write_u32(payload.len() as u32);
            sink.write_bytes(&payload);
        }

        sink.write_u32(PROP_END);
        sink.write_u32(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_round_trips_and_sorts_by_id() {
        let mut bag = PropertyBag::new();
        bag.push(Property::Visible(true));
        bag.push(Property::Opacity(200));

        let mut sink = Sink::new();
        bag.encode(&mut sink);
        let bytes = sink.into_bytes();

        let mut cursor = Cursor::new(&bytes);
        let decoded = PropertyBag::decode(&mut cursor).unwrap();
        assert_eq!(decoded.properties[0], Property::Opacity(200));
        assert_eq!(decoded.properties[1], Property::Visible(true));
    }

    #[test]
    fn unknown_property_preserved_as_raw_bytes() {
        let mut sink = Sink::new();
        sink.write_u32(9999);
        sink.write_u32(3);
        sink.write_bytes(&[1, 2, 3]);
        sink.write_u32(PROP_END);
        sink.write_u32(0);
        let bytes = sink.into_bytes();

        let mut cursor = Cursor::new(&bytes);
        let decoded = PropertyBag::decode(&mut cursor).unwrap();
        assert_eq!(decoded.properties[0], Property::Unknown { id: 9999, payload: vec![1, 2, 3] });
    }

    #[test]
    fn old_sample_points_is_rejected() {
        let mut sink = Sink::new();
        sink.write_u32(PROP_OLD_SAMPLE_POINTS);
        sink.write_u32(0);
        let bytes = sink.into_bytes();

        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            PropertyBag::decode(&mut cursor),
            Err(Error::UnsupportedFeature { what: "PROP_OLD_SAMPLE_POINTS" })
        ));
    }

    #[test]
    fn blend_mode_name_lookup() {
        assert_eq!(BlendMode(0).name(), "Normal (legacy)");
        assert_eq!(BlendMode(61).name(), "Pass through");
    }

    #[test]
    fn signed_mode_decodes_auto_flag() {
        let mode = SignedMode::decode(-2);
        assert!(mode.auto);
        assert_eq!(mode.index, 2);
        assert_eq!(mode.encode(), -2);
    }
}
