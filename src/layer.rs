//! Layer (component F): a named multi-plane raster with color mode,
//! position, an optional mask, and properties (spec §3, §4.F).

use crate::channel::Channel;
use crate::cursor::{Cursor, PointerWidth, Sink};
use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::property::{Property, PropertyBag};
use crate::tile::Compression;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    RgbAlpha,
    Gray,
    GrayAlpha,
    Indexed,
    IndexedAlpha,
}

impl ColorMode {
    /// Plane count this color mode implies (spec §4.F mapping table).
    pub fn bpp(self) -> u32 {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::RgbAlpha => 4,
            ColorMode::Gray => 1,
            ColorMode::GrayAlpha => 2,
            ColorMode::Indexed => 1,
            ColorMode::IndexedAlpha => 2,
        }
    }

    fn from_code(code: u32) -> Self {
        // On-disk encoding mirrors GIMP's base `image_type` × has-alpha
        // combination, flattened to a single small integer by `Document`;
        // RGB=0, RGBA=1, Gray=2, GrayA=3, Indexed=4, IndexedA=5.
        match code {
            1 => ColorMode::RgbAlpha,
            2 => ColorMode::Gray,
            3 => ColorMode::GrayAlpha,
            4 => ColorMode::Indexed,
            5 => ColorMode::IndexedAlpha,
            _ => ColorMode::Rgb,
        }
    }

    fn to_code(self) -> u32 {
        match self {
            ColorMode::Rgb => 0,
            ColorMode::RgbAlpha => 1,
            ColorMode::Gray => 2,
            ColorMode::GrayAlpha => 3,
            ColorMode::Indexed => 4,
            ColorMode::IndexedAlpha => 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub width: u32,
    pub height: u32,
    pub color_mode: ColorMode,
    pub name: String,
    pub properties: PropertyBag,
    pub mask: Option<Channel>,
    pub hierarchy: Hierarchy,
}

impl Layer {
    /// `true` if this layer is a group node (carries `PROP_GROUP_ITEM`).
    pub fn is_group(&self) -> bool {
        self.properties.find(|p| matches!(p, Property::GroupItem)).is_some()
    }

    /// This layer's path from the root of the group tree, if any
    /// (`PROP_ITEM_PATH`).
    pub fn item_path(&self) -> Option<&[u32]> {
        self.properties.iter().find_map(|p| match p {
            Property::ItemPath(path) => Some(path.as_slice()),
            _ => None,
        })
    }

    pub(crate) fn decode(
        cursor: &mut Cursor<'_>,
        pointer_width: PointerWidth,
        compression: Compression,
    ) -> Result<Self> {
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        let color_mode = ColorMode::from_code(cursor.read_u32()?);
        let name = cursor.read_xcf_string()?;
        let properties = PropertyBag::decode(cursor)?;

        let buffer_len = cursor.len();
        let hierarchy_pointer = cursor.read_pointer(pointer_width)?;
        let mask_pointer = cursor.read_pointer(pointer_width)?;

        let hierarchy_offset = usize::try_from(hierarchy_pointer).map_err(|_| Error::PointerOutOfRange {
            offset: cursor.position(),
            pointer: hierarchy_pointer,
            buffer_len,
        })?;
        let mut hierarchy_cursor = Cursor::at(cursor.full_buffer(), hierarchy_offset);
        let hierarchy = Hierarchy::decode(&mut hierarchy_cursor, pointer_width, compression)?;

        if hierarchy.bpp != color_mode.bpp() {
            return Err(Error::InconsistentColorMode {
                expected_bpp: color_mode.bpp(),
                hierarchy_bpp: hierarchy.bpp,
            });
        }

        let mask = if mask_pointer == 0 {
            None
        } else {
            let mask_offset = usize::try_from(mask_pointer).map_err(|_| Error::PointerOutOfRange {
                offset: cursor.position(),
                pointer: mask_pointer,
                buffer_len,
            })?;
            let mut mask_cursor = Cursor::at(cursor.full_buffer(), mask_offset);
            Some(Channel::decode(&mut mask_cursor, pointer_width, compression)?)
        };

        Ok(Layer { width, height, color_mode, name, properties, mask, hierarchy })
    }

    pub(crate) fn encode_header(&self, sink: &mut Sink) {
        sink.write_u32(self.width);
        sink.write_u32(self.height);
        sink.write_u32(self.color_mode.to_code());
        sink.write_xcf_string(&self.name);
        self.properties.encode(sink);
    }
}

/// Resolves `PROP_GROUP_ITEM`/`PROP_ITEM_PATH` into a tree of indices into
/// `layers`, per spec §4.F ("path lookup is an algorithm over the flat
/// layer list, not an on-disk tree").
///
/// Returns the indices of root-level layers (those with no path, or whose
/// path's prefix doesn't resolve to another group in `layers`); callers
/// recurse into a group's children by filtering for layers whose path has
/// that group's own path as an immediate prefix.
pub fn root_layer_indices(layers: &[Layer]) -> Vec<usize> {
    layers
        .iter()
        .enumerate()
        .filter(|(_, layer)| layer.item_path().map(|p| p.is_empty()).unwrap_or(true))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of `layers` whose `PROP_ITEM_PATH` names `parent_path` as an
/// immediate prefix, i.e. the direct children of the group at that path.
pub fn child_layer_indices(layers: &[Layer], parent_path: &[u32]) -> Vec<usize> {
    layers
        .iter()
        .enumerate()
        .filter(|(_, layer)| match layer.item_path() {
            Some(path) => path.len() == parent_path.len() + 1 && path.starts_with(parent_path),
            None => false,
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_bpp_mapping() {
        assert_eq!(ColorMode::Rgb.bpp(), 3);
        assert_eq!(ColorMode::RgbAlpha.bpp(), 4);
        assert_eq!(ColorMode::Indexed.bpp(), 1);
    }

    #[test]
    fn color_mode_code_round_trips() {
        for mode in [
            ColorMode::Rgb,
            ColorMode::RgbAlpha,
            ColorMode::Gray,
            ColorMode::GrayAlpha,
            ColorMode::Indexed,
            ColorMode::IndexedAlpha,
        ] {
            assert_eq!(ColorMode::from_code(mode.to_code()), mode);
        }
    }
}
