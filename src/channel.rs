//! Channel (component E): a named single-plane raster used for masks and
//! selections. Always `bpp = 1` (spec §3, §4.E).

use crate::cursor::{Cursor, PointerWidth, Sink};
use crate::error::Result;
use crate::hierarchy::Hierarchy;
use crate::property::PropertyBag;
use crate::tile::Compression;

#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub width: u32,
    pub height: u32,
    pub name: String,
    pub properties: PropertyBag,
    pub hierarchy: Hierarchy,
}

impl Channel {
    pub(crate) fn decode(
        cursor: &mut Cursor<'_>,
        pointer_width: PointerWidth,
        compression: Compression,
    ) -> Result<Self> {
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        let name = cursor.read_xcf_string()?;
        let properties = PropertyBag::decode(cursor)?;

        let buffer_len = cursor.len();
        let pointer = cursor.read_pointer(pointer_width)?;
        let offset = usize::try_from(pointer).map_err(|_| crate::error::Error::PointerOutOfRange {
            offset: cursor.position(),
            pointer,
            buffer_len,
        })?;

        let mut hierarchy_cursor = Cursor::at(cursor.full_buffer(), offset);
        let hierarchy = Hierarchy::decode(&mut hierarchy_cursor, pointer_width, compression)?;

        Ok(Channel { width, height, name, properties, hierarchy })
    }

    pub(crate) fn encode_header(&self, sink: &mut Sink) {
        sink.write_u32(self.width);
        sink.write_u32(self.height);
        sink.write_xcf_string(&self.name);
        self.properties.encode(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Level;

    #[test]
    fn channel_header_round_trips_name_and_properties() {
        let mut props = PropertyBag::new();
        props.push(crate::property::Property::Visible(true));

        let level = Level::new(4, 4, 1, Compression::None, vec![vec![0u8; 16]]);
        let hierarchy = Hierarchy::new(4, 4, 1, level).unwrap();

        let channel = Channel { width: 4, height: 4, name: "mask".into(), properties: props, hierarchy };

        let mut sink = Sink::new();
        channel.encode_header(&mut sink);
        let bytes = sink.into_bytes();

        let mut cursor = Cursor::new(&bytes);
        let w = cursor.read_u32().unwrap();
        let h = cursor.read_u32().unwrap();
        let name = cursor.read_xcf_string().unwrap();
        assert_eq!((w, h, name.as_str()), (4, 4, "mask"));
    }
}
