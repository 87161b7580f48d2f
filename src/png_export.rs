//! Optional `png` feature: dumps a single, already-decoded [`Layer`]'s raw
//! pixels to a PNG. Mirrors the teacher's `doc::layer::to_png`/
//! `doc::thumbnail::to_png` — a raw per-layer raster dump, not a composited
//! render (final compositing stays out of scope per spec's Non-goals).

use std::io::Write;

use png::{BitDepth, ColorType, Encoder};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::layer::{ColorMode, Layer};
use crate::property::Property;

impl Layer {
    /// Encodes this layer's top-level raster as a PNG into `writer`.
    /// Indexed color modes are expanded to RGB(A) via `document`'s
    /// `PROP_COLORMAP`, since PNG's own palette chunk isn't modeled here.
    pub fn write_png<W: Write>(&self, document: &Document, writer: W) -> Result<()> {
        let raster = self.hierarchy.top_level().raster();
        let (color_type, pixels) = match self.color_mode {
            ColorMode::Rgb => (ColorType::Rgb, raster),
            ColorMode::RgbAlpha => (ColorType::Rgba, raster),
            ColorMode::Gray => (ColorType::Grayscale, raster),
            ColorMode::GrayAlpha => (ColorType::GrayscaleAlpha, raster),
            ColorMode::Indexed => (ColorType::Rgb, expand_indexed(document, &raster, false)?),
            ColorMode::IndexedAlpha => (ColorType::Rgba, expand_indexed(document, &raster, true)?),
        };

        let mut encoder = Encoder::new(writer, self.width, self.height);
        encoder.set_color(color_type);
        encoder.set_depth(BitDepth::Eight);
        let mut png_writer = encoder
            .write_header()
            .map_err(|_| Error::UnsupportedFeature { what: "PNG header write failed" })?;
        png_writer
            .write_image_data(&pixels)
            .map_err(|_| Error::UnsupportedFeature { what: "PNG image data write failed" })?;
        Ok(())
    }
}

fn expand_indexed(document: &Document, raster: &[u8], has_alpha: bool) -> Result<Vec<u8>> {
    let colormap = match document.properties.find(|p| matches!(p, Property::Colormap(_))) {
        Some(Property::Colormap(colors)) => colors,
        _ => return Err(Error::UnsupportedFeature { what: "indexed layer without a document colormap" }),
    };

    let stride = if has_alpha { 2 } else { 1 };
    let mut out = Vec::with_capacity(raster.len() / stride * if has_alpha { 4 } else { 3 });
    for pixel in raster.chunks(stride) {
        let (r, g, b) = colormap.get(pixel[0] as usize).copied().unwrap_or((0, 0, 0));
        out.extend_from_slice(&[r, g, b]);
        if has_alpha {
            out.push(pixel[1]);
        }
    }
    Ok(out)
}
