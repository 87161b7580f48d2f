//! Reads and writes GIMP's native XCF document format, plus its ancillary
//! resource formats: brushes (`.gbr`), patterns (`.pat`), brush pipes
//! (`.gih`), legacy combined brush/pattern blobs (`.gpb`), parametric
//! brushes (`.vbr`), gradients (`.ggr`), palettes (`.gpl`), and tool
//! presets (`.gtp`).
//!
//! [`Document`] is the entry point for XCF itself:
//!
//! ```no_run
//! use xcf::Document;
//!
//! let document = Document::open("example.xcf")?;
//! for layer in &document.layers {
//!     println!("{} ({}x{})", layer.name, layer.width, layer.height);
//! }
//! # Ok::<(), xcf::Error>(())
//! ```
//!
//! The ancillary formats live under [`ancillary`] and are decoded/encoded
//! independently of any XCF document.

pub mod ancillary;
pub mod channel;
pub mod cursor;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod layer;
pub mod property;
pub mod tile;
pub mod vector;

#[cfg(feature = "png")]
pub mod png_export;
#[cfg(feature = "tree_view")]
pub mod tree;

pub use channel::Channel;
pub use document::{BaseColorMode, Document, Gamma, Numeric, Precision};
pub use error::{Error, Result};
pub use layer::{ColorMode, Layer};
pub use property::{BlendMode, Parasite, Property, PropertyBag};
pub use tile::Compression;
pub use vector::{Stroke, Vector};
