//! Optional `tree_view` feature: a `Display` impl rendering a document's
//! layer stack as an indented tree, resolving `PROP_GROUP_ITEM`/
//! `PROP_ITEM_PATH` into actual nesting.
//!
//! Grounded in the teacher's `internals::tree::LayerTree` (`colored` +
//! recursive `Display`), generalized from SAI's single flat layer list to
//! XCF's group-node tree.

use std::fmt::{self, Display, Formatter};

use colored::Colorize;

use crate::document::Document;
use crate::layer::{child_layer_indices, root_layer_indices, Layer};

pub struct LayerTree<'a> {
    document: &'a Document,
}

impl<'a> LayerTree<'a> {
    pub fn new(document: &'a Document) -> Self {
        LayerTree { document }
    }

    fn write_node(&self, f: &mut Formatter<'_>, index: usize, path: &[u32], depth: usize) -> fmt::Result {
        let layer = &self.document.layers[index];
        let indent = "  ".repeat(depth);
        let label = format_label(layer);
        writeln!(f, "{indent}{label}")?;

        if layer.is_group() {
            let mut child_path = path.to_vec();
            // The group's own path component is its position among
            // siblings; since layers only carry their own `item_path`
            // (not their index within it), we key children directly off
            // this layer's index, matching spec §4.F's "algorithm over
            // the flat layer list, not an on-disk tree".
            child_path.push(index as u32);
            for &child in &child_layer_indices(&self.document.layers, &child_path) {
                self.write_node(f, child, &child_path, depth + 1)?;
            }
        }

        Ok(())
    }
}

fn format_label(layer: &Layer) -> String {
    let name = if layer.is_group() { layer.name.blue().bold() } else { layer.name.normal() };
    format!("{name} ({}×{})", layer.width, layer.height)
}

impl<'a> Display for LayerTree<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &root in &root_layer_indices(self.document.layers.as_slice()) {
            self.write_node(f, root, &[], 0)?;
        }
        Ok(())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "XCF v{} {}x{}", self.version, self.width, self.height)?;
        write!(f, "{}", LayerTree::new(self))
    }
}
