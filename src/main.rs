//! `xcf-cli`: a small inspection/export tool over [`xcf::Document`],
//! mirroring the teacher's single ad hoc `main.rs` (no `clap`) rather than
//! splitting into one binary per ancillary format.
//!
//! Usage: `xcf-cli <file.xcf> [--dump] [--show] [--save=path]
//! [--showLayer=N|*] [--saveLayer=N|*,path]`

#[cfg(feature = "png")]
use std::path::PathBuf;
use std::process::ExitCode;

use xcf::Document;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let input = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: xcf-cli <file.xcf> [--dump] [--show] [--save=path] [--showLayer=N|*] [--saveLayer=N|*,path]");
            return ExitCode::FAILURE;
        }
    };

    let document = match Document::open(&input) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("failed to open {input}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut ran_any = false;
    for arg in args {
        ran_any = true;
        let result = match split_option(&arg) {
            ("--dump", None) => cmd_dump(&document),
            ("--show", None) => cmd_show(&document),
            ("--save", Some(path)) => cmd_save(&document, path),
            ("--showLayer", Some(selector)) => cmd_show_layer(&document, selector),
            ("--saveLayer", Some(rest)) => cmd_save_layer(&document, rest),
            _ => {
                eprintln!("unknown option: {arg}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = result {
            eprintln!("{arg}: {err}");
            return ExitCode::FAILURE;
        }
    }

    if !ran_any {
        cmd_show(&document).ok();
    }

    ExitCode::SUCCESS
}

/// Splits `--flag=value` into `("--flag", Some("value"))`, or `--flag` into
/// `("--flag", None)`.
fn split_option(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (arg, None),
    }
}

fn cmd_dump(document: &Document) -> xcf::Result<()> {
    println!("{document:#?}");
    Ok(())
}

fn cmd_show(document: &Document) -> xcf::Result<()> {
    #[cfg(feature = "tree_view")]
    {
        println!("{document}");
    }
    #[cfg(not(feature = "tree_view"))]
    {
        println!("XCF v{} {}x{}", document.version, document.width, document.height);
        for (i, layer) in document.layers.iter().enumerate() {
            println!("  [{i}] {} ({}x{})", layer.name, layer.width, layer.height);
        }
    }
    Ok(())
}

fn cmd_save(document: &Document, path: &str) -> xcf::Result<()> {
    document.save(path)
}

fn cmd_show_layer(document: &Document, selector: &str) -> xcf::Result<()> {
    for (i, layer) in select_layers(document, selector)? {
        println!(
            "[{i}] {} {}x{} color_mode={:?} mask={}",
            layer.name,
            layer.width,
            layer.height,
            layer.color_mode,
            layer.mask.is_some()
        );
    }
    Ok(())
}

#[cfg(feature = "png")]
fn cmd_save_layer(document: &Document, rest: &str) -> xcf::Result<()> {
    let (selector, path) = rest
        .split_once(',')
        .ok_or(xcf::Error::UnsupportedFeature { what: "--saveLayer requires N|*,path" })?;

    let indices: Vec<usize> = select_layers(document, selector)?.map(|(i, _)| i).collect();
    for i in indices {
        let out_path = layer_output_path(path, i, indices_len_hint(document, selector));
        let file = std::fs::File::create(&out_path)?;
        document.layers[i].write_png(document, file)?;
    }
    Ok(())
}

#[cfg(not(feature = "png"))]
fn cmd_save_layer(_document: &Document, _rest: &str) -> xcf::Result<()> {
    Err(xcf::Error::UnsupportedFeature { what: "--saveLayer requires the `png` feature" })
}

#[cfg(feature = "png")]
fn indices_len_hint(document: &Document, selector: &str) -> usize {
    if selector == "*" {
        document.layers.len()
    } else {
        1
    }
}

#[cfg(feature = "png")]
fn layer_output_path(path: &str, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return PathBuf::from(path);
    }
    let path = PathBuf::from(path);
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "png".to_string());
    path.with_file_name(format!("{stem}.{index}.{ext}"))
}

/// Resolves `N` (a single layer index) or `*` (every layer) against
/// `document.layers`, per spec §6's `--showLayer=N|*`/`--saveLayer=N|*,path`.
fn select_layers<'a>(
    document: &'a Document,
    selector: &str,
) -> xcf::Result<Box<dyn Iterator<Item = (usize, &'a xcf::Layer)> + 'a>> {
    if selector == "*" {
        return Ok(Box::new(document.layers.iter().enumerate()));
    }
    let index: usize = selector
        .parse()
        .map_err(|_| xcf::Error::UnsupportedFeature { what: "layer selector must be N or *" })?;
    if index >= document.layers.len() {
        return Err(xcf::Error::UnsupportedFeature { what: "layer index out of range" });
    }
    Ok(Box::new(document.layers.iter().enumerate().filter(move |(i, _)| *i == index)))
}
