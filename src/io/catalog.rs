//! XML tile catalog loading
//!
//! The catalog format is
//!
//! ```xml
//! <set>
//!   <tiles>
//!     <tile name="corner" symmetry="L" weight="0.5"/>
//!   </tiles>
//!   <neighbors>
//!     <neighbor left="corner 1" right="corner"/>
//!   </neighbors>
//! </set>
//! ```
//!
//! `symmetry` defaults to `X` and `weight` to 1. When a tile directory is
//! given, each tile's bitmap is read from `<dir>/<name>.png`.

use std::path::Path;

use image::RgbaImage;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::io::error::{Result, WfcError, catalog_parse};
use crate::spatial::symmetry::SymmetryClass;
use crate::spatial::tiles::{NeighborRule, TileCatalog, TileDefinition, TileRef};

/// Parse a catalog document without bitmaps
///
/// # Errors
///
/// Returns [`WfcError::CatalogParse`] if the XML is malformed, the `<tiles>`
/// or `<neighbors>` section is missing, or an element lacks a required
/// attribute
pub fn parse_catalog(xml: &str) -> Result<TileCatalog> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut catalog = TileCatalog::new();
    let mut in_tiles = false;
    let mut in_neighbors = false;
    let mut seen_tiles = false;
    let mut seen_neighbors = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"tiles" => {
                    in_tiles = true;
                    seen_tiles = true;
                }
                b"neighbors" => {
                    in_neighbors = true;
                    seen_neighbors = true;
                }
                _ => read_entry(e, in_tiles, in_neighbors, &mut catalog)?,
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"tiles" => seen_tiles = true,
                b"neighbors" => seen_neighbors = true,
                _ => read_entry(e, in_tiles, in_neighbors, &mut catalog)?,
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"tiles" => in_tiles = false,
                b"neighbors" => in_neighbors = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(error) => return Err(catalog_parse(&format!("XML parse error: {error}"))),
            _ => {}
        }
    }

    if !seen_tiles {
        return Err(catalog_parse(&"no <tiles> element found"));
    }
    if !seen_neighbors {
        return Err(catalog_parse(&"no <neighbors> element found"));
    }
    Ok(catalog)
}

fn read_entry(
    element: &BytesStart<'_>,
    in_tiles: bool,
    in_neighbors: bool,
    catalog: &mut TileCatalog,
) -> Result<()> {
    match element.name().as_ref() {
        b"tile" if in_tiles => {
            catalog.add_tile(parse_tile(element)?);
        }
        b"neighbor" if in_neighbors => {
            catalog.add_rule(parse_neighbor(element)?);
        }
        _ => {}
    }
    Ok(())
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|error| catalog_parse(&format!("bad attribute: {error}")))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|error| catalog_parse(&format!("bad value for '{key}': {error}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required(element: &BytesStart<'_>, key: &str) -> Result<String> {
    attribute(element, key)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
            catalog_parse(&format!("<{tag}> is missing required attribute \"{key}\""))
        })
}

fn parse_tile(element: &BytesStart<'_>) -> Result<TileDefinition> {
    let name = required(element, "name")?;
    let symmetry = match attribute(element, "symmetry")? {
        Some(raw) => raw.trim().parse::<SymmetryClass>()?,
        None => SymmetryClass::X,
    };
    let weight = match attribute(element, "weight")? {
        Some(raw) => raw.trim().parse::<f64>().map_err(|error| {
            catalog_parse(&format!("tile '{name}' has bad weight '{raw}': {error}"))
        })?,
        None => 1.0,
    };
    Ok(TileDefinition::new(name, symmetry, weight))
}

fn parse_neighbor(element: &BytesStart<'_>) -> Result<NeighborRule> {
    let left = required(element, "left")?.parse::<TileRef>()?;
    let right = required(element, "right")?.parse::<TileRef>()?;
    Ok(NeighborRule::new(left, right))
}

/// Read a catalog file, with bitmaps when `tiles_dir` is given
///
/// # Errors
///
/// Returns an error if the file cannot be read, the document does not
/// parse, or a bitmap is missing or unreadable
pub fn load_catalog(xml_path: &Path, tiles_dir: Option<&Path>) -> Result<TileCatalog> {
    let xml = std::fs::read_to_string(xml_path).map_err(|e| WfcError::FileSystem {
        path: xml_path.to_path_buf(),
        operation: "read catalog",
        source: e,
    })?;
    let parsed = parse_catalog(&xml)?;

    let Some(dir) = tiles_dir else {
        return Ok(parsed);
    };

    let mut catalog = TileCatalog::new();
    for tile in parsed.tiles() {
        let bitmap = load_bitmap(&dir.join(format!("{}.png", tile.name)))?;
        catalog.add_tile(tile.clone().with_bitmap(bitmap));
    }
    for rule in parsed.rules() {
        catalog.add_rule(rule.clone());
    }
    Ok(catalog)
}

/// Load one tile bitmap as RGBA
///
/// # Errors
///
/// Returns [`WfcError::ImageLoad`] if the file is missing or not an image
pub fn load_bitmap(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|e| WfcError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.to_rgba8())
}
