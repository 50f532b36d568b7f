//! Tile catalog and its expansion into oriented variants
//!
//! A [`TileCatalog`] lists base tiles with their symmetry class and the
//! neighbour rules between them. [`TileCatalog::build`] expands every base
//! tile into its distinct orientations, closes the rules under rotation and
//! reflection, and produces the immutable [`TileSet`] shared by every
//! generation attempt.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use image::RgbaImage;
use image::imageops::{flip_horizontal, rotate270};

use crate::algorithm::propagator::{AdjacencyMatrix, Propagator};
use crate::io::error::{Result, WfcError, catalog_parse, invalid_catalog};
use crate::spatial::direction::Direction;
use crate::spatial::symmetry::{SymmetryClass, TRANSFORM_COUNT};

/// A base tile as written in the catalog
#[derive(Clone, Debug)]
pub struct TileDefinition {
    /// Unique tile name
    pub name: String,
    /// Orientation set of the tile
    pub symmetry: SymmetryClass,
    /// Relative frequency, shared by every variant
    pub weight: f64,
    /// Optional square bitmap of the base orientation
    pub bitmap: Option<RgbaImage>,
}

impl TileDefinition {
    /// Definition without a bitmap
    pub fn new(name: impl Into<String>, symmetry: SymmetryClass, weight: f64) -> Self {
        Self {
            name: name.into(),
            symmetry,
            weight,
            bitmap: None,
        }
    }

    /// Attach a bitmap for the base orientation
    #[must_use]
    pub fn with_bitmap(mut self, bitmap: RgbaImage) -> Self {
        self.bitmap = Some(bitmap);
        self
    }
}

/// Reference to one orientation of a base tile, written `"name k"`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileRef {
    /// Base tile name
    pub name: String,
    /// Transform slot, `0..8`
    pub transform: usize,
}

impl TileRef {
    /// Reference a transform of a base tile
    pub fn new(name: impl Into<String>, transform: usize) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }
}

impl FromStr for TileRef {
    type Err = WfcError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(catalog_parse(&"empty tile reference"));
        };
        let transform = match parts.next() {
            None => 0,
            Some(raw) => raw.parse::<usize>().map_err(|error| {
                catalog_parse(&format!("bad transform '{raw}' in '{s}': {error}"))
            })?,
        };
        Ok(Self::new(name, transform))
    }
}

/// Adjacency rule: `right` may sit immediately east of `left`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborRule {
    /// Western tile
    pub left: TileRef,
    /// Eastern tile
    pub right: TileRef,
}

impl NeighborRule {
    /// Rule from two references
    pub const fn new(left: TileRef, right: TileRef) -> Self {
        Self { left, right }
    }
}

/// One concrete orientation of a base tile
#[derive(Clone, Debug)]
pub struct TileVariant {
    /// Dense id, `0..T`
    pub id: usize,
    /// `"<base> <k>"`
    pub name: String,
    /// Selection weight
    pub weight: f64,
    /// Oriented bitmap, if the catalog carries bitmaps
    pub bitmap: Option<RgbaImage>,
}

impl TileVariant {
    /// Base tile name, used to group variants
    pub fn group(&self) -> &str {
        self.name.split(' ').next().unwrap_or(&self.name)
    }
}

/// Base tiles and neighbour rules before expansion
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    tiles: Vec<TileDefinition>,
    rules: Vec<NeighborRule>,
}

impl TileCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a base tile
    pub fn add_tile(&mut self, tile: TileDefinition) -> &mut Self {
        self.tiles.push(tile);
        self
    }

    /// Append a neighbour rule
    pub fn add_rule(&mut self, rule: NeighborRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Base tiles in catalog order
    pub fn tiles(&self) -> &[TileDefinition] {
        &self.tiles
    }

    /// Neighbour rules in catalog order
    pub fn rules(&self) -> &[NeighborRule] {
        &self.rules
    }

    /// Expand the catalog into a [`TileSet`]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The catalog is empty, names repeat, or a weight is not positive
    /// - Bitmaps are present on some tiles only, are not square, or differ in size
    /// - A rule names an unknown tile or a transform outside `0..8`
    /// - A variant ends up with no allowed neighbour in some direction
    pub fn build(&self) -> Result<TileSet> {
        if self.tiles.is_empty() {
            return Err(invalid_catalog(&"catalog contains no tiles"));
        }

        let with_bitmaps = self.tiles.iter().filter(|tile| tile.bitmap.is_some()).count();
        if with_bitmaps != 0 && with_bitmaps != self.tiles.len() {
            return Err(invalid_catalog(&"either every tile or no tile must carry a bitmap"));
        }

        let mut seen = HashSet::new();
        let mut first_variant = HashMap::new();
        let mut variants = Vec::new();
        let mut transforms = Vec::new();
        let mut tile_size = None;

        for tile in &self.tiles {
            if !seen.insert(tile.name.as_str()) {
                return Err(invalid_catalog(&format!("duplicate tile name '{}'", tile.name)));
            }
            if !tile.weight.is_finite() || tile.weight <= 0.0 {
                return Err(invalid_catalog(&format!(
                    "tile '{}' has non-positive weight {}",
                    tile.name, tile.weight
                )));
            }

            let base = variants.len();
            let cardinality = tile.symmetry.cardinality();
            first_variant.insert(tile.name.as_str(), base);

            for local in 0..cardinality {
                transforms.push(tile.symmetry.transforms(base, local));
            }

            let bitmaps = match &tile.bitmap {
                Some(bitmap) => {
                    let size = validate_bitmap(&tile.name, bitmap, tile_size)?;
                    tile_size = Some(size);
                    derive_bitmaps(bitmap, cardinality)
                }
                None => vec![None; cardinality],
            };

            for (local, bitmap) in bitmaps.into_iter().enumerate() {
                variants.push(TileVariant {
                    id: base + local,
                    name: format!("{} {local}", tile.name),
                    weight: tile.weight,
                    bitmap,
                });
            }
        }

        let resolve = |tile_ref: &TileRef| -> Result<usize> {
            let base = first_variant
                .get(tile_ref.name.as_str())
                .copied()
                .ok_or_else(|| WfcError::UnknownTile {
                    name: tile_ref.name.clone(),
                })?;
            if tile_ref.transform >= TRANSFORM_COUNT {
                return Err(WfcError::InvalidTransform {
                    name: tile_ref.name.clone(),
                    index: tile_ref.transform,
                });
            }
            Ok(apply(&transforms, base, tile_ref.transform))
        };

        let mut adjacency = AdjacencyMatrix::new(variants.len());
        for rule in &self.rules {
            let left = resolve(&rule.left)?;
            let right = resolve(&rule.right)?;
            let down = apply(&transforms, left, 1);
            let up = apply(&transforms, right, 1);
            let t = |id: usize, slot: usize| apply(&transforms, id, slot);

            adjacency.allow(Direction::West, right, left);
            adjacency.allow(Direction::West, t(right, 6), t(left, 6));
            adjacency.allow(Direction::West, t(left, 4), t(right, 4));
            adjacency.allow(Direction::West, t(left, 2), t(right, 2));

            adjacency.allow(Direction::South, up, down);
            adjacency.allow(Direction::South, t(down, 6), t(up, 6));
            adjacency.allow(Direction::South, t(up, 4), t(down, 4));
            adjacency.allow(Direction::South, t(down, 2), t(up, 2));
        }

        TileSet::assemble(variants, transforms, adjacency, tile_size)
    }
}

/// Apply transform `slot` to variant `id`
fn apply(transforms: &[[usize; TRANSFORM_COUNT]], id: usize, slot: usize) -> usize {
    transforms
        .get(id)
        .and_then(|row| row.get(slot))
        .copied()
        .unwrap_or(id)
}

fn validate_bitmap(name: &str, bitmap: &RgbaImage, expected: Option<u32>) -> Result<u32> {
    let (width, height) = bitmap.dimensions();
    if width != height || width == 0 {
        return Err(invalid_catalog(&format!(
            "tile '{name}' bitmap is {width}x{height}, expected a non-empty square"
        )));
    }
    match expected {
        Some(size) if size != width => Err(invalid_catalog(&format!(
            "tile '{name}' is {width} pixels wide, other tiles are {size}"
        ))),
        _ => Ok(width),
    }
}

/// Bitmaps of every local variant
///
/// Variants 1 to 3 are successive counter-clockwise quarter turns of the
/// previous variant, variants 4 to 7 mirror variant `k - 4`.
fn derive_bitmaps(base: &RgbaImage, cardinality: usize) -> Vec<Option<RgbaImage>> {
    let mut derived: Vec<RgbaImage> = Vec::with_capacity(cardinality);
    derived.push(base.clone());
    for local in 1..cardinality {
        let next = if local <= 3 {
            derived.get(local - 1).map(rotate270)
        } else {
            derived.get(local - 4).map(flip_horizontal)
        };
        derived.push(next.unwrap_or_else(|| base.clone()));
    }
    derived.into_iter().map(Some).collect()
}

/// Expanded, immutable tile variants with their adjacency
#[derive(Clone, Debug)]
pub struct TileSet {
    variants: Vec<TileVariant>,
    weights: Vec<f64>,
    transforms: Vec<[usize; TRANSFORM_COUNT]>,
    propagator: Propagator,
    tile_size: Option<u32>,
}

impl TileSet {
    /// Build a tile set from explicit variants and a west/south adjacency
    ///
    /// The east and north slices of `adjacency` are derived by
    /// [`AdjacencyMatrix::mirror`]. Variants are renumbered in order and
    /// every transform maps a variant to itself.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no variants, a weight is not positive,
    /// the matrix size differs from the variant count, or a variant is
    /// isolated in some direction
    pub fn from_parts(mut variants: Vec<TileVariant>, adjacency: AdjacencyMatrix) -> Result<Self> {
        if variants.is_empty() {
            return Err(invalid_catalog(&"tile set contains no variants"));
        }
        if adjacency.tile_count() != variants.len() {
            return Err(invalid_catalog(&format!(
                "adjacency covers {} tiles but {} variants were given",
                adjacency.tile_count(),
                variants.len()
            )));
        }
        if let Some(bad) = variants
            .iter()
            .find(|variant| !variant.weight.is_finite() || variant.weight <= 0.0)
        {
            return Err(invalid_catalog(&format!(
                "variant '{}' has non-positive weight {}",
                bad.name, bad.weight
            )));
        }

        let mut tile_size = None;
        for variant in &variants {
            if let Some(bitmap) = &variant.bitmap {
                tile_size = Some(validate_bitmap(&variant.name, bitmap, tile_size)?);
            }
        }

        for (id, variant) in variants.iter_mut().enumerate() {
            variant.id = id;
        }
        let transforms = (0..variants.len()).map(|id| [id; TRANSFORM_COUNT]).collect();
        Self::assemble(variants, transforms, adjacency, tile_size)
    }

    fn assemble(
        variants: Vec<TileVariant>,
        transforms: Vec<[usize; TRANSFORM_COUNT]>,
        mut adjacency: AdjacencyMatrix,
        tile_size: Option<u32>,
    ) -> Result<Self> {
        adjacency.mirror();
        let propagator = adjacency.compact(|id| {
            variants
                .get(id)
                .map_or_else(|| id.to_string(), |variant| variant.name.clone())
        })?;
        let weights = variants.iter().map(|variant| variant.weight).collect();

        Ok(Self {
            variants,
            weights,
            transforms,
            propagator,
            tile_size,
        })
    }

    /// Number of variants `T`
    pub fn tile_count(&self) -> usize {
        self.variants.len()
    }

    /// Every variant in id order
    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    /// Variant by id
    pub fn variant(&self, id: usize) -> Option<&TileVariant> {
        self.variants.get(id)
    }

    /// Variant weights in id order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Transform table row of a variant
    pub fn transforms(&self, id: usize) -> Option<&[usize; TRANSFORM_COUNT]> {
        self.transforms.get(id)
    }

    /// Sparse adjacency
    pub const fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    /// Edge length of the tile bitmaps, if the set carries bitmaps
    pub const fn tile_size(&self) -> Option<u32> {
        self.tile_size
    }

    /// Id of the variant with the given name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant.name == name)
    }
}
