//! Hexagonal tiling of a point set's covering area.
//!
//! The covering area is the convex hull of the input points expanded by a
//! fixed margin, so cells touching the hull boundary still contain the
//! edge points. Tiling uses coverage containment: every cell intersecting
//! the buffered polygon is emitted, which keeps the grid non-empty even at
//! resolutions where no cell centroid falls inside the polygon.

use geo::{Coord, ConvexHull, MultiPoint, Point, Polygon};
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{CellIndex, LatLng, Resolution};

use crate::error::{MobilityError, Result};
use crate::models::{HexCell, HexGrid};

/// Fixed hull expansion, ~1.1 km at the equator.
pub const HULL_MARGIN_DEGREES: f64 = 0.01;

/// Vertices of the disc approximation used for the hull buffer.
const DISC_VERTICES: usize = 32;

/// Tile the covering area of `points` with H3 cells at `resolution`.
///
/// Fails with [`MobilityError::EmptyPointSet`] for an empty slice and
/// [`MobilityError::InvalidResolution`] for a resolution above 15; no
/// partial grid is ever returned. Cells come back de-duplicated and
/// sorted by identifier, so repeated runs on identical input produce a
/// byte-identical ordering.
pub fn generate_hex_grid(points: &[Point<f64>], resolution: u8) -> Result<HexGrid> {
    if points.is_empty() {
        return Err(MobilityError::EmptyPointSet);
    }
    let h3_resolution =
        Resolution::try_from(resolution).map_err(|_| MobilityError::InvalidResolution(resolution))?;

    let hull = MultiPoint::from(points.to_vec()).convex_hull();
    let covering = expand_hull(&hull, points, HULL_MARGIN_DEGREES);

    let mut tiler = TilerBuilder::new(h3_resolution)
        .containment_mode(ContainmentMode::Covers)
        .build();
    tiler
        .add(covering)
        .map_err(|err| MobilityError::Geometry(err.to_string()))?;

    let mut ids: Vec<CellIndex> = tiler.into_coverage().collect();
    ids.sort_unstable();
    ids.dedup();

    let cells: Vec<HexCell> = ids.into_iter().map(hex_cell).collect();
    log::debug!(
        "tiled {} points into {} cells at resolution {}",
        points.len(),
        cells.len(),
        resolution
    );

    Ok(HexGrid { resolution, cells })
}

fn hex_cell(id: CellIndex) -> HexCell {
    let center = LatLng::from(id);
    let boundary: Vec<Coord<f64>> = id
        .boundary()
        .iter()
        .map(|vertex| Coord {
            x: vertex.lng(),
            y: vertex.lat(),
        })
        .collect();
    HexCell {
        id,
        center: Point::new(center.lng(), center.lat()),
        boundary,
    }
}

/// Minkowski sum of the hull with a small disc, the disc approximated by
/// a regular polygon: circle points are generated around every hull
/// vertex and re-hulled. Exact for convex input. Degenerate hulls (one
/// point, collinear sets) fall back to the raw points, which the circle
/// expansion turns into a proper polygon anyway.
fn expand_hull(hull: &Polygon<f64>, points: &[Point<f64>], margin: f64) -> Polygon<f64> {
    let seeds: Vec<Coord<f64>> = if hull.exterior().0.len() >= 4 {
        hull.exterior().0.clone()
    } else {
        points.iter().map(|p| p.0).collect()
    };

    // The inscribed polygon undershoots the disc radius by cos(pi/n);
    // compensate so the full margin is always cleared.
    let radius = margin / (std::f64::consts::PI / DISC_VERTICES as f64).cos();

    let mut disc_points = Vec::with_capacity(seeds.len() * DISC_VERTICES);
    for seed in &seeds {
        for step in 0..DISC_VERTICES {
            let angle = std::f64::consts::TAU * step as f64 / DISC_VERTICES as f64;
            disc_points.push(Point::new(
                seed.x + radius * angle.cos(),
                seed.y + radius * angle.sin(),
            ));
        }
    }
    MultiPoint::from(disc_points).convex_hull()
}
