//! Hexagonal grid artifacts.

use geo::{Coord, Point};
use h3o::CellIndex;

/// One H3 cell: stable identifier, center, and boundary vertices.
///
/// The boundary is an open ring in (lon, lat) order, normally 6 vertices;
/// distortion cells of the grid may carry 5. Consumers close the ring when
/// they build a polygon from it.
#[derive(Clone, Debug, PartialEq)]
pub struct HexCell {
    pub id: CellIndex,
    pub center: Point<f64>,
    pub boundary: Vec<Coord<f64>>,
}

/// A hex tiling of some covering area, cells unique by identifier and
/// sorted by identifier so repeated builds emit byte-identical order.
#[derive(Clone, Debug, PartialEq)]
pub struct HexGrid {
    pub resolution: u8,
    pub cells: Vec<HexCell>,
}

impl HexGrid {
    /// Cell identifiers in canonical (sorted) order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells.iter().map(|cell| cell.id)
    }
}
