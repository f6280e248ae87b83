use itertools::iproduct;

use crate::geometry::{InvalidShapeError, Shape2D};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub row_start: usize,
    pub col_start: usize,
    pub output_index: usize,
}

impl Tile {
    /// Linear indices of the target units covered by this tile, row-major over
    /// the feature window so they line up with the flattened weight matrix.
    pub fn source_indices(
        &self,
        feature: Shape2D,
        target: Shape2D,
    ) -> impl Iterator<Item = usize> + Clone {
        let rows = self.row_start..self.row_start + feature.rows();
        let cols = self.col_start..self.col_start + feature.cols();
        iproduct!(rows, cols).map(move |(row, col)| target.linear_index(row, col))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    feature: Shape2D,
    target: Shape2D,
    row_offsets: Vec<usize>,
    col_offsets: Vec<usize>,
    output_shape: Shape2D,
}

impl TileGrid {
    pub fn new(
        feature: Shape2D,
        target: Shape2D,
        delta_row: usize,
        delta_col: usize,
    ) -> Result<Self, InvalidShapeError> {
        if delta_row == 0 || delta_col == 0 {
            return Err(InvalidShapeError::ZeroStride {
                delta_row,
                delta_col,
            });
        }

        if !feature.fits_inside(&target) {
            return Err(InvalidShapeError::FeatureExceedsTarget { feature, target });
        }

        let row_offsets = sweep_offsets(target.rows(), feature.rows(), delta_row);
        let col_offsets = sweep_offsets(target.cols(), feature.cols(), delta_col);
        let output_shape = Shape2D::new(row_offsets.len(), col_offsets.len())?;

        Ok(Self {
            feature,
            target,
            row_offsets,
            col_offsets,
            output_shape,
        })
    }

    pub fn feature(&self) -> Shape2D {
        self.feature
    }

    pub fn target(&self) -> Shape2D {
        self.target
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    pub fn col_offsets(&self) -> &[usize] {
        &self.col_offsets
    }

    pub fn num_tiles(&self) -> usize {
        self.output_shape.area()
    }

    pub fn output_shape(&self) -> Shape2D {
        self.output_shape
    }

    pub fn tile_at(&self, output_index: usize) -> Option<Tile> {
        if output_index >= self.num_tiles() {
            return None;
        }

        let num_cols = self.col_offsets.len();

        Some(Tile {
            row_start: self.row_offsets[output_index / num_cols],
            col_start: self.col_offsets[output_index % num_cols],
            output_index,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.num_tiles()).filter_map(|output_index| self.tile_at(output_index))
    }

    pub fn into_tiles(self) -> Tiles {
        Tiles {
            grid: self,
            next_output_index: 0,
        }
    }
}

// regular sweep, plus one offset flush with the far edge if the stride misses it
fn sweep_offsets(target_len: usize, feature_len: usize, delta: usize) -> Vec<usize> {
    let span = target_len - feature_len;
    let mut offsets: Vec<usize> = (0..=span).step_by(delta).collect();

    if span % delta != 0 {
        offsets.push(span);
    }

    offsets
}

#[derive(Debug, Clone)]
pub struct Tiles {
    grid: TileGrid,
    next_output_index: usize,
}

impl Tiles {
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        let tile = self.grid.tile_at(self.next_output_index)?;
        self.next_output_index += 1;
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.num_tiles() - self.next_output_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles {}

pub fn tile(
    feature: Shape2D,
    target: Shape2D,
    delta_row: usize,
    delta_col: usize,
) -> Result<Tiles, InvalidShapeError> {
    Ok(TileGrid::new(feature, target, delta_row, delta_col)?.into_tiles())
}
