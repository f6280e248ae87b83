use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidShapeError {
    EmptyDimension { rows: usize, cols: usize },
    AreaOverflow { rows: usize, cols: usize },
    FeatureExceedsTarget { feature: Shape2D, target: Shape2D },
    ZeroStride { delta_row: usize, delta_col: usize },
}

impl fmt::Display for InvalidShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidShapeError::EmptyDimension { rows, cols } => {
                write!(f, "shape dimensions must be strictly positive, got {}x{}", rows, cols)
            }
            InvalidShapeError::AreaOverflow { rows, cols } => {
                write!(f, "shape {}x{} has more cells than can be indexed", rows, cols)
            }
            InvalidShapeError::FeatureExceedsTarget { feature, target } => write!(
                f,
                "feature shape {} does not fit inside target shape {}",
                feature, target
            ),
            InvalidShapeError::ZeroStride {
                delta_row,
                delta_col,
            } => write!(
                f,
                "strides must be strictly positive, got delta_row={} delta_col={}",
                delta_row, delta_col
            ),
        }
    }
}

impl Error for InvalidShapeError {}

// both extents strictly positive, area fits in usize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct Shape2D {
    rows: usize,
    cols: usize,
}

impl Shape2D {
    pub fn new(rows: usize, cols: usize) -> Result<Self, InvalidShapeError> {
        if rows == 0 || cols == 0 {
            return Err(InvalidShapeError::EmptyDimension { rows, cols });
        }

        if rows.checked_mul(cols).is_none() {
            return Err(InvalidShapeError::AreaOverflow { rows, cols });
        }

        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    pub fn fits_inside(&self, other: &Shape2D) -> bool {
        self.rows <= other.rows && self.cols <= other.cols
    }

    pub fn linear_index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }
}

impl fmt::Display for Shape2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl TryFrom<[usize; 2]> for Shape2D {
    type Error = InvalidShapeError;

    fn try_from([rows, cols]: [usize; 2]) -> Result<Self, Self::Error> {
        Shape2D::new(rows, cols)
    }
}

impl From<Shape2D> for [usize; 2] {
    fn from(shape: Shape2D) -> Self {
        [shape.rows, shape.cols]
    }
}
