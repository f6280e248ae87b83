use simple_error::{SimpleError, SimpleResult};

use crate::geometry::Shape2D;

pub const DEFAULT_SCALES: [f64; 5] = [1.0, 0.71, 0.5, 0.35, 0.25];

pub fn scaled_shape(shape: Shape2D, scale: f64) -> SimpleResult<Shape2D> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(SimpleError::new(format!(
            "scale must be strictly positive and finite, got {}",
            scale
        )));
    }

    // half pixels round to even, matching the image resampler
    let rows = (shape.rows() as f64 * scale).round_ties_even() as usize;
    let cols = (shape.cols() as f64 * scale).round_ties_even() as usize;

    Shape2D::new(rows, cols).map_err(|err| {
        SimpleError::new(format!("scale {} collapses shape {}: {}", scale, shape, err))
    })
}

pub fn pyramid_shapes(shape: Shape2D, scales: &[f64]) -> SimpleResult<Vec<(f64, Shape2D)>> {
    scales
        .iter()
        .map(|scale| Ok((*scale, scaled_shape(shape, *scale)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scales_84() {
        let shape = Shape2D::new(84, 84).unwrap();
        let sizes: Vec<_> = pyramid_shapes(shape, &DEFAULT_SCALES)
            .unwrap()
            .into_iter()
            .map(|(_, shape)| shape.rows())
            .collect();

        assert_eq!(sizes, vec![84, 60, 42, 29, 21]);
    }

    #[test]
    fn non_square() {
        let shape = Shape2D::new(40, 100).unwrap();
        assert_eq!(
            scaled_shape(shape, 0.5).unwrap(),
            Shape2D::new(20, 50).unwrap()
        );
    }

    #[test]
    fn half_pixels_round_to_even() {
        let shape = Shape2D::new(85, 90).unwrap();
        assert_eq!(
            scaled_shape(shape, 0.5).unwrap(),
            Shape2D::new(42, 45).unwrap()
        );
        assert_eq!(
            scaled_shape(shape, 0.25).unwrap(),
            Shape2D::new(21, 22).unwrap()
        );
        assert_eq!(
            scaled_shape(Shape2D::new(87, 87).unwrap(), 0.5).unwrap(),
            Shape2D::new(44, 44).unwrap()
        );
    }

    #[test]
    fn collapsing_scale() {
        let shape = Shape2D::new(3, 3).unwrap();
        assert_eq!(
            scaled_shape(shape, 0.1).unwrap_err().as_str(),
            "scale 0.1 collapses shape 3x3: shape dimensions must be strictly positive, got 0x0"
        );
    }

    #[test]
    fn invalid_scale() {
        let shape = Shape2D::new(3, 3).unwrap();
        assert!(scaled_shape(shape, 0.0).is_err());
        assert!(scaled_shape(shape, -1.0).is_err());
        assert!(scaled_shape(shape, f64::NAN).is_err());
    }
}
