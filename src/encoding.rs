use simple_error::{SimpleError, SimpleResult};

use crate::geometry::Shape2D;

// firing rate in Hz is pixel intensity / divisor
pub const INTENSITY_RATE_DIVISOR: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    shape: Shape2D,
    pixels: Vec<u8>,
}

impl GrayImage {
    pub fn new(shape: Shape2D, pixels: Vec<u8>) -> SimpleResult<Self> {
        if pixels.len() != shape.area() {
            return Err(SimpleError::new(format!(
                "image of shape {} needs {} pixels, got {}",
                shape,
                shape.area(),
                pixels.len()
            )));
        }

        Ok(Self { shape, pixels })
    }

    pub fn shape(&self) -> Shape2D {
        self.shape
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[self.shape.linear_index(row, col)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpikeSourceLayer {
    pub shape: Shape2D,
    pub rates: Vec<u32>,
}

impl SpikeSourceLayer {
    pub fn from_image(image: &GrayImage) -> Self {
        Self {
            shape: image.shape(),
            rates: image.pixels().iter().map(|p| pixel_rate(*p)).collect(),
        }
    }

    pub fn num_neurons(&self) -> usize {
        self.rates.len()
    }
}

pub fn pixel_rate(intensity: u8) -> u32 {
    (intensity / INTENSITY_RATE_DIVISOR) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates() {
        assert_eq!(pixel_rate(0), 0);
        assert_eq!(pixel_rate(3), 0);
        assert_eq!(pixel_rate(4), 1);
        assert_eq!(pixel_rate(255), 63);
        assert_eq!(pixel_rate(8), 8 / INTENSITY_RATE_DIVISOR as u32);
    }

    #[test]
    fn layer_from_image() {
        let shape = Shape2D::new(2, 3).unwrap();
        let image = GrayImage::new(shape, vec![0, 8, 16, 100, 200, 255]).unwrap();
        assert_eq!(image.pixel(1, 0), 100);

        let layer = SpikeSourceLayer::from_image(&image);
        assert_eq!(layer.num_neurons(), 6);
        assert_eq!(layer.rates, vec![0, 2, 4, 25, 50, 63]);
        assert_eq!(layer.shape, shape);
    }

    #[test]
    fn pixel_count_mismatch() {
        let shape = Shape2D::new(2, 2).unwrap();
        assert_eq!(
            GrayImage::new(shape, vec![0; 5]).unwrap_err().as_str(),
            "image of shape 2x2 needs 4 pixels, got 5"
        );
    }
}
