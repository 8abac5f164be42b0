use glam::Vec4;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("{width}x{height} image needs {expected} values, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// An immutable RGBA image with normalized float channels, stored row-major
/// with the first row at `v = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Image {
    /// Caller guarantees `pixels.len() == width * height`.
    pub(crate) fn from_pixels(width: u32, height: u32, pixels: Vec<Vec4>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Vec4) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::from_pixels(width, height, pixels)
    }

    /// Decode tightly packed 8-bit RGBA (`v / 255`).
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0)
            .collect();
        Ok(Self::from_pixels(width, height, pixels))
    }

    /// Encode to tightly packed 8-bit RGBA, rounding to nearest.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| {
                let q = (p.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
                [q.x as u8, q.y as u8, q.z as u8, q.w as u8]
            })
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Texel at integer coordinates. Panics when out of bounds.
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        assert!(x < self.width && y < self.height, "texel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_rejects_wrong_length() {
        let err = Image::from_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert_eq!(
            err,
            ImageError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn rgba8_bytes_survive_decode_encode() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let image = Image::from_rgba8(8, 8, &bytes).unwrap();
        assert_eq!(image.to_rgba8(), bytes);
    }

    #[test]
    fn from_rgba8_normalizes() {
        let image = Image::from_rgba8(1, 1, &[255, 0, 51, 255]).unwrap();
        assert_eq!(image.texel(0, 0), Vec4::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn to_rgba8_clamps_out_of_range() {
        let image = Image::from_pixels(1, 1, vec![Vec4::new(-0.5, 2.0, 0.5, 1.0)]);
        assert_eq!(image.to_rgba8(), vec![0, 255, 128, 255]);
    }

    #[test]
    fn from_fn_is_row_major() {
        let image = Image::from_fn(3, 2, |x, y| Vec4::new(x as f32, y as f32, 0.0, 1.0));
        assert_eq!(image.texel(2, 0), Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert_eq!(image.texel(0, 1), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(image.pixels()[3], image.texel(0, 1));
    }

    #[test]
    #[should_panic]
    fn texel_out_of_bounds_panics() {
        Image::from_fn(2, 2, |_, _| Vec4::ZERO).texel(2, 0);
    }
}
