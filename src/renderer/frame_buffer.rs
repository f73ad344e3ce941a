use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// RGBA frame buffer for preview frames
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            pixels: vec![0; size],
        }
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| ((y * self.width + x) * 4) as usize)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(pixel)
    }

    /// Source-over blend; out-of-bounds writes are dropped
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }
        let Some(idx) = self.index(x as u32, y as u32) else {
            return;
        };
        let alpha = color[3] as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        for c in 0..3 {
            let bg = self.pixels[idx + c] as f32;
            self.pixels[idx + c] = (color[c] as f32 * alpha + bg * inv_alpha) as u8;
        }
        self.pixels[idx + 3] = 255;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Save as binary PPM, dropping alpha
    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create frame file: {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);

        writeln!(writer, "P6")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for chunk in self.pixels.chunks_exact(4) {
            writer.write_all(&chunk[0..3])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_frame_buffer_creation() {
        let fb = FrameBuffer::new(320, 180);
        assert_eq!(fb.dimensions(), (320, 180));
        assert_eq!(fb.as_bytes().len(), 320 * 180 * 4);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear([255, 0, 0, 255]);
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(9, 9), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(10, 0), None);
    }

    #[test]
    fn test_alpha_blending() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear([255, 255, 255, 255]);
        fb.blend_pixel(5, 5, [255, 0, 0, 128]);

        let pixel = fb.get_pixel(5, 5).unwrap();
        assert_eq!(pixel[0], 255);
        assert!(pixel[1] > 120 && pixel[1] < 135);
        assert!(pixel[2] > 120 && pixel[2] < 135);
    }

    #[test]
    fn test_blend_out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.blend_pixel(-1, 2, [255, 255, 255, 255]);
        fb.blend_pixel(2, 40, [255, 255, 255, 255]);
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_save_ppm_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.ppm");
        let fb = FrameBuffer::new(3, 2);
        fb.save_ppm(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(bytes.len(), "P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }
}
