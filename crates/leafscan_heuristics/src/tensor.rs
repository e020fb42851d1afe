use image::imageops::FilterType;
use leafscan_core::{Error, Result};

/// Side length every input image is resized to before analysis/inference.
pub const INPUT_SIZE: u32 = 224;

/// A decoded image, resized to `INPUT_SIZE` squared and normalized to
/// `[0, 1]` RGB floats. Built per request, dropped with the response.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    pixels: Vec<[f32; 3]>,
    source_width: u32,
    source_height: u32,
}

impl ImageTensor {
    /// Decode raw upload bytes. Any decode failure surfaces as an error;
    /// this is the one upload problem the pipeline does not paper over.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| Error::Image(e.to_string()))?;
        let (source_width, source_height) = (img.width(), img.height());
        let resized = img
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
            .to_rgb8();
        let pixels = resized
            .pixels()
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                ]
            })
            .collect();
        Ok(Self {
            pixels,
            source_width,
            source_height,
        })
    }

    /// Build a tensor from already-normalized pixels (tests and tooling).
    /// `pixels` must hold `INPUT_SIZE * INPUT_SIZE` entries.
    pub fn from_normalized_pixels(
        pixels: Vec<[f32; 3]>,
        source_width: u32,
        source_height: u32,
    ) -> Self {
        debug_assert_eq!(pixels.len(), (INPUT_SIZE * INPUT_SIZE) as usize);
        Self {
            pixels,
            source_width,
            source_height,
        }
    }

    pub fn pixels(&self) -> &[[f32; 3]] {
        &self.pixels
    }

    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    pub fn source_height(&self) -> u32 {
        self.source_height
    }

    /// Width/height ratio of the image as uploaded, before resizing.
    pub fn aspect_ratio(&self) -> f32 {
        self.source_width as f32 / self.source_height as f32
    }
}
