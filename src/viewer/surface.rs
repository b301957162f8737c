//! Raster surface pages are drawn into

use image::RgbImage;

const CHANNELS: usize = 3;
const PAPER: [u8; CHANNELS] = [0xFF, 0xFF, 0xFF];

/// Largest width or height, in device pixels, a surface buffer is allocated at
pub const MAX_SURFACE_DIMENSION: u32 = 4096;

/// Row layout of an external pixel buffer copied into a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleLayout {
    pub width_px: u32,
    pub height_px: u32,
    /// Bytes from the start of one row to the next
    pub stride: usize,
    /// Bytes per pixel; the first three are taken as RGB
    pub channels: usize,
}

impl SampleLayout {
    #[must_use]
    pub fn packed_rgb(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            stride: width_px as usize * CHANNELS,
            channels: CHANNELS,
        }
    }
}

/// Backing pixel buffer plus the box it is displayed in.
///
/// The buffer is allocated in device pixels while the display size is kept in
/// density-independent pixels, so a page stays sharp on high density displays
/// without changing its on-screen size. Drawing through [`fill_rect`] is in
/// density-independent units and goes through the current transform.
///
/// [`fill_rect`]: RasterSurface::fill_rect
#[derive(Clone, Debug)]
pub struct RasterSurface {
    /// Raw RGB pixel data (3 bytes per pixel: R, G, B)
    pixels: Vec<u8>,
    width_px: u32,
    height_px: u32,
    display_width: f32,
    display_height: f32,
    transform: f32,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self {
            pixels: Vec::new(),
            width_px: 0,
            height_px: 0,
            display_width: 0.0,
            display_height: 0.0,
            transform: 1.0,
        }
    }
}

impl RasterSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate the backing buffer, discarding previous content.
    ///
    /// Each dimension is capped at [`MAX_SURFACE_DIMENSION`].
    pub fn reallocate(&mut self, width_px: u32, height_px: u32) {
        self.width_px = width_px.min(MAX_SURFACE_DIMENSION);
        self.height_px = height_px.min(MAX_SURFACE_DIMENSION);
        self.pixels = vec![0; self.width_px as usize * self.height_px as usize * CHANNELS];
    }

    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display_width = width;
        self.display_height = height;
    }

    /// Uniform scale applied to density-independent drawing coordinates
    pub fn set_transform(&mut self, scale: f32) {
        self.transform = scale;
    }

    /// Reset the whole buffer to paper white
    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&PAPER);
        }
    }

    /// Fill a rectangle given in density-independent units.
    ///
    /// Negative extents grow the rectangle left/up from `x`/`y`.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, rgb: [u8; 3]) {
        let t = self.transform;
        let (left, right) = ordered(x * t, (x + width) * t);
        let (top, bottom) = ordered(y * t, (y + height) * t);
        let x0 = clamp_px(left, self.width_px);
        let y0 = clamp_px(top, self.height_px);
        let x1 = clamp_px(right, self.width_px);
        let y1 = clamp_px(bottom, self.height_px);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let stride = self.width_px as usize * CHANNELS;
        for row in y0..y1 {
            let start = row * stride + x0 * CHANNELS;
            let end = row * stride + x1 * CHANNELS;
            for px in self.pixels[start..end].chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&rgb);
            }
        }
    }

    /// Copy external pixel rows into the buffer at the origin, clipping to its bounds.
    ///
    /// Rows missing from `samples` and layouts with fewer than three channels
    /// are skipped.
    pub fn blit(&mut self, samples: &[u8], layout: SampleLayout) {
        if layout.channels < CHANNELS {
            return;
        }
        let columns = layout.width_px.min(self.width_px) as usize;
        let rows = layout.height_px.min(self.height_px) as usize;
        let dst_stride = self.width_px as usize * CHANNELS;
        let src_row_bytes = columns * layout.channels;

        for y in 0..rows {
            let src_start = y * layout.stride;
            let Some(src) = samples.get(src_start..src_start + src_row_bytes) else {
                break;
            };
            let dst = &mut self.pixels[y * dst_stride..y * dst_stride + columns * CHANNELS];
            if layout.channels == CHANNELS {
                dst.copy_from_slice(src);
            } else {
                for (out, px) in dst
                    .chunks_exact_mut(CHANNELS)
                    .zip(src.chunks_exact(layout.channels))
                {
                    out.copy_from_slice(&px[..CHANNELS]);
                }
            }
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width_px || y >= self.height_px {
            return None;
        }
        let offset = (y as usize * self.width_px as usize + x as usize) * CHANNELS;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }

    #[must_use]
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    #[must_use]
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    #[must_use]
    pub fn display_size(&self) -> (f32, f32) {
        (self.display_width, self.display_height)
    }

    #[must_use]
    pub fn transform(&self) -> f32 {
        self.transform
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy the buffer into an image for export
    #[must_use]
    pub fn to_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width_px, self.height_px, self.pixels.clone())
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if b < a { (b, a) } else { (a, b) }
}

fn clamp_px(value: f32, limit: u32) -> usize {
    value.round().clamp(0.0, limit as f32) as usize
}
