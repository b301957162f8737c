//! Viewport sizing for a page inside its container
//!
//! The page is fitted to the container width minus a fixed padding, never
//! narrower than a minimum width, and the backing buffer is sized in device
//! pixels for the display's pixel density. Device sizes are capped at
//! [`MAX_SURFACE_DIMENSION`].

use super::surface::MAX_SURFACE_DIMENSION;
use super::types::{PageSize, Viewport};

/// Padding kept between the page and the container edges
pub const DEFAULT_PADDING: f32 = 36.0;
/// Floor for the available width when the container collapses
pub const DEFAULT_MIN_WIDTH: f32 = 180.0;

/// Fixed sizing configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSizing {
    pub padding: f32,
    pub min_width: f32,
}

impl Default for ViewportSizing {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl ViewportSizing {
    /// Compute the viewport for a page at the given container width and density
    #[must_use]
    pub fn compute(&self, page: PageSize, container_width: f32, pixel_density: f32) -> Viewport {
        // A non-finite width is treated as a collapsed container.
        let container_width = if container_width.is_finite() {
            container_width
        } else {
            0.0
        };
        let available = (container_width - self.padding).max(self.min_width);
        let intrinsic_width = if page.width > 0.0 { page.width } else { 1.0 };
        let scale = available / intrinsic_width;

        let width = intrinsic_width * scale;
        let height = page.height.max(0.0) * scale;
        let density = effective_density(pixel_density);

        Viewport {
            scale,
            width,
            height,
            output_width: device_px(width * density),
            output_height: device_px(height * density),
            pixel_density: density,
        }
    }
}

/// Floor to whole device pixels; `as` saturates NaN and negatives to 0
fn device_px(value: f32) -> u32 {
    value.floor().min(MAX_SURFACE_DIMENSION as f32) as u32
}

fn effective_density(pixel_density: f32) -> f32 {
    if pixel_density.is_finite() && pixel_density > 0.0 {
        pixel_density
    } else {
        1.0
    }
}
