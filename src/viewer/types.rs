//! Core types for page viewing

use std::cell::Cell;

use super::surface::RasterSurface;

/// Intrinsic (unscaled) page size in density-independent units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Geometry a page is drawn at.
///
/// `width`/`height` are the displayed box in density-independent pixels,
/// `output_width`/`output_height` the backing buffer in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Scale from intrinsic page units to density-independent pixels
    pub scale: f32,
    pub width: f32,
    pub height: f32,
    pub output_width: u32,
    pub output_height: u32,
    /// Device pixels per density-independent pixel
    pub pixel_density: f32,
}

/// Measurement of the element hosting the surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerMetrics {
    /// Content width in density-independent pixels
    pub content_width: f32,
    /// Display pixel density (device pixels per density-independent pixel)
    pub pixel_density: f32,
}

impl ContainerMetrics {
    #[must_use]
    pub const fn new(content_width: f32, pixel_density: f32) -> Self {
        Self {
            content_width,
            pixel_density,
        }
    }
}

impl Default for ContainerMetrics {
    fn default() -> Self {
        Self::new(600.0, 1.0)
    }
}

/// Provides the current container measurement
pub trait Container {
    fn metrics(&self) -> ContainerMetrics;
}

/// Container whose measurement is updated by the host on resize
#[derive(Debug, Default)]
pub struct MeasuredContainer {
    metrics: Cell<ContainerMetrics>,
}

impl MeasuredContainer {
    #[must_use]
    pub fn new(metrics: ContainerMetrics) -> Self {
        Self {
            metrics: Cell::new(metrics),
        }
    }

    pub fn set(&self, metrics: ContainerMetrics) {
        self.metrics.set(metrics);
    }
}

impl Container for MeasuredContainer {
    fn metrics(&self) -> ContainerMetrics {
        self.metrics.get()
    }
}

/// Enablement of the previous/next page controls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavControls {
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

/// Receives viewer output: page indicator text, control enablement and drawn pages
pub trait ViewerUi {
    fn page_indicator_changed(&self, text: &str);

    fn controls_changed(&self, controls: NavControls);

    /// Called after a page finished drawing into the surface
    fn page_rendered(&self, _page: usize, _surface: &RasterSurface) {}
}

/// Lifecycle of the viewer for the active document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerPhase {
    Unloaded,
    Loading,
    Ready {
        current_page: usize,
        total_pages: usize,
    },
}
