//! Document decoding capabilities the viewer consumes

use std::future::Future;

use super::error::{LoadError, RenderError};
use super::surface::RasterSurface;
use super::types::{PageSize, Viewport};

/// Opens documents by source path
pub trait DocumentSource {
    type Document: Document;

    fn open(&self, path: &str) -> impl Future<Output = Result<Self::Document, LoadError>>;
}

/// A loaded, decoded multi-page document
pub trait Document {
    type Page: Page;

    fn page_count(&self) -> usize;

    /// Fetch a page by 1-based number
    fn page(&self, number: usize) -> impl Future<Output = Result<Self::Page, RenderError>>;
}

/// One decoded page
pub trait Page {
    fn intrinsic_size(&self) -> PageSize;

    /// Issue the page's draw commands into an already prepared surface
    fn render(
        &self,
        surface: &mut RasterSurface,
        viewport: &Viewport,
    ) -> impl Future<Output = Result<(), RenderError>>;
}
