//! Page renderer - draws one page into the raster surface

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use super::document::{Document, Page};
use super::error::RenderError;
use super::queue::RenderTarget;
use super::session::DocumentSlot;
use super::sizing::ViewportSizing;
use super::surface::RasterSurface;
use super::types::{Container, Viewport, ViewerUi};

/// Prepare the surface for `viewport` and draw `page` into it.
///
/// The buffer is reallocated at device resolution, the transform is set to the
/// pixel density, and the buffer is cleared before the page's draw commands run.
pub async fn render_page<P: Page>(
    page: &P,
    viewport: &Viewport,
    surface: &mut RasterSurface,
) -> Result<(), RenderError> {
    surface.reallocate(viewport.output_width, viewport.output_height);
    surface.set_display_size(viewport.width, viewport.height);
    surface.set_transform(viewport.pixel_density);
    surface.clear();

    page.render(surface, viewport).await
}

/// Renders pages of whichever document is current into a single surface
pub struct PageRenderTarget<D> {
    document: DocumentSlot<D>,
    surface: RefCell<RasterSurface>,
    container: Rc<dyn Container>,
    sizing: ViewportSizing,
    ui: Rc<dyn ViewerUi>,
    last_rendered: Cell<Option<usize>>,
}

impl<D: Document> PageRenderTarget<D> {
    #[must_use]
    pub fn new(
        document: DocumentSlot<D>,
        container: Rc<dyn Container>,
        sizing: ViewportSizing,
        ui: Rc<dyn ViewerUi>,
    ) -> Self {
        Self {
            document,
            surface: RefCell::new(RasterSurface::new()),
            container,
            sizing,
            ui,
            last_rendered: Cell::new(None),
        }
    }

    /// Page most recently drawn successfully
    #[must_use]
    pub fn last_rendered(&self) -> Option<usize> {
        self.last_rendered.get()
    }

    /// Run `f` against the surface as it was after the last completed render
    pub fn with_surface<R>(&self, f: impl FnOnce(&RasterSurface) -> R) -> R {
        f(&self.surface.borrow())
    }
}

impl<D: Document> RenderTarget for PageRenderTarget<D> {
    async fn render_page(&self, number: usize) -> Result<(), RenderError> {
        let Some(document) = self.document.borrow().clone() else {
            debug!("No document loaded, skipping render of page {number}");
            return Ok(());
        };

        let page_count = document.page_count();
        if number == 0 || number > page_count {
            return Err(RenderError::PageOutOfRange {
                page: number,
                page_count,
            });
        }

        let page = document.page(number).await?;
        let metrics = self.container.metrics();
        let viewport =
            self.sizing
                .compute(page.intrinsic_size(), metrics.content_width, metrics.pixel_density);

        // Only one render is ever in flight, so the surface is moved out for
        // the duration of the draw and put back afterwards.
        let mut surface = self.surface.take();
        let result = render_page(&page, &viewport, &mut surface).await;
        self.surface.replace(surface);
        result?;

        debug!(
            "Rendered page {number} at scale {:.3} ({}x{} px)",
            viewport.scale, viewport.output_width, viewport.output_height
        );
        self.last_rendered.set(Some(number));
        self.ui.page_rendered(number, &self.surface.borrow());
        Ok(())
    }
}
