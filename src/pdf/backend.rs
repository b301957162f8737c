//! MuPDF implementation of the document capabilities

use flume::Sender;
use tokio::sync::oneshot;

use super::worker::{PageRaster, Reply, WorkerRequest, spawn_document_worker};
use crate::viewer::{
    Document, DocumentSource, LoadError, Page, PageSize, RasterSurface, RenderError, Viewport,
};

/// Opens PDF files from the local filesystem, one worker thread per document
#[derive(Clone, Copy, Debug, Default)]
pub struct MupdfSource;

impl DocumentSource for MupdfSource {
    type Document = MupdfDocument;

    async fn open(&self, path: &str) -> Result<MupdfDocument, LoadError> {
        let (requests, inbox) = flume::unbounded();
        let (opened, page_count) = oneshot::channel();
        spawn_document_worker(path.to_string(), opened, inbox)
            .map_err(|e| LoadError::open(path, e))?;

        let page_count = page_count
            .await
            .map_err(|_| LoadError::open(path, "document worker exited"))??;

        Ok(MupdfDocument {
            requests,
            page_count,
        })
    }
}

/// Handle to a document open on its worker thread
pub struct MupdfDocument {
    requests: Sender<WorkerRequest>,
    page_count: usize,
}

impl Document for MupdfDocument {
    type Page = MupdfPage;

    fn page_count(&self) -> usize {
        self.page_count
    }

    async fn page(&self, number: usize) -> Result<MupdfPage, RenderError> {
        if number == 0 || number > self.page_count {
            return Err(RenderError::PageOutOfRange {
                page: number,
                page_count: self.page_count,
            });
        }

        let size = call(&self.requests, |reply| WorkerRequest::PageSize {
            page: number,
            reply,
        })
        .await?;

        Ok(MupdfPage {
            requests: self.requests.clone(),
            number,
            size,
        })
    }
}

pub struct MupdfPage {
    requests: Sender<WorkerRequest>,
    number: usize,
    size: PageSize,
}

impl Page for MupdfPage {
    fn intrinsic_size(&self) -> PageSize {
        self.size
    }

    async fn render(
        &self,
        surface: &mut RasterSurface,
        viewport: &Viewport,
    ) -> Result<(), RenderError> {
        if surface.width_px() == 0 || surface.height_px() == 0 {
            return Ok(());
        }

        // MuPDF rasterizes in device space, so the surface transform is folded
        // into the page matrix; the pixmap never outgrows the surface buffer.
        let fit = (surface.width_px() as f32 / self.size.width.max(1.0))
            .min(surface.height_px() as f32 / self.size.height.max(1.0));
        let mag = (viewport.scale * surface.transform()).min(fit);

        let raster: PageRaster = call(&self.requests, |reply| WorkerRequest::Rasterize {
            page: self.number,
            mag,
            reply,
        })
        .await?;

        surface.blit(&raster.samples, raster.layout);
        Ok(())
    }
}

async fn call<T>(
    requests: &Sender<WorkerRequest>,
    request: impl FnOnce(Reply<T>) -> WorkerRequest,
) -> Result<T, RenderError> {
    let (reply, response) = oneshot::channel();
    requests
        .send(request(reply))
        .map_err(|_| RenderError::generic("document worker is gone"))?;
    response
        .await
        .map_err(|_| RenderError::generic("document worker dropped the request"))?
}
