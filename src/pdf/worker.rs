//! Dedicated MuPDF thread owning one open document
//!
//! MuPDF documents are opened, measured and rasterized on the worker thread
//! only. The viewer side talks to it through [`WorkerRequest`]s and awaits the
//! oneshot replies, so a page draw suspends the render task instead of
//! blocking the local executor.

use std::io;
use std::thread;

use flume::Receiver;
use log::debug;
use mupdf::{Colorspace, Document, Matrix};
use tokio::sync::oneshot;

use crate::viewer::{LoadError, PageSize, RenderError, SampleLayout};

pub(super) type Reply<T> = oneshot::Sender<Result<T, RenderError>>;

pub(super) enum WorkerRequest {
    /// Measure a page (1-based)
    PageSize { page: usize, reply: Reply<PageSize> },
    /// Rasterize a page (1-based) at `mag` device pixels per page unit
    Rasterize {
        page: usize,
        mag: f32,
        reply: Reply<PageRaster>,
    },
}

/// Pixmap samples handed back from the worker
pub(super) struct PageRaster {
    pub samples: Vec<u8>,
    pub layout: SampleLayout,
}

/// Start a worker for `path`. The page count, or the open error, is sent on `opened`.
///
/// The worker exits once every sender for `requests` is dropped.
pub(super) fn spawn_document_worker(
    path: String,
    opened: oneshot::Sender<Result<usize, LoadError>>,
    requests: Receiver<WorkerRequest>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("pageturn-mupdf".to_string())
        .spawn(move || document_worker(&path, opened, requests))
        .map(|_| ())
}

fn document_worker(
    path: &str,
    opened: oneshot::Sender<Result<usize, LoadError>>,
    requests: Receiver<WorkerRequest>,
) {
    let doc = match open_document(path) {
        Ok((doc, page_count)) => {
            if opened.send(Ok(page_count)).is_err() {
                return;
            }
            doc
        }
        Err(e) => {
            let _ = opened.send(Err(e));
            return;
        }
    };

    for request in requests {
        match request {
            WorkerRequest::PageSize { page, reply } => {
                let _ = reply.send(page_size(&doc, page));
            }
            WorkerRequest::Rasterize { page, mag, reply } => {
                let _ = reply.send(rasterize(&doc, page, mag));
            }
        }
    }

    debug!("Document worker for {path} finished");
}

fn open_document(path: &str) -> Result<(Document, usize), LoadError> {
    let doc = Document::open(path).map_err(|e| LoadError::open(path, e))?;
    let page_count = doc.page_count().map_err(|e| LoadError::open(path, e))?;
    Ok((doc, page_count.max(0) as usize))
}

fn page_size(doc: &Document, page: usize) -> Result<PageSize, RenderError> {
    let bounds = doc.load_page(page_index(page))?.bounds()?;
    Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
}

fn rasterize(doc: &Document, page: usize, mag: f32) -> Result<PageRaster, RenderError> {
    let page = doc.load_page(page_index(page))?;
    let rgb = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&Matrix::new_scale(mag, mag), &rgb, false, false)?;

    let channels = pixmap.n() as usize;
    if channels < 3 {
        return Err(RenderError::generic(format!(
            "Unsupported pixmap format: {channels} channels"
        )));
    }

    Ok(PageRaster {
        layout: SampleLayout {
            width_px: pixmap.width(),
            height_px: pixmap.height(),
            stride: pixmap.stride() as usize,
            channels,
        },
        samples: pixmap.samples().to_vec(),
    })
}

fn page_index(page: usize) -> i32 {
    page.saturating_sub(1) as i32
}
