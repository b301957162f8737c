//! Single-slot coalescing render queue
//!
//! At most one render is in flight. Requests arriving while a render runs
//! overwrite a single pending slot, so a burst collapses to one follow-up
//! render of the newest page. The render loop runs as a local task and must
//! be driven inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use log::{debug, warn};
use tokio::sync::Notify;

use super::error::RenderError;

/// Something that can draw a page by number
pub trait RenderTarget {
    fn render_page(&self, page: usize) -> impl Future<Output = Result<(), RenderError>>;
}

#[derive(Debug, Default)]
struct QueueState {
    is_rendering: bool,
    /// Only set while `is_rendering`
    pending_page: Option<usize>,
}

/// Coalescing dispatcher in front of a [`RenderTarget`]
pub struct RenderQueue<T> {
    state: Rc<RefCell<QueueState>>,
    idle: Rc<Notify>,
    target: Rc<T>,
}

impl<T> Clone for RenderQueue<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            idle: Rc::clone(&self.idle),
            target: Rc::clone(&self.target),
        }
    }
}

impl<T> RenderQueue<T> {
    #[must_use]
    pub fn new(target: Rc<T>) -> Self {
        Self {
            state: Rc::new(RefCell::new(QueueState::default())),
            idle: Rc::new(Notify::new()),
            target,
        }
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.state.borrow().is_rendering
    }

    #[must_use]
    pub fn pending_page(&self) -> Option<usize> {
        self.state.borrow().pending_page
    }

    #[must_use]
    pub fn target(&self) -> &Rc<T> {
        &self.target
    }

    /// Resolves once no render is in flight
    pub async fn idle(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.is_rendering() {
                return;
            }
            notified.await;
        }
    }
}

impl<T: RenderTarget + 'static> RenderQueue<T> {
    /// Render `page` now if idle, otherwise make it the single pending request
    pub fn request_page(&self, page: usize) {
        {
            let mut state = self.state.borrow_mut();
            if state.is_rendering {
                if let Some(previous) = state.pending_page.replace(page) {
                    debug!("Pending render of page {previous} superseded by page {page}");
                }
                return;
            }
            state.is_rendering = true;
        }

        let in_flight = InFlight {
            state: Rc::clone(&self.state),
            idle: Rc::clone(&self.idle),
        };
        let target = Rc::clone(&self.target);
        tokio::task::spawn_local(render_loop(target, in_flight, page));
    }
}

async fn render_loop<T: RenderTarget>(target: Rc<T>, in_flight: InFlight, mut page: usize) {
    loop {
        debug!("Rendering page {page}");
        if let Err(e) = target.render_page(page).await {
            warn!("Failed to render page {page}: {e}");
        }

        match in_flight.take_pending() {
            Some(next) => page = next,
            None => break,
        }
    }
}

/// Owns the in-flight flag for the lifetime of one render loop.
///
/// Dropping it clears the flag, so a failed, aborted or panicking render can
/// never leave the queue stuck.
struct InFlight {
    state: Rc<RefCell<QueueState>>,
    idle: Rc<Notify>,
}

impl InFlight {
    fn take_pending(&self) -> Option<usize> {
        self.state.borrow_mut().pending_page.take()
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.is_rendering = false;
            state.pending_page = None;
        }
        self.idle.notify_waiters();
    }
}
