//! Document session - owns the loaded document and its page counters

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use super::document::{Document, DocumentSource};
use super::error::LoadError;
use super::presenter::Presenter;
use super::state::{Effect, SessionState};
use super::types::ViewerPhase;

/// Slot holding the current document, shared with the render target
pub type DocumentSlot<D> = Rc<RefCell<Option<Rc<D>>>>;

/// Page counters of the loaded document, `None` until the first load commits
pub type SharedState = Rc<RefCell<Option<SessionState>>>;

/// Result of a load that did not fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document replaced the previous one
    Committed { page_count: usize },
    /// A newer load was issued while this one was outstanding
    Superseded,
}

/// Loads documents and commits them all-or-nothing.
///
/// Loads may overlap. Each load takes a generation number when issued and
/// only the most recently issued load is allowed to commit.
pub struct DocumentSession<S: DocumentSource> {
    source: Option<S>,
    document: DocumentSlot<S::Document>,
    state: SharedState,
    presenter: Presenter<S::Document>,
    generation: Cell<u64>,
    loads_in_flight: Rc<Cell<usize>>,
}

impl<S> DocumentSession<S>
where
    S: DocumentSource,
    S::Document: 'static,
{
    /// `source` is `None` when no decoder is available; every load then fails
    #[must_use]
    pub fn new(
        source: Option<S>,
        document: DocumentSlot<S::Document>,
        state: SharedState,
        presenter: Presenter<S::Document>,
    ) -> Self {
        Self {
            source,
            document,
            state,
            presenter,
            generation: Cell::new(0),
            loads_in_flight: Rc::new(Cell::new(0)),
        }
    }

    #[must_use]
    pub fn has_decoder(&self) -> bool {
        self.source.is_some()
    }

    #[must_use]
    pub fn state(&self) -> Option<SessionState> {
        *self.state.borrow()
    }

    #[must_use]
    pub fn document(&self) -> Option<Rc<S::Document>> {
        self.document.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> ViewerPhase {
        if self.loads_in_flight.get() > 0 {
            return ViewerPhase::Loading;
        }
        match self.state() {
            Some(state) => ViewerPhase::Ready {
                current_page: state.current_page(),
                total_pages: state.total_pages(),
            },
            None => ViewerPhase::Unloaded,
        }
    }

    /// Open `path` and, if still the newest load, make it the current document.
    ///
    /// On success the session moves to page 1, publishes indicator and control
    /// state and queues page 1 for rendering. On failure nothing changes.
    pub async fn load(&self, path: &str) -> Result<LoadOutcome, LoadError> {
        let Some(source) = &self.source else {
            return Err(LoadError::DecoderUnavailable);
        };

        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let _in_flight = LoadInFlight::enter(&self.loads_in_flight);

        info!("Loading document {path}");
        let opened = source.open(path).await;

        if generation != self.generation.get() {
            match &opened {
                Ok(_) => debug!("Discarding load of {path}: superseded by a newer load"),
                Err(e) => debug!("Ignoring failed load of {path} ({e}): superseded by a newer load"),
            }
            return Ok(LoadOutcome::Superseded);
        }

        let document = opened?;
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(LoadError::Empty {
                path: path.to_string(),
            });
        }

        *self.document.borrow_mut() = Some(Rc::new(document));
        let state = SessionState::loaded(page_count);
        *self.state.borrow_mut() = Some(state);
        info!("Loaded {path} ({page_count} pages)");

        self.presenter.execute(
            &state,
            vec![
                Effect::UpdateIndicator,
                Effect::UpdateControls,
                Effect::RenderPage(state.current_page()),
            ],
        );

        Ok(LoadOutcome::Committed { page_count })
    }
}

struct LoadInFlight {
    count: Rc<Cell<usize>>,
}

impl LoadInFlight {
    fn enter(count: &Rc<Cell<usize>>) -> Self {
        count.set(count.get() + 1);
        Self {
            count: Rc::clone(count),
        }
    }
}

impl Drop for LoadInFlight {
    fn drop(&mut self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}
