//! Document viewer - wires session, render queue and navigation together

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

use super::config::ViewerConfig;
use super::document::DocumentSource;
use super::navigation::NavigationController;
use super::presenter::Presenter;
use super::queue::RenderQueue;
use super::renderer::PageRenderTarget;
use super::session::{DocumentSession, SharedState};
use super::sources::SourceCatalog;
use super::types::{Container, NavControls, ViewerPhase, ViewerUi};

/// Embeddable single-page document viewer.
///
/// All methods must be called from inside a [`tokio::task::LocalSet`]; loads,
/// renders and the resize timer run as local tasks.
pub struct DocumentViewer<S: DocumentSource> {
    session: Rc<DocumentSession<S>>,
    navigation: NavigationController<S::Document>,
    queue: RenderQueue<PageRenderTarget<S::Document>>,
    catalog: SourceCatalog,
    active_source: RefCell<Option<String>>,
}

impl<S> DocumentViewer<S>
where
    S: DocumentSource + 'static,
    S::Document: 'static,
{
    /// Create a viewer. `source` is `None` when no document decoder is available.
    #[must_use]
    pub fn new(
        source: Option<S>,
        container: Rc<dyn Container>,
        ui: Rc<dyn ViewerUi>,
        config: ViewerConfig,
    ) -> Self {
        let document = Rc::new(RefCell::new(None));
        let state: SharedState = Rc::new(RefCell::new(None));

        let target = PageRenderTarget::new(
            Rc::clone(&document),
            container,
            config.sizing,
            Rc::clone(&ui),
        );
        let queue = RenderQueue::new(Rc::new(target));
        let presenter = Presenter::new(ui, queue.clone());

        let session = DocumentSession::new(source, document, Rc::clone(&state), presenter.clone());
        let navigation =
            NavigationController::new(Rc::clone(&state), presenter, config.resize_quiet_period);

        Self {
            session: Rc::new(session),
            navigation,
            queue,
            catalog: config.catalog,
            active_source: RefCell::new(None),
        }
    }

    /// Load the catalog's default document
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if !self.session.has_decoder() {
            warn!("No document decoder available, viewer stays unloaded");
            return None;
        }
        let key = self.catalog.default_key().to_string();
        self.set_source(&key)
    }

    /// Switch the active document by catalog key. Unknown keys are ignored.
    ///
    /// Returns the handle of the spawned load task.
    pub fn set_source(&self, key: &str) -> Option<JoinHandle<()>> {
        let Some(path) = self.catalog.resolve(key) else {
            debug!("Ignoring unknown document source {key:?}");
            return None;
        };
        *self.active_source.borrow_mut() = Some(key.to_string());

        if !self.session.has_decoder() {
            warn!("Cannot load {path}: no document decoder available");
            return None;
        }

        info!("Switching document source to {key:?}");
        let session = Rc::clone(&self.session);
        let path = path.to_string();
        Some(tokio::task::spawn_local(async move {
            if let Err(e) = session.load(&path).await {
                error!("Failed to load document: {e}");
            }
        }))
    }

    pub fn go_to_previous_page(&self) -> bool {
        self.navigation.go_to_previous_page()
    }

    pub fn go_to_next_page(&self) -> bool {
        self.navigation.go_to_next_page()
    }

    pub fn on_resize(&self) {
        self.navigation.on_resize();
    }

    #[must_use]
    pub fn phase(&self) -> ViewerPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn indicator(&self) -> Option<String> {
        self.session.state().map(|state| state.indicator())
    }

    #[must_use]
    pub fn controls(&self) -> Option<NavControls> {
        self.session.state().map(|state| state.controls())
    }

    #[must_use]
    pub fn active_source(&self) -> Option<String> {
        self.active_source.borrow().clone()
    }

    #[must_use]
    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn session(&self) -> &Rc<DocumentSession<S>> {
        &self.session
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationController<S::Document> {
        &self.navigation
    }

    #[must_use]
    pub fn queue(&self) -> &RenderQueue<PageRenderTarget<S::Document>> {
        &self.queue
    }
}
