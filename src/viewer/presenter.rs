//! Carries session effects out to the UI and the render queue

use std::rc::Rc;

use super::document::Document;
use super::queue::RenderQueue;
use super::renderer::PageRenderTarget;
use super::state::{Effect, SessionState};
use super::types::ViewerUi;

pub struct Presenter<D> {
    ui: Rc<dyn ViewerUi>,
    queue: RenderQueue<PageRenderTarget<D>>,
}

impl<D> Clone for Presenter<D> {
    fn clone(&self) -> Self {
        Self {
            ui: Rc::clone(&self.ui),
            queue: self.queue.clone(),
        }
    }
}

impl<D: Document + 'static> Presenter<D> {
    #[must_use]
    pub fn new(ui: Rc<dyn ViewerUi>, queue: RenderQueue<PageRenderTarget<D>>) -> Self {
        Self { ui, queue }
    }

    pub fn execute(&self, state: &SessionState, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UpdateIndicator => self.ui.page_indicator_changed(&state.indicator()),
                Effect::UpdateControls => self.ui.controls_changed(state.controls()),
                Effect::RenderPage(page) => self.queue.request_page(page),
            }
        }
    }

    #[must_use]
    pub fn queue(&self) -> &RenderQueue<PageRenderTarget<D>> {
        &self.queue
    }
}
