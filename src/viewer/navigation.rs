//! Navigation controller - page turns and debounced resize re-renders

use std::rc::Rc;
use std::time::Duration;

use log::debug;

use super::debounce::ResizeDebouncer;
use super::document::Document;
use super::presenter::Presenter;
use super::session::SharedState;
use super::state::Command;

pub struct NavigationController<D> {
    state: SharedState,
    presenter: Presenter<D>,
    debouncer: ResizeDebouncer,
}

impl<D: Document + 'static> NavigationController<D> {
    #[must_use]
    pub fn new(state: SharedState, presenter: Presenter<D>, quiet_period: Duration) -> Self {
        Self {
            state,
            presenter,
            debouncer: ResizeDebouncer::new(quiet_period),
        }
    }

    /// Turn back one page. Returns false at the first page or with no document.
    pub fn go_to_previous_page(&self) -> bool {
        apply_command(&self.state, &self.presenter, Command::PreviousPage)
    }

    /// Turn forward one page. Returns false at the last page or with no document.
    pub fn go_to_next_page(&self) -> bool {
        apply_command(&self.state, &self.presenter, Command::NextPage)
    }

    /// Container resized; re-render the current page once resizing goes quiet
    pub fn on_resize(&self) {
        if self.state.borrow().is_none() {
            return;
        }

        let state = Rc::clone(&self.state);
        let presenter = self.presenter.clone();
        self.debouncer.schedule(move || {
            debug!("Resize settled, re-rendering current page");
            apply_command(&state, &presenter, Command::Refresh);
        });
    }

    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

fn apply_command<D: Document + 'static>(
    state: &SharedState,
    presenter: &Presenter<D>,
    cmd: Command,
) -> bool {
    let (snapshot, effects) = {
        let mut guard = state.borrow_mut();
        let Some(session) = guard.as_mut() else {
            return false;
        };
        let effects = session.apply(cmd);
        (*session, effects)
    };

    let changed = !effects.is_empty();
    presenter.execute(&snapshot, effects);
    changed
}
