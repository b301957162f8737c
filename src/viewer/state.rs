//! Page position state for a loaded document

use super::types::NavControls;

/// Current/total page counters for the loaded document.
///
/// Always `1 <= current_page <= total_pages`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    current_page: usize,
    total_pages: usize,
}

impl SessionState {
    /// Fresh state for a newly loaded document, positioned on page 1
    #[must_use]
    pub fn loaded(page_count: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: page_count.max(1),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Page indicator text, `"<current>/<total>"`
    #[must_use]
    pub fn indicator(&self) -> String {
        format!("{}/{}", self.current_page, self.total_pages)
    }

    #[must_use]
    pub fn controls(&self) -> NavControls {
        NavControls {
            previous_disabled: self.current_page <= 1,
            next_disabled: self.current_page >= self.total_pages,
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::PreviousPage => {
                if self.current_page <= 1 {
                    return vec![];
                }
                self.current_page -= 1;
                self.page_changed()
            }

            Command::NextPage => {
                if self.current_page >= self.total_pages {
                    return vec![];
                }
                self.current_page += 1;
                self.page_changed()
            }

            Command::Refresh => vec![Effect::RenderPage(self.current_page)],
        }
    }

    fn page_changed(&self) -> Vec<Effect> {
        vec![
            Effect::UpdateIndicator,
            Effect::UpdateControls,
            Effect::RenderPage(self.current_page),
        ]
    }
}

/// Commands that modify session state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn back one page
    PreviousPage,
    /// Turn forward one page
    NextPage,
    /// Redraw the current page (container resized)
    Refresh,
}

/// Effects produced by state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Publish the page indicator text
    UpdateIndicator,
    /// Publish navigation control enablement
    UpdateControls,
    /// Queue a page for rendering
    RenderPage(usize),
}
