//! Single-page document viewing
//!
//! A document is loaded into a [`DocumentSession`], page turns and resize
//! signals go through the [`NavigationController`], and every draw is
//! serialized by the [`RenderQueue`] so only one page render is ever in flight.

mod config;
mod debounce;
mod document;
mod error;
mod navigation;
mod presenter;
mod queue;
mod renderer;
mod service;
mod session;
mod sizing;
mod sources;
mod state;
mod surface;
mod types;

pub use config::{DEFAULT_RESIZE_QUIET_PERIOD, ViewerConfig};
pub use debounce::ResizeDebouncer;
pub use document::{Document, DocumentSource, Page};
pub use error::{LoadError, RenderError};
pub use navigation::NavigationController;
pub use presenter::Presenter;
pub use queue::{RenderQueue, RenderTarget};
pub use renderer::{PageRenderTarget, render_page};
pub use service::DocumentViewer;
pub use session::{DocumentSession, DocumentSlot, LoadOutcome, SharedState};
pub use sizing::{DEFAULT_MIN_WIDTH, DEFAULT_PADDING, ViewportSizing};
pub use sources::{DEFAULT_SOURCE_KEY, SourceCatalog, default_sources};
pub use state::{Command, Effect, SessionState};
pub use surface::{MAX_SURFACE_DIMENSION, RasterSurface, SampleLayout};
pub use types::*;
