// Export modules for use in tests
pub mod panic_handler;
pub mod settings;
pub mod viewer;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main viewer components
pub use viewer::{DocumentViewer, NavControls, ViewerPhase, ViewerUi};
