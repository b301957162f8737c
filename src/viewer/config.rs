//! Viewer configuration

use std::time::Duration;

use super::sizing::ViewportSizing;
use super::sources::SourceCatalog;

/// Quiet period after the last resize signal before the page is re-rendered
pub const DEFAULT_RESIZE_QUIET_PERIOD: Duration = Duration::from_millis(150);

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub sizing: ViewportSizing,
    pub resize_quiet_period: Duration,
    pub catalog: SourceCatalog,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sizing: ViewportSizing::default(),
            resize_quiet_period: DEFAULT_RESIZE_QUIET_PERIOD,
            catalog: SourceCatalog::default(),
        }
    }
}
