use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use pageturn::test_utils::test_helpers::{FakeProbe, FakeSource, INK, RecordingUi};
use pageturn::viewer::{
    ContainerMetrics, DocumentViewer, LoadError, MeasuredContainer, NavControls, PageSize,
    SourceCatalog, ViewerConfig, ViewerPhase,
};
use tokio::task::LocalSet;
use tokio::time::{Instant, sleep};

const QUIET: Duration = Duration::from_millis(150);

struct Harness {
    viewer: DocumentViewer<FakeSource>,
    ui: Rc<RecordingUi>,
    container: Rc<MeasuredContainer>,
    probe: FakeProbe,
}

fn config() -> ViewerConfig {
    let sources = BTreeMap::from(
        [
            ("evening", "evening.pdf"),
            ("morning", "morning.pdf"),
            ("single", "single.pdf"),
            ("broken", "broken.pdf"),
            ("missing", "missing.pdf"),
        ]
        .map(|(key, path)| (key.to_string(), path.to_string())),
    );
    ViewerConfig {
        catalog: SourceCatalog::new(sources, "evening"),
        resize_quiet_period: QUIET,
        ..ViewerConfig::default()
    }
}

fn menus() -> FakeSource {
    FakeSource::new()
        .document("evening.pdf", 5)
        .document("morning.pdf", 3)
        .document("single.pdf", 1)
        .corrupt_document("broken.pdf")
}

fn harness(source: FakeSource) -> Harness {
    let probe = source.probe();
    let ui = RecordingUi::new();
    let container = Rc::new(MeasuredContainer::new(ContainerMetrics::new(636.0, 1.0)));
    let viewer = DocumentViewer::new(Some(source), container.clone(), ui.clone(), config());
    Harness {
        viewer,
        ui,
        container,
        probe,
    }
}

impl Harness {
    /// Switch to `key` and wait for the load and any resulting render
    async fn open(&self, key: &str) {
        let task = self.viewer.set_source(key).expect("known source");
        task.await.expect("load task");
        self.viewer.queue().idle().await;
    }

    async fn settle(&self) {
        self.viewer.queue().idle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_start_loads_default_document_on_first_page() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());

            h.viewer.start().expect("decoder available").await.unwrap();
            h.settle().await;

            assert_eq!(h.ui.indicator().as_deref(), Some("1/5"));
            assert_eq!(
                h.ui.controls(),
                Some(NavControls {
                    previous_disabled: true,
                    next_disabled: false,
                })
            );
            assert_eq!(
                h.viewer.phase(),
                ViewerPhase::Ready {
                    current_page: 1,
                    total_pages: 5
                }
            );
            assert_eq!(h.probe.rendered_pages(), vec![1]);
            assert_eq!(h.viewer.active_source().as_deref(), Some("evening"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_page_turns_update_indicator_and_render() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("evening").await;

            for _ in 0..3 {
                assert!(h.viewer.go_to_next_page());
                h.settle().await;
            }
            assert!(h.viewer.go_to_previous_page());
            h.settle().await;

            assert_eq!(h.ui.indicator().as_deref(), Some("3/5"));
            assert_eq!(
                h.ui.indicators(),
                vec!["1/5", "2/5", "3/5", "4/5", "3/5"]
            );
            assert_eq!(h.ui.rendered(), vec![1, 2, 3, 4, 3]);
            assert_eq!(
                h.viewer.controls(),
                Some(NavControls {
                    previous_disabled: false,
                    next_disabled: false,
                })
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_turns_stop_at_document_bounds() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("morning").await;

            assert!(!h.viewer.go_to_previous_page());
            while h.viewer.go_to_next_page() {
                h.settle().await;
            }
            h.settle().await;

            assert_eq!(h.ui.indicator().as_deref(), Some("3/3"));
            assert_eq!(
                h.ui.controls(),
                Some(NavControls {
                    previous_disabled: false,
                    next_disabled: true,
                })
            );
            assert!(!h.viewer.go_to_next_page());
            assert_eq!(h.probe.rendered_pages(), vec![1, 2, 3]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_single_page_document_disables_both_controls() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("single").await;

            assert_eq!(h.ui.indicator().as_deref(), Some("1/1"));
            assert_eq!(
                h.ui.controls(),
                Some(NavControls {
                    previous_disabled: true,
                    next_disabled: true,
                })
            );

            assert!(!h.viewer.go_to_next_page());
            assert!(!h.viewer.go_to_previous_page());
            h.settle().await;

            assert_eq!(h.ui.indicators(), vec!["1/1"]);
            assert_eq!(h.probe.rendered_pages(), vec![1]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_keeps_current_document() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("evening").await;
            assert!(h.viewer.go_to_next_page());
            h.settle().await;

            h.open("broken").await;
            h.open("missing").await;

            assert_eq!(h.ui.indicator().as_deref(), Some("2/5"));
            assert_eq!(
                h.viewer.phase(),
                ViewerPhase::Ready {
                    current_page: 2,
                    total_pages: 5
                }
            );
            assert!(!h.viewer.queue().is_rendering());
            assert_eq!(h.probe.rendered_pages(), vec![1, 2]);
            assert_eq!(
                h.probe.opened(),
                vec!["evening.pdf", "broken.pdf", "missing.pdf"]
            );

            assert!(h.viewer.go_to_next_page());
            h.settle().await;
            assert_eq!(h.ui.indicator().as_deref(), Some("3/5"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_document_is_rejected() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::new().document("empty.pdf", 0);
            let h = harness(source);

            let result = h.viewer.session().load("empty.pdf").await;

            assert!(matches!(result, Err(LoadError::Empty { .. })));
            assert_eq!(h.viewer.phase(), ViewerPhase::Unloaded);
            assert!(h.ui.indicators().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_resize_burst_renders_once_after_quiet_period() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("evening").await;
            assert!(h.viewer.go_to_next_page());
            h.settle().await;
            let before = h.probe.renders().len();

            h.viewer.on_resize();
            sleep(Duration::from_millis(50)).await;
            h.viewer.on_resize();
            let last_signal = Instant::now();
            assert!(h.viewer.navigation().resize_pending());

            sleep(QUIET * 3).await;
            h.settle().await;

            let renders = h.probe.renders();
            assert_eq!(renders.len(), before + 1);
            let rerender = &renders[before];
            assert_eq!(rerender.page, 2);
            let delay = rerender.started - last_signal;
            assert!(delay >= QUIET, "rendered after {delay:?}");
            assert!(delay < QUIET + Duration::from_millis(5), "rendered after {delay:?}");
            assert!(!h.viewer.navigation().resize_pending());
            assert_eq!(h.ui.indicator().as_deref(), Some("2/5"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_resize_redraws_at_new_width() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::new()
                .document_with_pages("evening.pdf", vec![PageSize::new(600.0, 800.0); 2]);
            let h = harness(source);
            h.open("evening").await;
            let surface = h.ui.last_surface().expect("page drawn");
            assert_eq!((surface.width_px(), surface.height_px()), (600, 800));

            h.container.set(ContainerMetrics::new(336.0, 1.0));
            h.viewer.on_resize();
            sleep(QUIET * 2).await;
            h.settle().await;

            let surface = h.ui.last_surface().expect("page redrawn");
            assert_eq!((surface.width_px(), surface.height_px()), (300, 400));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_surface_uses_device_pixels_and_page_covers_it() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::new()
                .document_with_pages("evening.pdf", vec![PageSize::new(600.0, 800.0)]);
            let h = harness(source);
            h.container.set(ContainerMetrics::new(636.0, 2.0));

            h.open("evening").await;

            let surface = h.ui.last_surface().expect("page drawn");
            assert_eq!((surface.width_px(), surface.height_px()), (1200, 1600));
            assert_eq!(surface.display_size(), (600.0, 800.0));
            assert!((surface.transform() - 2.0).abs() < f32::EPSILON);
            assert_eq!(surface.pixel(0, 0), Some(INK));
            assert_eq!(surface.pixel(1199, 1599), Some(INK));

            let target = h.viewer.queue().target();
            assert_eq!(target.last_rendered(), Some(1));
            assert_eq!(
                target.with_surface(|s| (s.width_px(), s.height_px(), s.pixel(600, 800))),
                (1200, 1600, Some(INK))
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_extreme_resize_keeps_surface_bounded() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("evening").await;

            h.container.set(ContainerMetrics::new(636.0, 1.0e6));
            h.viewer.on_resize();
            sleep(QUIET * 2).await;
            h.settle().await;

            h.container.set(ContainerMetrics::new(f32::INFINITY, 1.0));
            h.viewer.on_resize();
            sleep(QUIET * 2).await;
            h.settle().await;

            assert_eq!(h.ui.rendered(), vec![1, 1, 1]);
            let surface = h.ui.last_surface().expect("page redrawn");
            assert_eq!(surface.width_px(), 180);
            assert_eq!(h.viewer.queue().target().with_surface(|s| s.width_px()), 180);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_turns_during_render_coalesce_to_last_page() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::gated().document("evening.pdf", 5);
            let h = harness(source);
            h.viewer.set_source("evening").unwrap().await.unwrap();
            assert!(h.viewer.queue().is_rendering());

            for _ in 0..4 {
                assert!(h.viewer.go_to_next_page());
            }
            assert_eq!(h.ui.indicator().as_deref(), Some("5/5"));
            assert_eq!(h.viewer.queue().pending_page(), Some(5));

            h.probe.release(2);
            h.settle().await;

            assert_eq!(h.probe.rendered_pages(), vec![1, 5]);
            assert_eq!(h.ui.rendered(), vec![1, 5]);
            assert_eq!(h.viewer.queue().pending_page(), None);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_render_does_not_block_later_turns() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::new()
                .document("evening.pdf", 5)
                .failing_page("evening.pdf", 2);
            let h = harness(source);
            h.open("evening").await;

            assert!(h.viewer.go_to_next_page());
            h.settle().await;
            assert!(!h.viewer.queue().is_rendering());

            assert!(h.viewer.go_to_next_page());
            h.settle().await;

            assert_eq!(h.probe.rendered_pages(), vec![1, 2, 3]);
            assert_eq!(h.ui.rendered(), vec![1, 3]);
            assert_eq!(h.viewer.queue().target().last_rendered(), Some(3));
            assert_eq!(h.ui.indicator().as_deref(), Some("3/5"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_new_document_during_render_draws_its_first_page() {
    LocalSet::new()
        .run_until(async {
            let source = FakeSource::gated()
                .document("evening.pdf", 5)
                .document("morning.pdf", 3);
            let h = harness(source);
            h.viewer.set_source("evening").unwrap().await.unwrap();
            sleep(Duration::from_millis(1)).await;
            assert_eq!(h.probe.rendered_pages(), vec![1]);
            assert!(h.viewer.go_to_next_page());

            h.viewer.set_source("morning").unwrap().await.unwrap();
            assert_eq!(h.ui.indicator().as_deref(), Some("1/3"));

            h.probe.release(2);
            h.settle().await;

            let drawn: Vec<_> = h
                .probe
                .renders()
                .into_iter()
                .map(|r| (r.path, r.page))
                .collect();
            assert_eq!(
                drawn,
                vec![("evening.pdf".to_string(), 1), ("morning.pdf".to_string(), 1)]
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_latest_load_wins_when_it_finishes_first() {
    LocalSet::new()
        .run_until(async {
            let source = menus().open_delay("evening.pdf", Duration::from_millis(100));
            let h = harness(source);

            let first = h.viewer.set_source("evening").unwrap();
            sleep(Duration::from_millis(1)).await;
            assert_eq!(h.viewer.phase(), ViewerPhase::Loading);
            let second = h.viewer.set_source("morning").unwrap();
            first.await.unwrap();
            second.await.unwrap();
            h.settle().await;

            assert_eq!(h.ui.indicators(), vec!["1/3"]);
            assert_eq!(
                h.viewer.session().document().map(|d| d.path().to_string()),
                Some("morning.pdf".to_string())
            );
            assert_eq!(h.viewer.active_source().as_deref(), Some("morning"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_latest_load_wins_when_it_finishes_last() {
    LocalSet::new()
        .run_until(async {
            let source = menus()
                .open_delay("evening.pdf", Duration::from_millis(10))
                .open_delay("morning.pdf", Duration::from_millis(100));
            let h = harness(source);

            let first = h.viewer.set_source("evening").unwrap();
            let second = h.viewer.set_source("morning").unwrap();
            first.await.unwrap();
            assert!(h.ui.indicators().is_empty());
            second.await.unwrap();
            h.settle().await;

            assert_eq!(h.ui.indicators(), vec!["1/3"]);
            assert_eq!(h.probe.renders().len(), 1);
            assert_eq!(h.probe.renders()[0].path, "morning.pdf");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_source_key_is_ignored() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());
            h.open("evening").await;

            assert!(h.viewer.set_source("brunch").is_none());
            h.settle().await;

            assert_eq!(h.viewer.active_source().as_deref(), Some("evening"));
            assert_eq!(h.probe.opened(), vec!["evening.pdf"]);
            assert_eq!(h.ui.indicator().as_deref(), Some("1/5"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_navigation_before_load_does_nothing() {
    LocalSet::new()
        .run_until(async {
            let h = harness(menus());

            assert!(!h.viewer.go_to_next_page());
            assert!(!h.viewer.go_to_previous_page());
            h.viewer.on_resize();
            assert!(!h.viewer.navigation().resize_pending());
            sleep(QUIET * 2).await;

            assert_eq!(h.viewer.phase(), ViewerPhase::Unloaded);
            assert!(h.ui.indicators().is_empty());
            assert!(h.probe.renders().is_empty());
            assert_eq!(h.viewer.indicator(), None);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_viewer_without_decoder_stays_unloaded() {
    LocalSet::new()
        .run_until(async {
            let ui = RecordingUi::new();
            let container = Rc::new(MeasuredContainer::default());
            let viewer: DocumentViewer<FakeSource> =
                DocumentViewer::new(None, container, ui.clone(), config());

            assert!(viewer.start().is_none());
            assert!(viewer.set_source("morning").is_none());
            assert!(matches!(
                viewer.session().load("morning.pdf").await,
                Err(LoadError::DecoderUnavailable)
            ));

            assert_eq!(viewer.phase(), ViewerPhase::Unloaded);
            assert!(!viewer.go_to_next_page());
            assert!(ui.indicators().is_empty());
            assert!(ui.rendered().is_empty());
        })
        .await;
}
