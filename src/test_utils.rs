pub mod test_helpers {
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use std::time::Duration;

    use tokio::sync::Semaphore;
    use tokio::time::Instant;

    use crate::viewer::{
        Document, DocumentSource, LoadError, NavControls, Page, PageSize, RasterSurface,
        RenderError, Viewport, ViewerUi,
    };

    /// Letter-sized page in points
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);

    /// Colour fake pages paint over their whole area
    pub const INK: [u8; 3] = [0x20, 0x30, 0x40];

    /// One page draw as observed by the fake backend
    #[derive(Clone, Debug, PartialEq)]
    pub struct RenderRecord {
        pub path: String,
        pub page: usize,
        pub started: Instant,
    }

    #[derive(Clone, Debug)]
    struct DocumentSpec {
        pages: Vec<PageSize>,
        open_delay: Duration,
        corrupt: bool,
        failing_pages: HashSet<usize>,
    }

    /// State shared by the fake source and every document/page it hands out
    struct Shared {
        renders: RefCell<Vec<RenderRecord>>,
        opened: RefCell<Vec<String>>,
        gate: Option<Semaphore>,
    }

    /// Builder for an in-memory document source
    pub struct FakeSource {
        documents: HashMap<String, DocumentSpec>,
        shared: Rc<Shared>,
    }

    impl FakeSource {
        /// Source whose page draws complete immediately
        pub fn new() -> Self {
            Self::with_gate(None)
        }

        /// Source whose page draws block until [`FakeSource::release`] grants them
        pub fn gated() -> Self {
            Self::with_gate(Some(Semaphore::new(0)))
        }

        fn with_gate(gate: Option<Semaphore>) -> Self {
            Self {
                documents: HashMap::new(),
                shared: Rc::new(Shared {
                    renders: RefCell::new(Vec::new()),
                    opened: RefCell::new(Vec::new()),
                    gate,
                }),
            }
        }

        /// Add a document of `pages` letter-sized pages
        pub fn document(self, path: &str, pages: usize) -> Self {
            self.document_with_pages(path, vec![LETTER; pages])
        }

        pub fn document_with_pages(mut self, path: &str, pages: Vec<PageSize>) -> Self {
            self.documents.insert(
                path.to_string(),
                DocumentSpec {
                    pages,
                    open_delay: Duration::ZERO,
                    corrupt: false,
                    failing_pages: HashSet::new(),
                },
            );
            self
        }

        /// Add a document whose open fails with a decoding error
        pub fn corrupt_document(mut self, path: &str) -> Self {
            self.documents.insert(
                path.to_string(),
                DocumentSpec {
                    pages: Vec::new(),
                    open_delay: Duration::ZERO,
                    corrupt: true,
                    failing_pages: HashSet::new(),
                },
            );
            self
        }

        /// Delay opening `path` by `delay`
        pub fn open_delay(mut self, path: &str, delay: Duration) -> Self {
            if let Some(spec) = self.documents.get_mut(path) {
                spec.open_delay = delay;
            }
            self
        }

        /// Make drawing `page` of `path` fail
        pub fn failing_page(mut self, path: &str, page: usize) -> Self {
            if let Some(spec) = self.documents.get_mut(path) {
                spec.failing_pages.insert(page);
            }
            self
        }

        /// Handle for observing renders after the source moved into a viewer
        pub fn probe(&self) -> FakeProbe {
            FakeProbe {
                shared: Rc::clone(&self.shared),
            }
        }
    }

    impl Default for FakeSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentSource for FakeSource {
        type Document = FakeDocument;

        async fn open(&self, path: &str) -> Result<FakeDocument, LoadError> {
            self.shared.opened.borrow_mut().push(path.to_string());
            let spec = self.documents.get(path).cloned();

            let Some(spec) = spec else {
                return Err(LoadError::open(path, "not found"));
            };
            if !spec.open_delay.is_zero() {
                tokio::time::sleep(spec.open_delay).await;
            }
            if spec.corrupt {
                return Err(LoadError::open(path, "corrupt data"));
            }

            Ok(FakeDocument {
                path: path.to_string(),
                spec,
                shared: Rc::clone(&self.shared),
            })
        }
    }

    /// Observes renders and opens of a [`FakeSource`]
    #[derive(Clone)]
    pub struct FakeProbe {
        shared: Rc<Shared>,
    }

    impl FakeProbe {
        pub fn renders(&self) -> Vec<RenderRecord> {
            self.shared.renders.borrow().clone()
        }

        /// Page numbers drawn, in start order
        pub fn rendered_pages(&self) -> Vec<usize> {
            self.shared.renders.borrow().iter().map(|r| r.page).collect()
        }

        pub fn opened(&self) -> Vec<String> {
            self.shared.opened.borrow().clone()
        }

        /// Let `n` gated draws complete
        pub fn release(&self, n: usize) {
            if let Some(gate) = &self.shared.gate {
                gate.add_permits(n);
            }
        }
    }

    pub struct FakeDocument {
        path: String,
        spec: DocumentSpec,
        shared: Rc<Shared>,
    }

    impl FakeDocument {
        pub fn path(&self) -> &str {
            &self.path
        }
    }

    impl Document for FakeDocument {
        type Page = FakePage;

        fn page_count(&self) -> usize {
            self.spec.pages.len()
        }

        async fn page(&self, number: usize) -> Result<FakePage, RenderError> {
            let size = number
                .checked_sub(1)
                .and_then(|index| self.spec.pages.get(index))
                .copied()
                .ok_or(RenderError::PageOutOfRange {
                    page: number,
                    page_count: self.spec.pages.len(),
                })?;

            Ok(FakePage {
                path: self.path.clone(),
                number,
                size,
                fails: self.spec.failing_pages.contains(&number),
                shared: Rc::clone(&self.shared),
            })
        }
    }

    pub struct FakePage {
        path: String,
        number: usize,
        size: PageSize,
        fails: bool,
        shared: Rc<Shared>,
    }

    impl Page for FakePage {
        fn intrinsic_size(&self) -> PageSize {
            self.size
        }

        async fn render(
            &self,
            surface: &mut RasterSurface,
            viewport: &Viewport,
        ) -> Result<(), RenderError> {
            self.shared.renders.borrow_mut().push(RenderRecord {
                path: self.path.clone(),
                page: self.number,
                started: Instant::now(),
            });

            if let Some(gate) = &self.shared.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }

            if self.fails {
                return Err(RenderError::generic(format!(
                    "page {} failed to draw",
                    self.number
                )));
            }

            surface.fill_rect(0.0, 0.0, viewport.width, viewport.height, INK);
            Ok(())
        }
    }

    /// UI that records everything the viewer publishes
    #[derive(Default)]
    pub struct RecordingUi {
        indicators: RefCell<Vec<String>>,
        controls: Cell<Option<NavControls>>,
        rendered: RefCell<Vec<usize>>,
        surface: RefCell<Option<RasterSurface>>,
    }

    impl RecordingUi {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn indicator(&self) -> Option<String> {
            self.indicators.borrow().last().cloned()
        }

        pub fn indicators(&self) -> Vec<String> {
            self.indicators.borrow().clone()
        }

        pub fn controls(&self) -> Option<NavControls> {
            self.controls.get()
        }

        pub fn rendered(&self) -> Vec<usize> {
            self.rendered.borrow().clone()
        }

        /// Copy of the surface as of the last completed render
        pub fn last_surface(&self) -> Option<RasterSurface> {
            self.surface.borrow().clone()
        }
    }

    impl ViewerUi for RecordingUi {
        fn page_indicator_changed(&self, text: &str) {
            self.indicators.borrow_mut().push(text.to_string());
        }

        fn controls_changed(&self, controls: NavControls) {
            self.controls.set(Some(controls));
        }

        fn page_rendered(&self, page: usize, surface: &RasterSurface) {
            self.rendered.borrow_mut().push(page);
            *self.surface.borrow_mut() = Some(surface.clone());
        }
    }
}
