//! Display regions the pipeline writes into, plus the request-generation counter.
//!
//! A [`UiState`] is shared by every run triggered from the same view. Each run
//! takes a [`Ticket`] when it starts; only the holder of the newest ticket may
//! write its result, so a slow lookup can never overwrite a newer one.

use parking_lot::{Mutex, MutexGuard};

/// One display area: visibility plus its current content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    visible: bool,
    content: String,
}

impl Region {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn replace(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn append(&mut self, content: &str) {
        self.content.push_str(content);
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }
}

/// The four regions of the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub today: Region,
    pub daily: Region,
    pub loading: Region,
    pub error: Region,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Generation number handed to a run when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Inner {
    regions: Regions,
    status: PipelineStatus,
    input: String,
    generation: u64,
}

/// Explicit replacement for page-global state.
#[derive(Debug, Default)]
pub struct UiState {
    inner: Mutex<Inner>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock()
    }

    /// Current text of the city input.
    pub fn input_value(&self) -> String {
        self.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    pub fn status(&self) -> PipelineStatus {
        self.lock().status
    }

    /// Copy of the regions as they are right now.
    pub fn snapshot(&self) -> Regions {
        self.lock().regions.clone()
    }

    /// Issue a new ticket and enter the loading state.
    ///
    /// Any older run still in flight is superseded from here on.
    pub fn start_run(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.status = PipelineStatus::Loading;

        let regions = &mut inner.regions;
        regions.loading.show();
        regions.today.hide();
        regions.today.clear();
        regions.daily.clear();
        regions.error.hide();
        regions.error.clear();

        Ticket(inner.generation)
    }

    /// Write a successful render. Returns `false` when `ticket` is stale.
    pub fn commit_success(&self, ticket: Ticket, today: String, day_cards: &[String]) -> bool {
        let mut inner = self.lock();
        if inner.generation != ticket.0 {
            return false;
        }
        inner.status = PipelineStatus::Success;

        let regions = &mut inner.regions;
        regions.loading.hide();
        regions.today.replace(today);
        regions.today.show();
        regions.daily.clear();
        for card in day_cards {
            regions.daily.append(card);
        }
        regions.error.hide();
        true
    }

    /// Write a failure. Returns `false` when `ticket` is stale.
    pub fn commit_failure(&self, ticket: Ticket, message: &str) -> bool {
        let mut inner = self.lock();
        if inner.generation != ticket.0 {
            return false;
        }
        inner.status = PipelineStatus::Failed;

        let regions = &mut inner.regions;
        regions.loading.hide();
        regions.today.hide();
        regions.daily.clear();
        regions.error.replace(message);
        regions.error.show();
        true
    }
}
