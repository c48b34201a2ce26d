//! View-state machine behind the search panels.
//!
//! Every search moves the view to `Loading`, then settles on exactly one of
//! `Found`, `NotFound` or `Error`. Rendering is delegated to a [`ViewSink`],
//! which always receives the complete view so that entering a state replaces
//! whatever was shown before.
//!
//! Overlapping searches are resolved by cancelling the older one: its
//! in-flight request is dropped and its result never reaches the sink.

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::{fmt::Debug, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    WeatherError,
    forecast::select_daily,
    location::Locator,
    model::{Lookup, Query},
    provider::WeatherProvider,
    render::{RenderData, build_render_data},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Idle,
    Loading,
    Found,
    NotFound,
    Error,
}

/// A view state together with what it displays.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Idle,
    Loading,
    Found(Box<RenderData>),
    NotFound,
    Error(String),
}

impl View {
    pub fn state(&self) -> ViewState {
        match self {
            Self::Idle => ViewState::Idle,
            Self::Loading => ViewState::Loading,
            Self::Found(_) => ViewState::Found,
            Self::NotFound => ViewState::NotFound,
            Self::Error(_) => ViewState::Error,
        }
    }
}

/// Output side of the controller.
pub trait ViewSink: Send + Sync + Debug {
    /// Show `view`, hiding every region that belongs to another state.
    fn render(&self, view: &View);

    /// Blocking notice that does not change the view state.
    fn alert(&self, message: &str);
}

/// How a single search call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Settled(ViewState),
    /// A newer search started before this one finished.
    Superseded,
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct Searches {
    next_id: u64,
    current: Option<InFlight>,
}

#[derive(Debug)]
pub struct DisplayController {
    provider: Box<dyn WeatherProvider>,
    sink: Arc<dyn ViewSink>,
    view: Mutex<View>,
    searches: Mutex<Searches>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl DisplayController {
    pub fn new(provider: Box<dyn WeatherProvider>, sink: Arc<dyn ViewSink>) -> Self {
        Self {
            provider,
            sink,
            view: Mutex::new(View::Idle),
            searches: Mutex::new(Searches::default()),
            today: local_today,
        }
    }

    /// Replace the source of "today" used for the date line.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn state(&self) -> ViewState {
        self.view.lock().state()
    }

    pub fn view(&self) -> View {
        self.view.lock().clone()
    }

    /// Run one search to completion and render every state it passes through.
    pub async fn search(&self, query: Query) -> SearchOutcome {
        let (id, token) = self.begin(&query);

        let result = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = self.resolve(&query) => Some(result),
        };

        let Some(result) = result else {
            debug!(search = id, "search cancelled by a newer one");
            return SearchOutcome::Superseded;
        };

        let view = match result {
            Ok(Some(data)) => View::Found(Box::new(data)),
            Ok(None) => View::NotFound,
            Err(err) => {
                warn!(search = id, error = %err, "search failed");
                View::Error(err.to_string())
            }
        };

        self.finish(id, view)
    }

    /// Ask `locator` for coordinates and search there.
    ///
    /// A refused location raises an alert and leaves the view untouched.
    pub async fn locate_and_search(
        &self,
        locator: &dyn Locator,
    ) -> Result<SearchOutcome, WeatherError> {
        match locator.locate().await {
            Ok(query) => Ok(self.search(query).await),
            Err(err) => {
                warn!(error = %err, "location unavailable");
                self.sink.alert(&err.to_string());
                Err(err)
            }
        }
    }

    /// Current conditions first; the forecast is only requested for a
    /// location that resolved.
    async fn resolve(&self, query: &Query) -> Result<Option<RenderData>, WeatherError> {
        let reading = match self.provider.fetch_current(query).await? {
            Lookup::Found(reading) => reading,
            Lookup::NotFound => return Ok(None),
        };

        let series = self.provider.fetch_series(query).await?;
        let daily = select_daily(&series);
        debug!(
            samples = series.len(),
            days = daily.len(),
            "forecast reduced to daily samples"
        );

        build_render_data(&reading, &daily, (self.today)()).map(Some)
    }

    fn begin(&self, query: &Query) -> (u64, CancellationToken) {
        let mut searches = self.searches.lock();

        if let Some(stale) = searches.current.take() {
            debug!(search = stale.id, "cancelling stale search");
            stale.token.cancel();
        }

        searches.next_id += 1;
        let id = searches.next_id;
        let token = CancellationToken::new();
        searches.current = Some(InFlight {
            id,
            token: token.clone(),
        });

        info!(search = id, %query, "search started");
        self.transition(View::Loading);
        (id, token)
    }

    fn finish(&self, id: u64, view: View) -> SearchOutcome {
        let mut searches = self.searches.lock();

        if searches.current.as_ref().is_none_or(|current| current.id != id) {
            debug!(search = id, "discarding result of superseded search");
            return SearchOutcome::Superseded;
        }
        searches.current = None;

        let state = view.state();
        info!(search = id, ?state, "search settled");
        self.transition(view);
        SearchOutcome::Settled(state)
    }

    /// Callers hold `searches`, which keeps renders in transition order.
    fn transition(&self, view: View) {
        {
            let mut current = self.view.lock();
            debug!(from = ?current.state(), to = ?view.state(), "view transition");
            *current = view.clone();
        }
        // The sink may read the controller back, so render without the view lock.
        self.sink.render(&view);
    }
}
