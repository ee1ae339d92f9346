use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::feed::card::Card;
use crate::feed::{Feed, FeedOptions, GateOutcome};
use crate::fetch;

#[derive(Clone, Debug)]
pub struct Options {
    pub endpoint: String,
    pub batch_size: usize,
    pub cap: usize,
    pub tolerance: usize,
    pub viewport_height: usize,
    pub scrolls: usize,
    pub timeout_seconds: Option<u64>,
    pub proxy: Option<String>,
    pub header: Option<String>,
    pub follow_redirects: bool,
    pub skip_fetch: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/".to_string(),
            batch_size: 4,
            cap: 666,
            tolerance: 1,
            viewport_height: 24,
            scrolls: 1,
            timeout_seconds: None,
            proxy: None,
            header: None,
            follow_redirects: false,
            skip_fetch: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid endpoint URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid batch size {value}, expected positive integer")]
    InvalidBatchSize { value: usize },

    #[error("invalid tolerance {value}, expected 0 or 1")]
    InvalidTolerance { value: usize },

    #[error("invalid viewport height {value}, expected positive integer")]
    InvalidViewportHeight { value: usize },
}

#[derive(Clone, Debug)]
pub struct FeedReport {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub endpoint: String,
    pub notes_fetched: usize,
    pub fetch_error: Option<String>,
    pub scrolls: usize,
    pub appended: usize,
    pub cap_reached: bool,
    pub counter: usize,
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.batch_size == 0 {
            return Err(RunnerError::InvalidBatchSize {
                value: options.batch_size,
            });
        }
        if options.tolerance > 1 {
            return Err(RunnerError::InvalidTolerance {
                value: options.tolerance,
            });
        }
        if options.viewport_height == 0 {
            return Err(RunnerError::InvalidViewportHeight {
                value: options.viewport_height,
            });
        }
        if !options.skip_fetch && fetch::notes_url(&options.endpoint).is_err() {
            return Err(RunnerError::InvalidUrl {
                url: options.endpoint.clone(),
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn run(&self) -> Result<FeedReport, RunnerError> {
        let started_at = Instant::now();

        let mut feed = Feed::new(FeedOptions {
            batch_size: self.options.batch_size,
            cap: self.options.cap,
            tolerance: self.options.tolerance,
        });

        // Fetch failures are reported, not propagated: the feed still works
        // with no notes, exactly like a page that loads without its data.
        let mut notes_fetched = 0usize;
        let mut fetch_error: Option<String> = None;
        if !self.options.skip_fetch {
            match self.fetch_notes().await {
                Ok(notes) => {
                    notes_fetched = notes.len();
                    for note in notes.iter() {
                        feed.push_note(note);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "note fetch failed");
                    fetch_error = Some(e.to_string());
                }
            }
        }

        let viewport = self.options.viewport_height;
        let mut appended = 0usize;
        let mut cap_reached = false;
        for _ in 0..self.options.scrolls {
            feed.scroll_to_bottom(viewport);
            match feed.on_scroll(viewport) {
                GateOutcome::Appended(count) => appended += count,
                GateOutcome::CapReached => cap_reached = true,
                GateOutcome::NotAtBottom => {}
            }
        }
        if cap_reached {
            tracing::warn!(counter = feed.counter(), cap = self.options.cap, "no more cards");
        }

        let elapsed = started_at.elapsed();
        Ok(FeedReport {
            started_at,
            elapsed,
            endpoint: self.options.endpoint.clone(),
            notes_fetched,
            fetch_error,
            scrolls: self.options.scrolls,
            appended,
            cap_reached,
            counter: feed.counter(),
            cards: feed.into_cards(),
        })
    }

    pub async fn fetch_notes(&self) -> Result<Vec<fetch::NoteRecord>, fetch::FetchError> {
        let url = fetch::notes_url(&self.options.endpoint)?;
        let client = fetch::build_client(
            self.options.proxy.as_deref(),
            self.options.timeout_seconds,
            self.options.follow_redirects,
            self.options.header.as_deref(),
        )?;
        fetch::fetch_notes(&client, &url).await
    }
}
