pub mod card;

use crate::fetch::NoteRecord;

use self::card::Card;

#[derive(Clone, Copy, Debug)]
pub struct FeedOptions {
    pub batch_size: usize,
    pub cap: usize,
    pub tolerance: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            batch_size: 4,
            cap: 666,
            tolerance: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub offset: usize,
    pub viewport: usize,
    pub content: usize,
}

impl ScrollMetrics {
    pub fn at_bottom(&self, tolerance: usize) -> bool {
        self.offset + self.viewport >= self.content.saturating_sub(tolerance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Appended(usize),
    CapReached,
    NotAtBottom,
}

#[derive(Clone, Debug)]
pub struct Feed {
    options: FeedOptions,
    cards: Vec<Card>,
    offset: usize,
    counter: usize,
}

impl Feed {
    pub fn new(options: FeedOptions) -> Self {
        Self {
            counter: options.batch_size,
            options,
            cards: Vec::new(),
            offset: 0,
        }
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn content_rows(&self) -> usize {
        self.cards.iter().map(|c| c.rows()).sum()
    }

    pub fn push_note(&mut self, note: &NoteRecord) {
        let ordinal = self.cards.len() + 1;
        self.cards.push(Card::from_note(ordinal, note));
    }

    pub fn append_placeholders(&mut self, count: usize) {
        for _ in 0..count {
            let ordinal = self.cards.len() + 1;
            self.cards.push(Card::placeholder(ordinal));
        }
    }

    // Manual trigger. Advances the counter but is never blocked by the cap.
    pub fn add_batch(&mut self) -> usize {
        tracing::debug!(counter = self.counter, "adding card batch");
        self.counter += self.options.batch_size;
        self.append_placeholders(self.options.batch_size);
        self.options.batch_size
    }

    pub fn on_scroll(&mut self, viewport: usize) -> GateOutcome {
        let metrics = ScrollMetrics {
            offset: self.offset,
            viewport,
            content: self.content_rows(),
        };
        if !metrics.at_bottom(self.options.tolerance) {
            return GateOutcome::NotAtBottom;
        }
        tracing::debug!(
            offset = metrics.offset,
            content = metrics.content,
            "feed scrolled to bottom"
        );
        if self.cap_allows() {
            GateOutcome::Appended(self.add_batch())
        } else {
            tracing::debug!(counter = self.counter, cap = self.options.cap, "no more cards");
            GateOutcome::CapReached
        }
    }

    fn cap_allows(&self) -> bool {
        self.options.cap == 0 || self.counter <= self.options.cap
    }

    pub fn max_offset(&self, viewport: usize) -> usize {
        self.content_rows().saturating_sub(viewport)
    }

    pub fn scroll_to(&mut self, offset: usize, viewport: usize) {
        self.offset = offset.min(self.max_offset(viewport));
    }

    pub fn scroll_by(&mut self, delta: i64, viewport: usize) {
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.scroll_to(target, viewport);
    }

    pub fn scroll_to_bottom(&mut self, viewport: usize) {
        self.offset = self.max_offset(viewport);
    }
}
