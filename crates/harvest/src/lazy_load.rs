// ABOUTME: LazyLoadTrigger: scrolls the viewport in fixed steps so lazily-rendered items materialize.
// ABOUTME: Open loop by construction; it never checks for new content and never fails the run.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::options::Options;
use crate::page::LivePage;

/// Scrolls a page a fixed number of rounds with settling pauses.
#[derive(Debug, Clone, Copy)]
pub struct LazyLoadTrigger {
    rounds: u32,
    scroll_step: u32,
    settle_delay: Duration,
    final_settle: Duration,
}

impl LazyLoadTrigger {
    pub fn new(opts: &Options) -> Self {
        Self {
            rounds: opts.scroll_rounds,
            scroll_step: opts.scroll_step,
            settle_delay: opts.settle_delay,
            final_settle: opts.final_settle,
        }
    }

    /// Runs `rounds` iterations of scroll-then-settle.
    ///
    /// A failed scroll is logged and the round still waits out its settle
    /// delay; the worst case is that nothing new materialized.
    pub async fn materialize_content<P: LivePage + ?Sized>(&self, page: &P) {
        if self.rounds == 0 {
            return;
        }
        info!(
            rounds = self.rounds,
            step = self.scroll_step,
            "scrolling to load more content"
        );
        for round in 1..=self.rounds {
            if let Err(e) = page.scroll_by(self.scroll_step).await {
                warn!(round, error = %e, "scroll failed");
            } else {
                debug!(round, "scrolled");
            }
            sleep(self.settle_delay).await;
        }
        if !self.final_settle.is_zero() {
            sleep(self.final_settle).await;
        }
    }
}
