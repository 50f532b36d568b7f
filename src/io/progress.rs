//! Terminal progress over restart attempts

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static ATTEMPT_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Attempts: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress display for a generation run
///
/// A hidden tracker accepts the same calls and draws nothing, so callers
/// never branch on quiet mode.
pub struct AttemptProgress {
    bar: ProgressBar,
    contradictions: usize,
}

impl AttemptProgress {
    /// Track up to `attempts` attempts; `quiet` hides the bar
    pub fn new(attempts: usize, quiet: bool) -> Self {
        let bar = ProgressBar::new(attempts as u64);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(ATTEMPT_STYLE.clone());
        Self {
            bar,
            contradictions: 0,
        }
    }

    /// Record one attempt that did not produce a solution
    pub fn fail_attempt(&mut self, seed: u64) {
        self.contradictions += 1;
        self.bar.inc(1);
        self.bar
            .set_message(format!("{} failed, last seed {seed}", self.contradictions));
    }

    /// Record several failed attempts at once
    pub fn fail_batch(&mut self, count: usize, last_seed: u64) {
        self.contradictions += count;
        self.bar.inc(count as u64);
        self.bar
            .set_message(format!("{} failed, last seed {last_seed}", self.contradictions));
    }

    /// Attempts counted as failed so far
    pub const fn failures(&self) -> usize {
        self.contradictions
    }

    /// Close the bar after the run
    pub fn finish(&self, solved_seed: Option<u64>) {
        match solved_seed {
            Some(seed) => self.bar.finish_with_message(format!("solved with seed {seed}")),
            None => self.bar.abandon_with_message("no attempt succeeded"),
        }
    }
}
