//! Terminal progress bar fed by persistence progress events.

use hm_engine::{ProgressEvent, ProgressReporter, ProgressSink};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Bar positions per unit of progress.
const RESOLUTION: u64 = 1000;

const TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {percent:>3}% {msg}";

/// Progress sink drawing an `indicatif` bar on stderr.
pub struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    /// Bar drawn on stderr; hidden when `visible` is false.
    pub fn new(visible: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(RESOLUTION),
            if visible {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn reporter(&self) -> ProgressReporter<'_> {
        ProgressReporter::new(self)
    }

    /// Current bar position in `0..=RESOLUTION`.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl ProgressSink for BarSink {
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        let position = (event.fraction * RESOLUTION as f64).round() as u64;
        self.bar.set_position(position.min(RESOLUTION));
        if event.detail.is_empty() {
            self.bar.set_message(event.stage.to_string());
        } else {
            self.bar
                .set_message(format!("{}: {}", event.stage, event.detail));
        }
        // Nested operations end with a final event below 1.
        if event.is_final && position >= RESOLUTION {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for BarSink {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
