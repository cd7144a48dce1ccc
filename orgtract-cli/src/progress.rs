//! Progress bar for the extraction pass

use indicatif::{ProgressBar, ProgressStyle};
use orgtract::{Phase, ResolveObserver};

/// Drives an `indicatif` bar from resolver callbacks.
///
/// The bar is cleared once extraction ends, before any operator prompt.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("#>-"));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ResolveObserver for ProgressObserver {
    fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Canonicalize => self.bar.set_message("canonicalizing"),
            Phase::Extract => self.bar.set_message("extracting"),
            _ => {
                self.bar.finish_and_clear();
                log::debug!("phase: {}", phase);
            }
        }
    }

    fn on_record(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }
}
