use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(120);

/// One spinner line per pipeline stage, labelled with the stage name.
pub struct StageProgress {
    multi: MultiProgress,
    bars: Vec<(&'static str, ProgressBar)>,
}

impl StageProgress {
    pub fn new(stages: &[&'static str]) -> Self {
        let multi = MultiProgress::new();
        let bars = stages
            .iter()
            .map(|stage| (*stage, multi.add(stage_bar(stage))))
            .collect();
        Self { multi, bars }
    }

    fn bar(&self, stage: &str) -> Option<&ProgressBar> {
        self.bars
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, bar)| bar)
    }

    /// Marks `stage` as running with `detail` as its current step.
    pub fn step(&self, stage: &str, detail: impl Into<String>) {
        if let Some(bar) = self.bar(stage) {
            bar.enable_steady_tick(TICK);
            bar.set_message(detail.into());
        }
    }

    pub fn done(&self, stage: &str, detail: impl Into<String>) {
        if let Some(bar) = self.bar(stage) {
            bar.finish_with_message(format!("done: {}", detail.into()));
        }
    }

    /// Drops every line from the terminal once the run is over, successful
    /// or not.
    pub fn clear(&self) {
        for (_, bar) in &self.bars {
            bar.finish_and_clear();
        }
        if let Err(err) = self.multi.clear() {
            tracing::debug!(error = %err, "could not clear stage progress");
        }
    }
}

fn stage_bar(stage: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{prefix:>10.bold} {spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("-\\|/ ");
    bar.set_style(style);
    bar.set_prefix(stage.to_string());
    bar.set_message("waiting");
    bar
}
