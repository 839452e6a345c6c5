use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pointseries_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives a terminal progress bar from pipeline progress callbacks.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr()),
        }
    }

    pub fn finish(&self, message: &'static str) {
        self.bar.finish_with_message(message);
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.reset();
        match total_items {
            Some(total) => {
                self.bar.set_length(total as u64);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{msg:20} [{bar:40}] {pos}/{len}")
                {
                    self.bar.set_style(style.progress_chars("=> "));
                }
            }
            None => {
                self.bar.unset_length();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                    self.bar.set_style(style);
                }
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
        }
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.disable_steady_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_stage_restarts_the_bar() {
        let reporter = BarReporter::new();
        reporter.begin_stage(PipelineStage::Reducing, Some(12));
        reporter.advance(5);
        assert_eq!(reporter.bar.length(), Some(12));
        assert_eq!(reporter.bar.position(), 5);
        reporter.finish_stage();

        reporter.begin_stage(PipelineStage::Reducing, Some(3));
        assert_eq!(reporter.bar.length(), Some(3));
        assert_eq!(reporter.bar.position(), 0);
        reporter.finish_stage();
        reporter.finish("Done");
    }
}
