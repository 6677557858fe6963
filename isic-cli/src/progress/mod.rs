//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for per-image scoring
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize the progress bar for a known number of images
    pub fn init_images(&mut self, total_images: u64) {
        if self.quiet || total_images == 0 {
            return;
        }

        let pb = ProgressBar::new(total_images);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} images {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Update progress for a scored image
    pub fn image_completed(&self, image: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Scored: {image}"));
            pb.inc(1);
        }
    }

    /// Number of images reported so far
    pub fn position(&self) -> u64 {
        self.progress_bar.as_ref().map_or(0, ProgressBar::position)
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}
