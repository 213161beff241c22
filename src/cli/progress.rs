//! CLI-specific progress handling for danfo-quote
//!
//! Provides progress bar implementation for batch estimation runs.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar for CLI display over a record count
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb
}

/// Progress manager for batch estimation runs
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total: u64, message: &str) -> Self {
        let pb = create_progress_bar(total);

        // Print initial message to stderr
        eprintln!("{}", message);

        Self { pb }
    }
}
