use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A bar counting parsed files, drawn on stderr.
pub fn create_file_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style.progress_chars("=> "));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Advance the bar past one file.
pub fn file_done(pb: &ProgressBar, file: &str) {
    pb.set_message(file.to_string());
    pb.inc(1);
}

/// Remove the bar so the summary line starts on a clean line.
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}
