//! Progress spinner and logging utilities.
//!
//! Provides helpers for phase spinners, with support for log-only mode where
//! spinners are hidden and each phase prints a plain line instead.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Set log-only mode globally
pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

/// Check if log-only mode is enabled
pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// Create a spinner for one pipeline phase.
/// In log-only mode, the spinner is hidden and the message is printed once.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        println!("{}", msg);
    } else {
        let style = ProgressStyle::default_spinner()
            .template("{msg} {spinner} [{elapsed_precise}]");
        if let Ok(style) = style {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

/// Finish a phase spinner, leaving `msg` on screen (or printing it in log-only mode).
pub fn finish_phase(pb: &ProgressBar, msg: String) {
    if is_log_only() {
        println!("{}", msg);
    }
    pb.finish_with_message(msg);
}
