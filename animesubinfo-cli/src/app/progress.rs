//! Spinner shown on stderr while network work is in flight.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Awaits `work`, showing `message` next to a spinner when `use_spinner` is set.
pub(crate) async fn with_spinner<F, T>(use_spinner: bool, message: String, work: F) -> T
where
    F: Future<Output = T>,
{
    if !use_spinner {
        return work.await;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = work.await;
    spinner.finish_and_clear();
    output
}
