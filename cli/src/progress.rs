use std::time::{Duration, Instant};

use framecast_core::api::TaskSnapshot;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner showing the latest status of one task.
///
/// Hidden when stderr is not a terminal or when output is JSON.
pub struct TaskSpinner {
    bar: ProgressBar,
    started: Instant,
}

impl TaskSpinner {
    pub fn new(task_id: &str, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(format!("{task_id} submitted"));
        Self {
            bar,
            started: Instant::now(),
        }
    }

    pub fn update(&self, snapshot: &TaskSnapshot) {
        self.bar
            .set_message(format!("{} {}", snapshot.id, snapshot.status));
    }

    pub fn finish(&self, snapshot: &TaskSnapshot) {
        self.bar.finish_with_message(format!(
            "{} {} in {}s",
            snapshot.id,
            snapshot.status,
            self.started.elapsed().as_secs()
        ));
    }

    pub fn abandon(&self, reason: &str) {
        self.bar.abandon_with_message(reason.to_string());
    }
}
