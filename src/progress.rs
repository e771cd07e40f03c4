use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indicatif::{HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Stderr spinner for the fetch/render stages. A hidden bar when disabled.
pub struct Progress {
    enabled: bool,
    start: Instant,
    stage: ProgressBar,
    requests: AtomicU64,
}

impl Progress {
    pub fn new(enabled: bool) -> Arc<Self> {
        let start = Instant::now();

        if !enabled {
            return Arc::new(Self {
                enabled: false,
                start,
                stage: ProgressBar::hidden(),
                requests: AtomicU64::new(0),
            });
        }

        let stage = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}  [{elapsed_precise}]") {
            stage.set_style(style);
        }
        stage.enable_steady_tick(Duration::from_millis(80));
        stage.set_message("starting");

        Arc::new(Self {
            enabled: true,
            start,
            stage,
            requests: AtomicU64::new(0),
        })
    }

    pub fn set_stage(&self, msg: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.stage.set_message(msg.into());
    }

    /// Marks the start of one topics request at `depth`.
    pub fn request(&self, depth: usize) {
        let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        self.set_stage(format!("fetching topics (depth {depth}, request {n})"));
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        self.stage.finish_and_clear();
        tracing::debug!(
            requests = self.requests(),
            elapsed = %HumanDuration(self.start.elapsed()),
            "done"
        );
    }
}
