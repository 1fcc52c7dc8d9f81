//! Mix execution: drives the external tool and reports progress

pub mod progress;

use tracing::info;

use crate::error::{MixerError, MixerResult};
use crate::planner::MixPlan;
use crate::runner::{ProcessRunner, StreamSource};
use progress::{parse_progress_time, ProgressSink};

pub use progress::{ConsoleProgress, JsonProgress, NoOpProgress};

/// Executes one planned mix invocation at a time
pub struct Mixer {
    runner: ProcessRunner,
}

impl Mixer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            runner: ProcessRunner::new(program),
        }
    }

    /// Execute a planned mix, streaming progress into `sink`.
    ///
    /// Any pre-existing file at the output path is removed first — the tool
    /// must write a fresh container, never merge into one. On success the
    /// sink always receives a final 100, even when the tool printed no
    /// parseable progress updates (instant copies of short files). A
    /// non-zero exit is an error and the final update is not issued.
    pub async fn run(&self, plan: &MixPlan, sink: &mut dyn ProgressSink) -> MixerResult<()> {
        match std::fs::remove_file(&plan.output) {
            Ok(()) => info!(output = %plan.output, "removed pre-existing output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        // With no usable denominator the percentage is undefined, so
        // intermediate updates are skipped entirely.
        let total = plan.total_duration.filter(|d| !d.is_zero());

        info!(output = %plan.output, "starting mix");
        let status = self
            .runner
            .run(&plan.args, |line| {
                if line.source != StreamSource::Stderr {
                    return;
                }
                // Status updates are terminated with bare carriage returns,
                // so several can share one delivered line.
                for update in line.text.split('\r') {
                    let Some(elapsed) = parse_progress_time(update) else {
                        continue;
                    };
                    if let Some(total) = total {
                        sink.update(elapsed.as_secs_f64() / total.as_secs_f64() * 100.0);
                    }
                }
            })
            .await?;

        if !status.success() {
            return Err(MixerError::ToolFailed {
                status: status.to_string(),
            });
        }

        sink.update(100.0);
        info!(output = %plan.output, "mix complete");
        Ok(())
    }
}
