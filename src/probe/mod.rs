//! Probing inputs through the external tool's report-only mode

pub mod parser;

use tracing::info;

use crate::error::MixerResult;
use crate::model::TrackGroup;
use crate::runner::{ProcessRunner, StreamSource};

pub use parser::ProbeParser;

/// Probes a set of input files in one external-tool invocation
pub struct TrackProber {
    runner: ProcessRunner,
}

impl TrackProber {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            runner: ProcessRunner::new(program),
        }
    }

    /// Report-only argument list: `-i <path>` per input, no output file.
    pub fn probe_args<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
        inputs
            .iter()
            .flat_map(|path| ["-i".to_string(), path.as_ref().to_string()])
            .collect()
    }

    /// Probe all inputs at once and return one [`TrackGroup`] per input, in
    /// input order.
    ///
    /// Diagnostics arrive on stderr by tool convention; stdout lines are
    /// dropped. The invocation exits non-zero because no output file is
    /// requested, so the exit status is deliberately not checked — only a
    /// launch failure propagates.
    pub async fn probe(&self, inputs: &[String]) -> MixerResult<Vec<TrackGroup>> {
        info!(inputs = inputs.len(), "probing inputs");

        let mut parser = ProbeParser::new(inputs);
        let args = Self::probe_args(inputs);
        self.runner
            .run(&args, |line| {
                if line.source == StreamSource::Stderr {
                    parser.feed(&line.text);
                }
            })
            .await?;

        let groups = parser.finish();
        info!(groups = groups.len(), "probe complete");
        Ok(groups)
    }
}
