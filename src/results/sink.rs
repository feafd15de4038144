use crate::error::Result;
use crate::output::{render_end, render_result};
use crate::results::decoder::TranscriptionResult;
use crate::session::ReceiveEnd;
use std::io::{self, Write};

/// Pluggable consumer of decoded results.
/// Owned by the receive flow for the lifetime of a session.
pub trait ResultSink: Send + 'static {
    /// Handle one decoded message. Called in arrival order.
    fn handle(&mut self, result: &TranscriptionResult) -> Result<()>;

    /// Called once when the receive flow ends, with the reason it ended.
    fn finish(&mut self, _end: &ReceiveEnd) {}

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Keeps every result; used by tests and library callers.
#[derive(Debug, Default)]
pub struct CollectorSink {
    results: Vec<TranscriptionResult>,
    end: Option<ReceiveEnd>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[TranscriptionResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<TranscriptionResult> {
        self.results
    }

    /// How the receive flow ended, once it has.
    pub fn end(&self) -> Option<&ReceiveEnd> {
        self.end.as_ref()
    }
}

impl ResultSink for CollectorSink {
    fn handle(&mut self, result: &TranscriptionResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn finish(&mut self, end: &ReceiveEnd) {
        self.end = Some(end.clone());
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Renders results to stdout as they arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl ResultSink for ConsoleSink {
    fn handle(&mut self, result: &TranscriptionResult) -> Result<()> {
        let mut stdout = io::stdout().lock();
        render_result(&mut stdout, result, self.color)?;
        stdout.flush()?;
        Ok(())
    }

    fn finish(&mut self, end: &ReceiveEnd) {
        let mut stderr = io::stderr().lock();
        if let Err(e) = render_end(&mut stderr, end, self.color) {
            log::warn!("Failed to render receive end: {}", e);
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
