use tracing::debug;

pub const STATUS_LOADING: &str = "Loading model...";
pub const STATUS_READY: &str = "Ready to classify!";
pub const STATUS_NOT_READY: &str = "Model still loading...";
pub const STATUS_CLASSIFYING: &str = "Classifying...";

/// Human-readable output channel for status and per-box results.
pub trait DisplaySink {
    /// Replace whatever is shown with `message`.
    fn status(&mut self, message: &str);

    /// Append one line below the current content.
    fn line(&mut self, message: &str);
}

/// Writes everything to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DisplaySink for ConsoleSink {
    fn status(&mut self, message: &str) {
        debug!(status = message);
        println!("{message}");
    }

    fn line(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Keeps the current status and the lines appended after it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    status: String,
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_status(&self) -> &str {
        &self.status
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl DisplaySink for Transcript {
    fn status(&mut self, message: &str) {
        self.status = message.to_string();
        self.lines.clear();
    }

    fn line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_replaces_previous_content() {
        let mut transcript = Transcript::new();
        transcript.status(STATUS_CLASSIFYING);
        transcript.line("Detected: 7 (confidence=0.990)");
        transcript.status(STATUS_NOT_READY);

        assert_eq!(transcript.current_status(), STATUS_NOT_READY);
        assert!(transcript.lines().is_empty());
    }
}
