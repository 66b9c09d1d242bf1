//! Spinner shown in the header while a question is being answered.

use std::time::Instant;

/// Braille frames, one per tick.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Animated busy indicator.
#[derive(Debug, Clone)]
pub struct Spinner {
    start_time: Instant,
    label: String,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Spinner for an in-flight model call.
    pub fn thinking() -> Self {
        Self::new("Thinking")
    }

    /// Returns the current frame of the animation.
    pub fn frame(&self) -> &'static str {
        let frame_index = (self.start_time.elapsed().as_millis() / FRAME_DURATION_MS) as usize;
        FRAMES[frame_index % FRAMES.len()]
    }

    /// Frame, label, elapsed seconds and the cancel hint.
    pub fn display(&self) -> String {
        format!(
            "{} {} {}s (Esc to cancel)",
            self.frame(),
            self.label,
            self.start_time.elapsed().as_secs()
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_thinking() {
        let spinner = Spinner::thinking();
        assert_eq!(spinner.label(), "Thinking");
        assert!(FRAMES.contains(&spinner.frame()));
    }

    #[test]
    fn test_spinner_display_mentions_cancel() {
        let display = Spinner::thinking().display();
        assert!(display.contains("Thinking"));
        assert!(display.ends_with("(Esc to cancel)"));
    }
}
