/// Loading indicator: an animated spinner that turns into an error display
/// when a load fails
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

const SPINNER_FRAMES: &[char] = &['|', '/', '-', '\\'];

#[derive(Debug, Clone, PartialEq)]
enum IndicatorState {
    Loading { percent: Option<u8> },
    Failed { message: String },
}

pub struct LoadIndicator {
    state: IndicatorState,
    frame: usize,
}

impl LoadIndicator {
    pub fn new() -> Self {
        Self {
            state: IndicatorState::Loading { percent: None },
            frame: 0,
        }
    }

    /// Advance the spinner animation one frame. Stops once failed.
    pub fn tick(&mut self) {
        if matches!(self.state, IndicatorState::Loading { .. }) {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Report load progress. The percentage is only shown when the total
    /// size is known.
    pub fn set_progress(&mut self, loaded: u64, total: Option<u64>) {
        if let IndicatorState::Loading { ref mut percent } = self.state {
            *percent = total
                .filter(|t| *t > 0)
                .map(|t| ((loaded as f64 / t as f64) * 100.0).min(100.0) as u8);
        }
    }

    /// Switch to the error display. The spinner stops and the indicator
    /// stays in this state for the rest of the viewer's lifetime.
    pub fn fail(&mut self, message: String) {
        self.state = IndicatorState::Failed { message };
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, IndicatorState::Failed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            IndicatorState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Draw the indicator centered on a surface of `width` x `height` cells.
    pub fn draw<W: Write>(&self, writer: &mut W, width: u16, height: u16) -> std::io::Result<()> {
        let row = height / 2;

        let (color, text) = match &self.state {
            IndicatorState::Loading { percent } => {
                let spinner = SPINNER_FRAMES[self.frame];
                let text = match percent {
                    Some(p) => format!("{} loading {:3}%", spinner, p),
                    None => format!("{} loading", spinner),
                };
                (Color::White, text)
            }
            IndicatorState::Failed { message } => (Color::Red, format!("x load failed: {}", message)),
        };

        let col = (width / 2).saturating_sub(text.len() as u16 / 2);

        writer.queue(cursor::MoveTo(col, row))?;
        writer.queue(SetForegroundColor(color))?;
        writer.queue(Print(text))?;
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Default for LoadIndicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_advances_while_loading() {
        let mut indicator = LoadIndicator::new();
        indicator.tick();
        assert_eq!(indicator.frame, 1);
    }

    #[test]
    fn test_progress_needs_known_total() {
        let mut indicator = LoadIndicator::new();

        indicator.set_progress(50, None);
        assert_eq!(indicator.state, IndicatorState::Loading { percent: None });

        indicator.set_progress(50, Some(200));
        assert_eq!(
            indicator.state,
            IndicatorState::Loading { percent: Some(25) }
        );
    }

    #[test]
    fn test_failure_stops_the_animation() {
        let mut indicator = LoadIndicator::new();
        indicator.fail("file missing".to_string());

        let frame = indicator.frame;
        indicator.tick();
        assert_eq!(indicator.frame, frame);
        assert!(indicator.is_failed());
        assert_eq!(indicator.error_message(), Some("file missing"));
    }

    #[test]
    fn test_failure_ignores_late_progress() {
        let mut indicator = LoadIndicator::new();
        indicator.fail("boom".to_string());
        indicator.set_progress(10, Some(10));
        assert!(indicator.is_failed());
    }

    #[test]
    fn test_draw_writes_ansi() {
        let mut indicator = LoadIndicator::new();
        indicator.set_progress(5, Some(10));

        let mut buffer = Vec::new();
        indicator.draw(&mut buffer, 80, 24).unwrap();
        let text = String::from_utf8_lossy(&buffer);
        assert!(text.contains("loading"));
        assert!(text.contains("50"));
    }
}
