//! Score tracker
//!
//! Every change is pushed to the display right away.

use serde::{Deserialize, Serialize};

/// Whatever shows the score (HUD text, console, ...)
pub trait ScoreDisplay {
    fn set_score_text(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    value: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Add `points` and notify the display with the new total
    pub fn add(&mut self, points: u32, display: &mut dyn ScoreDisplay) -> u32 {
        self.value = self.value.saturating_add(points);
        display.set_score_text(&self.value.to_string());
        self.value
    }

    /// Back to zero, display notified
    pub fn reset(&mut self, display: &mut dyn ScoreDisplay) {
        self.value = 0;
        display.set_score_text("0");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Hud {
        shown: Vec<String>,
    }

    impl ScoreDisplay for Hud {
        fn set_score_text(&mut self, text: &str) {
            self.shown.push(text.to_string());
        }
    }

    #[test]
    fn test_add_syncs_display() {
        let mut hud = Hud::default();
        let mut score = ScoreTracker::new();

        assert_eq!(score.add(10, &mut hud), 10);
        assert_eq!(score.add(10, &mut hud), 20);
        assert_eq!(hud.shown, vec!["10", "20"]);
    }

    #[test]
    fn test_reset_syncs_display() {
        let mut hud = Hud::default();
        let mut score = ScoreTracker::new();
        score.add(30, &mut hud);

        score.reset(&mut hud);
        assert_eq!(score.value(), 0);
        assert_eq!(hud.shown.last().map(String::as_str), Some("0"));
    }

    #[test]
    fn test_add_saturates() {
        let mut hud = Hud::default();
        let mut score = ScoreTracker { value: u32::MAX - 5 };
        assert_eq!(score.add(10, &mut hud), u32::MAX);
    }
}
