//! Session state shared by the screen state machine

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::round_timer::RoundTimer;
use super::scoring::RoundStats;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    #[default]
    MainMenu,
    DifficultyMenu,
    CustomSettings,
    /// Round in progress
    Playing,
    /// Wrong-sort message over the paused round
    Dialog,
    /// Environmental-impact details for the last wrong sort
    Consequence,
    PauseMenu,
    GameOver,
}

impl Screen {
    /// Screens where a round is live and can be paused or saved
    pub fn is_in_round(&self) -> bool {
        matches!(self, Screen::Playing | Screen::Dialog | Screen::Consequence)
    }
}

/// Everything about the current round except the items and bins
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    pub screen: Screen,
    /// Screen to return to when the pause menu resumes
    pub pre_pause: Option<Screen>,
    pub score: u32,
    pub difficulty: Difficulty,
    /// Duration the round was configured with (seconds)
    pub duration_secs: f32,
    /// Duration actually used for the clock; differs only for older saves
    pub actual_duration_secs: f32,
    pub stats: RoundStats,
    pub timer: RoundTimer,
}

impl GameSession {
    /// Reset counters for a fresh round of `duration_secs`
    pub fn begin_round(&mut self, difficulty: Difficulty, duration_secs: f32) {
        self.difficulty = difficulty;
        self.score = 0;
        self.stats = RoundStats::default();
        self.duration_secs = duration_secs;
        self.actual_duration_secs = duration_secs;
        self.pre_pause = None;
        self.timer.start(duration_secs);
    }

    pub fn time_left(&self) -> f32 {
        self.timer.remaining_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_names_serialize_camel_case() {
        assert_eq!(serde_json::to_string(&Screen::PauseMenu).unwrap(), "\"pauseMenu\"");
        assert_eq!(
            serde_json::from_str::<Screen>("\"consequence\"").unwrap(),
            Screen::Consequence
        );
    }

    #[test]
    fn begin_round_resets_counters() {
        let mut session = GameSession {
            score: 12,
            stats: RoundStats {
                attempts: 5,
                successes: 3,
                missed: 1,
            },
            ..Default::default()
        };
        session.begin_round(Difficulty::Hard, 24.0);
        assert_eq!(session.score, 0);
        assert_eq!(session.stats, RoundStats::default());
        assert_eq!(session.time_left(), 24.0);
        assert_eq!(session.difficulty, Difficulty::Hard);
    }

    #[test]
    fn only_round_screens_are_pausable() {
        assert!(Screen::Dialog.is_in_round());
        assert!(!Screen::PauseMenu.is_in_round());
        assert!(!Screen::GameOver.is_in_round());
    }
}
