use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::rc::Rc;
use std::time::{Duration, UNIX_EPOCH};
use uuid::Uuid;

use super::clock::Clock;
use super::settings::Settings;
use crate::model::{
    normalize_player_name, Difficulty, LeaderboardEntry, Notice, RoundOutcome, Sequence,
    SessionCommand, SessionEvent, SessionPhase, TimerState,
};

pub const POINTS_PER_ROUND: u32 = 10;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub player_name: String,
    pub display_duration: Duration,
    pub digits: u32,
    pub seed: Option<u64>,
    pub debug_mode: bool,
}

impl SessionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            difficulty: settings.difficulty,
            player_name: settings.effective_player_name(),
            display_duration: settings.display_duration,
            digits: settings.digits,
            seed: Settings::seed_from_env(),
            debug_mode: Settings::is_debug_mode(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// State machine for one player's game: idle, showing a sequence, awaiting the
/// typed answer, and back. Every transition records the view effects it causes;
/// nothing here touches widgets or timers directly.
pub struct GameSession {
    phase: SessionPhase,
    difficulty: Difficulty,
    sequence: Sequence,
    score: u32,
    timer_state: Option<TimerState>,
    player_name: String,
    round: u64,
    session_id: Uuid,
    display_duration: Duration,
    digits: u32,
    rng: StdRng,
    clock: Rc<dyn Clock>,
    debug_mode: bool,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(config: SessionConfig, clock: Rc<dyn Clock>) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "session", "Sequence seed: {}", seed);
        Self {
            phase: SessionPhase::Idle,
            difficulty: config.difficulty,
            sequence: Sequence::default(),
            score: 0,
            timer_state: None,
            player_name: normalize_player_name(&config.player_name),
            round: 0,
            session_id: Uuid::new_v4(),
            display_duration: config.display_duration,
            digits: config.digits,
            rng: StdRng::seed_from_u64(seed),
            clock,
            debug_mode: config.debug_mode,
            events: Vec::new(),
        }
    }

    /// Single entry point: applies the command and returns the resulting view effects.
    pub fn handle(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        trace!(target: "session", "Handling command: {:?} in {:?}", command, self.phase);
        match command {
            SessionCommand::Start(difficulty) => self.start(difficulty),
            SessionCommand::HideSequence { round } => self.hide_sequence(round),
            SessionCommand::Submit(answers) => {
                self.submit(&answers);
            }
            SessionCommand::ContinueRound => self.continue_round(),
            SessionCommand::ChangeDifficulty(difficulty) => self.change_difficulty(difficulty),
            SessionCommand::SetPlayerName(name) => self.set_player_name(&name),
        }
        self.take_events()
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn start(&mut self, difficulty: Difficulty) {
        if self.phase != SessionPhase::Idle {
            debug!(target: "session", "Ignoring start while {:?}", self.phase);
            self.events.push(SessionEvent::StartEnabled(false));
            return;
        }
        self.set_difficulty(difficulty);
        self.session_id = Uuid::new_v4();
        let timer_state = TimerState::started_at(self.clock.now());
        info!(
            target: "session",
            "New session {}; player: {:?}; difficulty: {}",
            self.session_id, self.player_name, self.difficulty
        );
        self.events.push(SessionEvent::StartEnabled(false));
        self.events
            .push(SessionEvent::TimerStateChanged(timer_state.clone()));
        self.timer_state = Some(timer_state);
        self.begin_round();
    }

    /// Fired by the hide timer. Stale or repeated fires do nothing.
    pub fn hide_sequence(&mut self, round: u64) {
        if self.phase != SessionPhase::Showing || round != self.round {
            trace!(
                target: "session",
                "Ignoring hide for round {} (current round {}, {:?})",
                round, self.round, self.phase
            );
            return;
        }
        self.set_phase(SessionPhase::Awaiting);
        self.events.push(SessionEvent::ClearSequence);
    }

    /// Checks the typed answers. Returns `None` when no answer is expected.
    pub fn submit<S: AsRef<str>>(&mut self, answers: &[S]) -> Option<RoundOutcome> {
        if self.phase != SessionPhase::Awaiting {
            debug!(target: "session", "Ignoring submit while {:?}", self.phase);
            return None;
        }
        let outcome = self.sequence.check(answers);
        debug!(target: "session", "Round {} outcome: {:?}", self.round, outcome);
        match outcome {
            RoundOutcome::Correct => {
                self.score = self.score.saturating_add(POINTS_PER_ROUND);
                self.events.push(SessionEvent::ScoreChanged(self.score));
                self.events.push(SessionEvent::Notice(Notice::Correct));
                self.set_phase(SessionPhase::Advancing);
            }
            RoundOutcome::Incorrect => {
                self.events.push(SessionEvent::Notice(Notice::Incorrect));
                self.game_over();
            }
        }
        Some(outcome)
    }

    /// Starts the next round once the correct notice has been acknowledged.
    pub fn continue_round(&mut self) {
        if self.phase != SessionPhase::Advancing {
            trace!(target: "session", "Ignoring continue while {:?}", self.phase);
            return;
        }
        self.begin_round();
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        if self.phase != SessionPhase::Idle {
            debug!(target: "session", "Ignoring difficulty change while {:?}", self.phase);
            return;
        }
        self.set_difficulty(difficulty);
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = normalize_player_name(name);
        trace!(target: "session", "Player name: {:?}", self.player_name);
    }

    /// Picks up display duration and digit count; difficulty and name are
    /// driven by their own commands.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.display_duration = settings.display_duration;
        self.digits = settings.digits;
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.events.push(SessionEvent::InputFieldsChanged {
            difficulty,
            count: difficulty.field_count(),
        });
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
        self.events.push(SessionEvent::PhaseChanged(phase));
    }

    /// Shows a fresh sequence. The session timer keeps running across rounds.
    fn begin_round(&mut self) {
        self.round += 1;
        self.sequence =
            Sequence::generate(&mut self.rng, self.difficulty.field_count(), self.digits);
        if self.debug_mode {
            debug!(target: "session", "Round {} sequence: {}", self.round, self.sequence);
        }
        self.events
            .push(SessionEvent::DisplaySequence(self.sequence.clone()));
        self.set_phase(SessionPhase::Showing);
        self.events.push(SessionEvent::ScheduleHide {
            round: self.round,
            after: self.display_duration,
        });
    }

    fn game_over(&mut self) {
        let now = self.clock.now();
        let timer_state = self
            .timer_state
            .take()
            .unwrap_or_else(|| TimerState::started_at(now))
            .ended(now);
        let entry = LeaderboardEntry {
            player_name: self.player_name.clone(),
            score: self.score,
            elapsed: timer_state.elapsed_at(now),
            difficulty: self.difficulty,
            timestamp: now
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or_default(),
            session_id: self.session_id,
        };
        info!(
            target: "session",
            "Game over for {:?}: score {} in {}",
            entry.player_name,
            entry.score,
            entry.time_label()
        );
        self.events
            .push(SessionEvent::TimerStateChanged(timer_state));
        self.events.push(SessionEvent::LeaderboardUpdated(entry));
        self.events.push(SessionEvent::Notice(Notice::GameOver));

        self.score = 0;
        self.sequence = Sequence::default();
        self.events.push(SessionEvent::ScoreChanged(0));
        self.set_phase(SessionPhase::Idle);
        self.events.push(SessionEvent::StartEnabled(true));
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn timer_state(&self) -> Option<&TimerState> {
        self.timer_state.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::tests::UsingLogger;
    use serial_test::serial;
    use test_context::test_context;

    fn new_session(seed: u64) -> (GameSession, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::default());
        let config = SessionConfig {
            difficulty: Difficulty::Medium,
            player_name: "Ada".to_string(),
            display_duration: Duration::from_millis(5000),
            digits: 2,
            seed: Some(seed),
            debug_mode: false,
        };
        (GameSession::new(config, clock.clone()), clock)
    }

    fn correct_answers(session: &GameSession) -> Vec<String> {
        session
            .sequence()
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    fn wrong_answers(session: &GameSession) -> Vec<String> {
        let mut answers = correct_answers(session);
        let last = session.sequence().values()[answers.len() - 1];
        answers.pop();
        answers.push(((last + 1) % 100).to_string());
        answers
    }

    /// Start (or advance) and let the hide timer fire.
    fn reveal_and_hide(session: &mut GameSession) {
        let round = session.round();
        session.handle(SessionCommand::HideSequence { round });
        assert_eq!(session.phase(), SessionPhase::Awaiting);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_start_generates_sequence_per_difficulty(_: &mut UsingLogger) {
        for (difficulty, expected_len) in [
            (Difficulty::Easy, 5),
            (Difficulty::Medium, 6),
            (Difficulty::Hard, 7),
        ] {
            let (mut session, _) = new_session(1);
            let events = session.handle(SessionCommand::Start(difficulty));

            assert_eq!(session.phase(), SessionPhase::Showing);
            assert_eq!(session.sequence().len(), expected_len);
            assert!(session.sequence().values().iter().all(|v| *v < 100));
            assert!(events.contains(&SessionEvent::DisplaySequence(session.sequence().clone())));
            assert!(events.contains(&SessionEvent::InputFieldsChanged {
                difficulty,
                count: expected_len,
            }));
            assert!(events.contains(&SessionEvent::StartEnabled(false)));
            assert!(events.contains(&SessionEvent::ScheduleHide {
                round: 1,
                after: Duration::from_millis(5000),
            }));
        }
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let (mut session, _) = new_session(2);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        let sequence = session.sequence().clone();

        let events = session.handle(SessionCommand::Start(Difficulty::Hard));
        assert_eq!(events, vec![SessionEvent::StartEnabled(false)]);
        assert_eq!(session.sequence(), &sequence);
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn test_hide_moves_to_awaiting_once() {
        let (mut session, _) = new_session(3);
        session.handle(SessionCommand::Start(Difficulty::Easy));

        let events = session.handle(SessionCommand::HideSequence { round: 1 });
        assert_eq!(
            events,
            vec![
                SessionEvent::PhaseChanged(SessionPhase::Awaiting),
                SessionEvent::ClearSequence
            ]
        );

        let events = session.handle(SessionCommand::HideSequence { round: 1 });
        assert!(events.is_empty());
        assert_eq!(session.phase(), SessionPhase::Awaiting);
    }

    #[test]
    fn test_stale_hide_is_ignored() {
        let (mut session, _) = new_session(4);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        reveal_and_hide(&mut session);
        let answers = correct_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        session.handle(SessionCommand::ContinueRound);
        assert_eq!(session.round(), 2);

        let events = session.handle(SessionCommand::HideSequence { round: 1 });
        assert!(events.is_empty());
        assert_eq!(session.phase(), SessionPhase::Showing);
    }

    #[test]
    fn test_hide_while_idle_is_ignored() {
        let (mut session, _) = new_session(5);
        assert!(session
            .handle(SessionCommand::HideSequence { round: 0 })
            .is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_submit_before_hide_is_ignored() {
        let (mut session, _) = new_session(6);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        let answers = correct_answers(&session);

        assert_eq!(session.submit(&answers), None);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Showing);
    }

    #[test]
    fn test_submit_while_idle_is_ignored() {
        let (mut session, _) = new_session(18);
        assert_eq!(session.submit(&["1", "2", "3", "4", "5", "6"]), None);
        assert!(session.take_events().is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.handle(SessionCommand::Start(Difficulty::Easy));
        reveal_and_hide(&mut session);
        let answers = correct_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        session.handle(SessionCommand::ContinueRound);
        reveal_and_hide(&mut session);
        let answers = wrong_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        assert_eq!(session.phase(), SessionPhase::Idle);

        let answers = correct_answers(&session);
        assert!(session.handle(SessionCommand::Submit(answers)).is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_correct_submit_scores_and_waits_for_acknowledgement() {
        let (mut session, _) = new_session(7);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        reveal_and_hide(&mut session);
        let answers = correct_answers(&session);

        assert_eq!(session.submit(&answers), Some(RoundOutcome::Correct));
        let events = session.take_events();
        assert_eq!(session.score(), 10);
        assert_eq!(session.phase(), SessionPhase::Advancing);
        assert_eq!(session.round(), 1);
        assert_eq!(
            events,
            vec![
                SessionEvent::ScoreChanged(10),
                SessionEvent::Notice(Notice::Correct),
                SessionEvent::PhaseChanged(SessionPhase::Advancing),
            ]
        );

        let events = session.handle(SessionCommand::ContinueRound);
        assert_eq!(session.phase(), SessionPhase::Showing);
        assert_eq!(session.round(), 2);
        assert_eq!(session.sequence().len(), 5);
        assert_eq!(
            events[0],
            SessionEvent::DisplaySequence(session.sequence().clone())
        );
        assert!(events.contains(&SessionEvent::ScheduleHide {
            round: 2,
            after: Duration::from_millis(5000),
        }));
    }

    #[test]
    fn test_continue_outside_advancing_is_ignored() {
        let (mut session, _) = new_session(17);
        assert!(session.handle(SessionCommand::ContinueRound).is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.handle(SessionCommand::Start(Difficulty::Easy));
        assert!(session.handle(SessionCommand::ContinueRound).is_empty());
        reveal_and_hide(&mut session);
        assert!(session.handle(SessionCommand::ContinueRound).is_empty());
        assert_eq!(session.phase(), SessionPhase::Awaiting);
        assert_eq!(session.round(), 1);

        let answers = correct_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        session.handle(SessionCommand::ContinueRound);
        assert!(session.handle(SessionCommand::ContinueRound).is_empty());
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn test_mismatch_in_any_position_is_incorrect() {
        let (mut session, _) = new_session(8);
        session.handle(SessionCommand::Start(Difficulty::Hard));
        reveal_and_hide(&mut session);
        let mut answers = correct_answers(&session);
        let first = session.sequence().values()[0];
        answers[0] = ((first + 50) % 100).to_string();

        assert_eq!(session.submit(&answers), Some(RoundOutcome::Incorrect));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_medium_with_non_numeric_field_is_incorrect(_: &mut UsingLogger) {
        let (mut session, _) = new_session(9);
        session.handle(SessionCommand::Start(Difficulty::Medium));
        reveal_and_hide(&mut session);
        let mut answers = correct_answers(&session);
        answers[3] = "abc".to_string();

        let events = session.handle(SessionCommand::Submit(answers));
        assert!(events.contains(&SessionEvent::Notice(Notice::Incorrect)));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_incorrect_records_entry_and_resets() {
        let (mut session, clock) = new_session(10);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        reveal_and_hide(&mut session);
        let answers = correct_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        session.handle(SessionCommand::ContinueRound);
        reveal_and_hide(&mut session);
        clock.advance(Duration::from_secs(9));

        let answers = wrong_answers(&session);
        let events = session.handle(SessionCommand::Submit(answers));

        let entry = events
            .iter()
            .find_map(|event| match event {
                SessionEvent::LeaderboardUpdated(entry) => Some(entry.clone()),
                _ => None,
            })
            .expect("game over should publish a leaderboard entry");
        assert_eq!(entry.player_name, "Ada");
        assert_eq!(entry.score, 10);
        assert_eq!(entry.elapsed_seconds(), 9);
        assert_eq!(entry.difficulty, Difficulty::Easy);

        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.timer_state().is_none());
        let tail: Vec<_> = events.iter().rev().take(4).rev().cloned().collect();
        assert_eq!(
            tail,
            vec![
                SessionEvent::Notice(Notice::GameOver),
                SessionEvent::ScoreChanged(0),
                SessionEvent::PhaseChanged(SessionPhase::Idle),
                SessionEvent::StartEnabled(true),
            ]
        );
    }

    #[test]
    fn test_score_accumulates_and_elapsed_spans_session() {
        let (mut session, clock) = new_session(11);
        session.handle(SessionCommand::Start(Difficulty::Medium));

        for n in 1..=4u32 {
            clock.advance(Duration::from_secs(5));
            reveal_and_hide(&mut session);
            let answers = correct_answers(&session);
            session.handle(SessionCommand::Submit(answers));
            assert_eq!(session.score(), 10 * n);
            session.handle(SessionCommand::ContinueRound);
        }

        clock.advance(Duration::from_secs(5));
        reveal_and_hide(&mut session);
        let answers = wrong_answers(&session);
        let events = session.handle(SessionCommand::Submit(answers));
        let entry = events
            .into_iter()
            .find_map(|event| match event {
                SessionEvent::LeaderboardUpdated(entry) => Some(entry),
                _ => None,
            })
            .unwrap();

        assert_eq!(entry.score, 40);
        assert_eq!(entry.elapsed, Duration::from_secs(25));
    }

    #[test]
    fn test_new_session_restarts_timer_and_id() {
        let (mut session, clock) = new_session(12);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        let first_id = session.session_id();
        reveal_and_hide(&mut session);
        let answers = wrong_answers(&session);
        session.handle(SessionCommand::Submit(answers));

        clock.advance(Duration::from_secs(100));
        session.handle(SessionCommand::Start(Difficulty::Easy));
        assert_ne!(session.session_id(), first_id);
        assert_eq!(
            session.timer_state().map(|t| t.elapsed_at(clock.now())),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_change_difficulty_only_when_idle() {
        let (mut session, _) = new_session(13);
        let events = session.handle(SessionCommand::ChangeDifficulty(Difficulty::Hard));
        assert_eq!(
            events,
            vec![SessionEvent::InputFieldsChanged {
                difficulty: Difficulty::Hard,
                count: 7
            }]
        );

        session.handle(SessionCommand::Start(Difficulty::Easy));
        let events = session.handle(SessionCommand::ChangeDifficulty(Difficulty::Hard));
        assert!(events.is_empty());
        assert_eq!(session.difficulty(), Difficulty::Easy);

        reveal_and_hide(&mut session);
        let events = session.handle(SessionCommand::ChangeDifficulty(Difficulty::Hard));
        assert!(events.is_empty());
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.phase(), SessionPhase::Awaiting);

        let answers = correct_answers(&session);
        session.handle(SessionCommand::Submit(answers));
        assert_eq!(session.score(), 10);
        assert_eq!(session.sequence().len(), 5);
    }

    #[test]
    fn test_blank_player_name_defaults() {
        let (mut session, _) = new_session(14);
        session.handle(SessionCommand::SetPlayerName("   ".to_string()));
        assert_eq!(session.player_name(), "Player 1");
        session.handle(SessionCommand::SetPlayerName("Grace".to_string()));
        assert_eq!(session.player_name(), "Grace");
    }

    #[test]
    fn test_easy_scenario_end_to_end() {
        let (mut session, clock) = new_session(15);
        session.handle(SessionCommand::Start(Difficulty::Easy));
        assert_eq!(session.sequence().len(), 5);
        reveal_and_hide(&mut session);

        let answers = correct_answers(&session);
        assert_eq!(session.submit(&answers), Some(RoundOutcome::Correct));
        assert_eq!(session.score(), 10);
        session.handle(SessionCommand::ContinueRound);
        assert_eq!(session.sequence().len(), 5);

        reveal_and_hide(&mut session);
        clock.advance(Duration::from_millis(1200));
        let answers = wrong_answers(&session);
        assert_eq!(session.submit(&answers), Some(RoundOutcome::Incorrect));
        let entry = session
            .take_events()
            .into_iter()
            .find_map(|event| match event {
                SessionEvent::LeaderboardUpdated(entry) => Some(entry),
                _ => None,
            })
            .unwrap();
        assert_eq!(entry.score, 10);
        assert_eq!(entry.elapsed_seconds(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    #[serial]
    fn test_debug_flag_is_captured_in_config() {
        std::env::set_var("DEBUG", "1");
        let config = SessionConfig::from_settings(&Settings::default());
        std::env::remove_var("DEBUG");
        assert!(config.debug_mode);

        let session = GameSession::new(config, Rc::new(ManualClock::default()));
        assert!(session.debug_mode);

        let (session, _) = new_session(19);
        std::env::set_var("DEBUG", "1");
        assert!(!session.debug_mode);
        std::env::remove_var("DEBUG");
    }

    #[test]
    fn test_apply_settings_changes_next_round() {
        let (mut session, _) = new_session(16);
        let settings = Settings {
            display_duration: Duration::from_millis(800),
            digits: 1,
            ..Settings::default()
        };
        session.apply_settings(&settings);

        let events = session.handle(SessionCommand::Start(Difficulty::Hard));
        assert!(session.sequence().values().iter().all(|v| *v < 10));
        assert!(events.contains(&SessionEvent::ScheduleHide {
            round: 1,
            after: Duration::from_millis(800),
        }));
    }
}
