//! Quiz session state machine and the controller that persists its results.
//!
//! [`QuizSession`] is pure: it owns the pool and the current state and never
//! touches a store. [`SessionController`] drives a `QuizSession` and writes
//! statistics after each graded answer.

use crate::db::{LevelStore, Stores, WordStore};
use crate::error::{SessionError, StoreError};
use crate::models::{CustomLevel, Word};
use crate::quiz::{self, QuizDirection};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

/// Which words a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizMode {
    /// Every stored word.
    Standard,
    /// Words missed more often than answered correctly.
    ErrorsOnly,
    /// The existing words of one custom level.
    CustomLevel(CustomLevel),
}

impl QuizMode {
    pub fn direction(&self) -> QuizDirection {
        match self {
            QuizMode::CustomLevel(level) => level.level_type.into(),
            _ => QuizDirection::EnglishToArabic,
        }
    }

    pub fn level_name(&self) -> Option<&str> {
        match self {
            QuizMode::CustomLevel(level) => Some(&level.name),
            _ => None,
        }
    }

    pub fn build_pool(&self, words: &[Word]) -> Vec<Word> {
        match self {
            QuizMode::Standard => words.to_vec(),
            QuizMode::ErrorsOnly => error_pool(words),
            QuizMode::CustomLevel(level) => level.resolve_words(words),
        }
    }
}

pub fn error_pool(words: &[Word]) -> Vec<Word> {
    words.iter().filter(|w| w.has_errors()).cloned().collect()
}

/// Result of grading one answer against the question snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub word: Word,
    pub answer: String,
    pub correct: bool,
    pub expected: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Every word of the pool was answered correctly.
    PoolExhausted,
    /// An errors-only session found nothing to practice.
    NoErrors,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingAnswer {
        question: Word,
    },
    ShowingResult {
        graded: GradedAnswer,
    },
    Completed {
        outcome: CompletionOutcome,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingAnswer { .. } => "awaiting an answer",
            SessionState::ShowingResult { .. } => "showing a result",
            SessionState::Completed { .. } => "completed",
        }
    }
}

#[derive(Debug)]
pub struct QuizSession {
    mode: Option<QuizMode>,
    direction: QuizDirection,
    pool: Vec<Word>,
    state: SessionState,
    rng: StdRng,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            mode: None,
            direction: QuizDirection::default(),
            pool: Vec::new(),
            state: SessionState::Idle,
            rng,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Option<&QuizMode> {
        self.mode.as_ref()
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    /// Words not yet answered correctly in this session.
    pub fn pool(&self) -> &[Word] {
        &self.pool
    }

    pub fn current_question(&self) -> Option<&Word> {
        match &self.state {
            SessionState::AwaitingAnswer { question } => Some(question),
            SessionState::ShowingResult { graded } => Some(&graded.word),
            _ => None,
        }
    }

    /// Text shown to the user for the current question.
    pub fn prompt(&self) -> Option<&str> {
        self.current_question().map(|w| self.direction.prompt(w))
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Builds the pool for `mode` and selects the first question. Starting
    /// from any state abandons the previous session.
    pub fn start(&mut self, mode: QuizMode, words: &[Word]) -> Result<&SessionState, SessionError> {
        let pool = mode.build_pool(words);

        if pool.is_empty() {
            return match mode {
                QuizMode::Standard => Err(SessionError::NoWords),
                QuizMode::CustomLevel(_) => Err(SessionError::EmptyLevel),
                QuizMode::ErrorsOnly => {
                    self.direction = mode.direction();
                    self.mode = Some(mode);
                    self.pool.clear();
                    self.state = SessionState::Completed {
                        outcome: CompletionOutcome::NoErrors,
                    };
                    Ok(&self.state)
                }
            };
        }

        let Some(question) = quiz::select_question(&pool, &mut self.rng).cloned() else {
            return Err(SessionError::NoWords);
        };

        tracing::debug!(pool = pool.len(), level = ?mode.level_name(), "started quiz session");
        self.direction = mode.direction();
        self.mode = Some(mode);
        self.pool = pool;
        self.state = SessionState::AwaitingAnswer { question };
        Ok(&self.state)
    }

    /// Grades `text` against the question selected earlier. A correct answer
    /// removes the word from the pool.
    pub fn submit(&mut self, text: &str) -> Result<GradedAnswer, SessionError> {
        let SessionState::AwaitingAnswer { question } = &self.state else {
            return Err(self.invalid("submit an answer"));
        };

        let answer = text.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        let correct = self.direction.grade(question, answer);
        let graded = GradedAnswer {
            word: question.clone(),
            answer: answer.to_string(),
            correct,
            expected: self.direction.expected(question).to_string(),
        };

        if correct {
            self.pool.retain(|w| w.id != graded.word.id);
        }
        self.state = SessionState::ShowingResult {
            graded: graded.clone(),
        };
        Ok(graded)
    }

    pub fn next_question(&mut self) -> Result<&SessionState, SessionError> {
        if !matches!(self.state, SessionState::ShowingResult { .. }) {
            return Err(self.invalid("move to the next question"));
        }

        self.state = match quiz::select_question(&self.pool, &mut self.rng) {
            Some(question) => SessionState::AwaitingAnswer {
                question: question.clone(),
            },
            None => SessionState::Completed {
                outcome: CompletionOutcome::PoolExhausted,
            },
        };
        Ok(&self.state)
    }

    /// Replaces the pool's copy of a word with a fresher record. The question
    /// already on screen keeps its snapshot.
    pub fn refresh_word(&mut self, updated: &Word) {
        if let Some(slot) = self.pool.iter_mut().find(|w| w.id == updated.id) {
            *slot = updated.clone();
        }
    }

    /// Back to idle. Nothing is persisted here; every answer was already
    /// written when it was submitted.
    pub fn abandon(&mut self) {
        self.mode = None;
        self.pool.clear();
        self.state = SessionState::Idle;
    }
}

/// Statistics writes that failed on the last answer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingStats {
    word_id: Option<String>,
    level_name: Option<String>,
    is_correct: bool,
}

/// What the user sees after submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub graded: GradedAnswer,
    /// Set when the statistics could not be saved. Grading stands regardless.
    pub store_error: Option<StoreError>,
}

impl AnswerFeedback {
    pub fn correct(&self) -> bool {
        self.graded.correct
    }
}

pub struct SessionController {
    words: Arc<dyn WordStore>,
    levels: Arc<dyn LevelStore>,
    session: QuizSession,
    online: bool,
    last_error: Option<StoreError>,
    pending: Option<PendingStats>,
}

impl SessionController {
    pub fn new(stores: Stores) -> Self {
        Self::with_session(stores, QuizSession::new())
    }

    pub fn with_session(stores: Stores, session: QuizSession) -> Self {
        Self {
            words: stores.words,
            levels: stores.levels,
            session,
            online: true,
            last_error: None,
            pending: None,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    /// `false` after the store was last found unreachable.
    pub fn online(&self) -> bool {
        self.online
    }

    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(StoreError::user_message)
    }

    pub fn has_pending_stats(&self) -> bool {
        self.pending.is_some()
    }

    fn mark_online(&mut self) {
        self.online = true;
        self.last_error = None;
    }

    fn note_failure(&mut self, err: &StoreError) {
        if err.is_connectivity() {
            self.online = false;
        }
        self.last_error = Some(err.clone());
    }

    pub async fn start(&mut self, mode: QuizMode) -> Result<&SessionState, SessionError> {
        let words = match self.words.list().await {
            Ok(words) => {
                self.mark_online();
                words
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load words for quiz");
                self.note_failure(&e);
                return Err(e.into());
            }
        };

        self.pending = None;
        self.session.start(mode, &words)
    }

    /// Starts a custom-level session by level name.
    pub async fn start_level(&mut self, name: &str) -> Result<&SessionState, SessionError> {
        let levels = match self.levels.list().await {
            Ok(levels) => levels,
            Err(e) => {
                self.note_failure(&e);
                return Err(e.into());
            }
        };
        let Some(level) = levels.into_iter().find(|l| l.name == name) else {
            let err = StoreError::level_not_found(name);
            self.note_failure(&err);
            return Err(err.into());
        };
        self.start(QuizMode::CustomLevel(level)).await
    }

    /// Grades the answer, then records it for the word and, in a
    /// custom-level session, for the level.
    pub async fn submit_answer(&mut self, text: &str) -> Result<AnswerFeedback, SessionError> {
        let graded = self.session.submit(text)?;
        let pending = PendingStats {
            word_id: Some(graded.word.id.clone()),
            level_name: self
                .session
                .mode()
                .and_then(QuizMode::level_name)
                .map(str::to_string),
            is_correct: graded.correct,
        };

        let store_error = self.persist(pending).await;
        Ok(AnswerFeedback {
            graded,
            store_error,
        })
    }

    /// Re-sends the statistics that failed on the last answer. Only ever
    /// called on user request.
    pub async fn retry_stats(&mut self) -> Result<(), StoreError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        match self.persist(pending).await {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    async fn persist(&mut self, mut pending: PendingStats) -> Option<StoreError> {
        let mut failure: Option<StoreError> = None;

        if let Some(word_id) = pending.word_id.clone() {
            match quiz::record_attempt(self.words.as_ref(), &word_id, pending.is_correct).await {
                Ok(updated) => {
                    self.session.refresh_word(&updated);
                    pending.word_id = None;
                }
                Err(e) => failure = Some(e),
            }
        }

        if let Some(level_name) = pending.level_name.clone() {
            match quiz::record_level_attempt(self.levels.as_ref(), &level_name, pending.is_correct)
                .await
            {
                Ok(_) => pending.level_name = None,
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            None => {
                self.mark_online();
                self.pending = None;
                None
            }
            Some(e) => {
                self.note_failure(&e);
                self.pending = Some(pending);
                Some(e)
            }
        }
    }

    pub fn next_question(&mut self) -> Result<&SessionState, SessionError> {
        self.session.next_question()
    }

    /// Leaves the session. Failed statistics writes are dropped with it.
    pub fn go_home(&mut self) {
        self.pending = None;
        self.session.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LEVELS_KEY, MemoryBackend, WORDS_KEY, write_list};
    use crate::models::LevelType;

    fn word(id: &str, english: &str, arabic: &str, correct: u32, total: u32) -> Word {
        Word {
            id: id.to_string(),
            english: english.to_string(),
            arabic: arabic.to_string(),
            date_added: "2024-01-01".to_string(),
            correct_answers: correct,
            total_attempts: total,
        }
    }

    fn sample_words() -> Vec<Word> {
        vec![
            word("1", "book", "كتاب", 0, 0),
            word("2", "pen", "قلم", 1, 3),
            word("3", "door", "باب", 2, 2),
        ]
    }

    fn seeded() -> QuizSession {
        QuizSession::with_rng(StdRng::seed_from_u64(42))
    }

    fn answer_for(session: &QuizSession) -> String {
        let question = session.current_question().unwrap();
        session.direction().expected(question).to_string()
    }

    fn level(name: &str, ids: &[&str], level_type: LevelType) -> CustomLevel {
        CustomLevel {
            name: name.to_string(),
            word_ids: ids.iter().map(|s| s.to_string()).collect(),
            attempts: 5,
            correct_answers: 3,
            level_type,
        }
    }

    #[test]
    fn test_error_pool_definition() {
        let words = vec![
            word("1", "a", "أ", 0, 0),
            word("2", "b", "ب", 1, 3),
            word("3", "c", "ج", 2, 2),
            word("4", "d", "د", 0, 1),
        ];
        let ids: Vec<String> = error_pool(&words).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[test]
    fn test_standard_start_requires_words() {
        let mut session = seeded();
        assert_eq!(session.start(QuizMode::Standard, &[]), Err(SessionError::NoWords));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_errors_only_without_errors_completes() {
        let mut session = seeded();
        let words = vec![word("1", "a", "أ", 0, 0), word("3", "c", "ج", 2, 2)];
        let state = session.start(QuizMode::ErrorsOnly, &words).unwrap();
        assert_eq!(
            state,
            &SessionState::Completed {
                outcome: CompletionOutcome::NoErrors
            }
        );
    }

    #[test]
    fn test_errors_only_pool() {
        let mut session = seeded();
        session.start(QuizMode::ErrorsOnly, &sample_words()).unwrap();
        assert_eq!(session.pool().len(), 1);
        assert_eq!(session.current_question().unwrap().id, "2");
    }

    #[test]
    fn test_empty_custom_level_shows_no_question() {
        let mut session = seeded();
        let mode = QuizMode::CustomLevel(level("ghost", &["9"], LevelType::English));
        assert_eq!(session.start(mode, &sample_words()), Err(SessionError::EmptyLevel));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_custom_level_drops_dangling_ids() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let mode = QuizMode::CustomLevel(level("basic", &["1", "2"], LevelType::English));
        session.start(mode, &words).unwrap();
        assert_eq!(session.pool(), &words[..]);
    }

    #[test]
    fn test_repeated_level_ids_enter_pool_once() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0), word("2", "pen", "قلم", 0, 0)];
        let mode = QuizMode::CustomLevel(level("basic", &["1", "1", "2"], LevelType::English));
        session.start(mode, &words).unwrap();
        assert_eq!(session.pool().len(), 2);

        let answer = answer_for(&session);
        let graded = session.submit(&answer).unwrap();
        assert!(graded.correct);
        assert_eq!(session.pool().len(), 1);
    }

    #[test]
    fn test_single_repeated_id_completes_after_one_correct_answer() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let mode = QuizMode::CustomLevel(level("basic", &["1", "1"], LevelType::English));
        session.start(mode, &words).unwrap();
        assert_eq!(session.pool().len(), 1);

        session.submit("كتاب").unwrap();
        assert_eq!(session.pool().len(), 0);
        assert_eq!(
            session.next_question().unwrap(),
            &SessionState::Completed {
                outcome: CompletionOutcome::PoolExhausted
            }
        );
    }

    #[test]
    fn test_empty_answer_is_refused() {
        let mut session = seeded();
        session.start(QuizMode::Standard, &sample_words()).unwrap();
        let before = session.state().clone();

        assert_eq!(session.submit("   "), Err(SessionError::EmptyAnswer));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_pool_shrinks_only_on_correct_answers() {
        let mut session = seeded();
        session.start(QuizMode::Standard, &sample_words()).unwrap();

        let before = session.pool().len();
        let graded = session.submit("definitely wrong").unwrap();
        assert!(!graded.correct);
        assert_eq!(session.pool().len(), before);

        session.next_question().unwrap();
        let answer = answer_for(&session);
        let graded = session.submit(&answer).unwrap();
        assert!(graded.correct);
        assert_eq!(session.pool().len(), before - 1);
        assert!(!session.pool().iter().any(|w| w.id == graded.word.id));
    }

    #[test]
    fn test_session_completes_when_pool_empties() {
        let mut session = seeded();
        session.start(QuizMode::Standard, &sample_words()).unwrap();

        let mut rounds = 0;
        loop {
            let answer = answer_for(&session);
            session.submit(&answer).unwrap();
            rounds += 1;
            let state = session.next_question().unwrap();
            if matches!(state, SessionState::Completed { .. }) {
                break;
            }
            assert!(!session.pool().is_empty());
        }

        assert_eq!(rounds, 3);
        assert_eq!(
            session.state(),
            &SessionState::Completed {
                outcome: CompletionOutcome::PoolExhausted
            }
        );
    }

    #[test]
    fn test_single_word_scenario() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        session.start(QuizMode::Standard, &words).unwrap();
        assert_eq!(session.current_question().unwrap().id, "1");
        assert_eq!(session.prompt(), Some("book"));

        let graded = session.submit("كتاب").unwrap();
        assert!(graded.correct);
        assert!(session.pool().is_empty());

        let state = session.next_question().unwrap();
        assert_eq!(
            state,
            &SessionState::Completed {
                outcome: CompletionOutcome::PoolExhausted
            }
        );
    }

    #[test]
    fn test_wrong_answer_keeps_single_word() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        session.start(QuizMode::Standard, &words).unwrap();
        session.submit("قلم").unwrap();
        let state = session.next_question().unwrap();
        assert!(matches!(state, SessionState::AwaitingAnswer { question } if question.id == "1"));
    }

    #[test]
    fn test_invalid_transitions_leave_state() {
        let mut session = seeded();
        assert!(matches!(
            session.submit("x"),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.next_question(),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.start(QuizMode::Standard, &sample_words()).unwrap();
        assert!(matches!(
            session.next_question(),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(session.state(), SessionState::AwaitingAnswer { .. }));
    }

    #[test]
    fn test_completed_is_terminal_until_restart() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        session.start(QuizMode::Standard, &words).unwrap();
        session.submit("كتاب").unwrap();
        session.next_question().unwrap();

        assert!(session.submit("كتاب").is_err());
        assert!(session.next_question().is_err());

        session.start(QuizMode::Standard, &words).unwrap();
        assert!(matches!(session.state(), SessionState::AwaitingAnswer { .. }));
        assert_eq!(session.pool().len(), 1);
    }

    #[test]
    fn test_arabic_level_reverses_direction() {
        let mut session = seeded();
        let words = vec![word("1", "Book (noun)", "كتاب", 0, 0)];
        let mode = QuizMode::CustomLevel(level("rev", &["1"], LevelType::Arabic));
        session.start(mode, &words).unwrap();
        assert_eq!(session.prompt(), Some("كتاب"));
        assert!(session.submit("book").unwrap().correct);
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut session = seeded();
        session.start(QuizMode::Standard, &sample_words()).unwrap();
        session.abandon();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.pool().is_empty());
        assert!(session.mode().is_none());
    }

    #[test]
    fn test_grading_uses_selection_snapshot() {
        let mut session = seeded();
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        session.start(QuizMode::Standard, &words).unwrap();

        let mut changed = words[0].clone();
        changed.arabic = "مجلد".to_string();
        session.refresh_word(&changed);

        assert!(session.submit("كتاب").unwrap().correct);
    }

    async fn controller_with(words: &[Word], levels: &[CustomLevel]) -> (SessionController, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        write_list(backend.as_ref(), WORDS_KEY, words).await.unwrap();
        write_list(backend.as_ref(), LEVELS_KEY, levels).await.unwrap();
        let controller = SessionController::with_session(Stores::over(backend.clone()), seeded());
        (controller, backend)
    }

    #[tokio::test]
    async fn test_controller_single_word_scenario() {
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let (mut controller, backend) = controller_with(&words, &[]).await;
        let stores = Stores::over(backend);

        controller.start(QuizMode::Standard).await.unwrap();
        let feedback = controller.submit_answer("كتاب").await.unwrap();
        assert!(feedback.correct());
        assert!(feedback.store_error.is_none());

        let stored = &stores.words.list().await.unwrap()[0];
        assert_eq!(stored.total_attempts, 1);
        assert_eq!(stored.correct_answers, 1);
        assert!(controller.session().pool().is_empty());

        let state = controller.next_question().unwrap();
        assert!(matches!(state, SessionState::Completed { .. }));
    }

    #[tokio::test]
    async fn test_controller_custom_level_scenario() {
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let levels = vec![level("basic", &["1", "2"], LevelType::English)];
        let (mut controller, backend) = controller_with(&words, &levels).await;
        let stores = Stores::over(backend);

        controller.start_level("basic").await.unwrap();
        let ids: Vec<&str> = controller.session().pool().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        controller.submit_answer("wrong").await.unwrap();
        let stored = &stores.levels.list().await.unwrap()[0];
        assert_eq!(stored.attempts, 6);
        assert_eq!(stored.correct_answers, 3);
    }

    #[tokio::test]
    async fn test_controller_unknown_level() {
        let (mut controller, _) = controller_with(&sample_words(), &[]).await;
        let result = controller.start_level("missing").await;
        assert!(matches!(
            result,
            Err(SessionError::Store(StoreError::NotFound { .. }))
        ));
        assert!(controller.online());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_block_grading() {
        let words = vec![word("1", "book", "كتاب", 0, 0), word("2", "pen", "قلم", 0, 0)];
        let (mut controller, backend) = controller_with(&words, &[]).await;
        controller.start(QuizMode::Standard).await.unwrap();

        backend.set_unavailable(true);
        let answer = answer_for(controller.session());
        let feedback = controller.submit_answer(&answer).await.unwrap();

        assert!(feedback.correct());
        assert!(matches!(feedback.store_error, Some(StoreError::Unavailable(_))));
        assert!(!controller.online());
        assert!(controller.error_message().is_some());
        assert!(controller.has_pending_stats());
        assert_eq!(controller.session().pool().len(), 1);
        assert!(matches!(controller.state(), SessionState::ShowingResult { .. }));

        backend.set_unavailable(false);
        controller.retry_stats().await.unwrap();
        assert!(controller.online());
        assert!(!controller.has_pending_stats());

        let stores = Stores::over(backend);
        let total: u32 = stores
            .words
            .list()
            .await
            .unwrap()
            .iter()
            .map(|w| w.total_attempts)
            .sum();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_deleted_word_reports_not_found() {
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let (mut controller, backend) = controller_with(&words, &[]).await;
        controller.start(QuizMode::Standard).await.unwrap();

        Stores::over(backend).words.delete("1").await.unwrap();
        let feedback = controller.submit_answer("كتاب").await.unwrap();

        assert!(feedback.correct());
        assert!(matches!(feedback.store_error, Some(StoreError::NotFound { .. })));
        assert!(controller.online());
    }

    #[tokio::test]
    async fn test_start_failure_leaves_session_idle() {
        let (mut controller, backend) = controller_with(&sample_words(), &[]).await;
        backend.set_unavailable(true);
        let result = controller.start(QuizMode::Standard).await;
        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(controller.state(), &SessionState::Idle);
        assert!(!controller.online());
    }

    #[tokio::test]
    async fn test_go_home_drops_pending_stats() {
        let (mut controller, backend) = controller_with(&sample_words(), &[]).await;
        controller.start(QuizMode::Standard).await.unwrap();
        backend.set_unavailable(true);
        controller.submit_answer("nope").await.unwrap();
        assert!(controller.has_pending_stats());

        controller.go_home();
        assert!(!controller.has_pending_stats());
        assert_eq!(controller.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_pool_copy_refreshed_after_wrong_answer() {
        let words = vec![word("1", "book", "كتاب", 0, 0)];
        let (mut controller, _) = controller_with(&words, &[]).await;
        controller.start(QuizMode::Standard).await.unwrap();
        controller.submit_answer("wrong").await.unwrap();
        assert_eq!(controller.session().pool()[0].total_attempts, 1);
    }
}
