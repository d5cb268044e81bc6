//! Per-reader translation session: the working draft text, the AI assistant
//! state, and the trigger/reconcile wiring between them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::ai::{AiAssistantInterface, AssessmentRequest, AssessmentResult};
use crate::utils::sentence::{
    contains_clause_terminator, contains_sentence_terminator, ends_with_sentence_terminator,
};

use super::debounce::Debouncer;
use super::reconcile::reconcile;
use super::trigger::{evaluate, is_qualifying_keystroke, AssessmentConfig, TriggerDecision};

/// Snapshot of the assistant state exposed to the client.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantView {
    pub user_translation: String,
    pub ai_mode_enabled: bool,
    pub is_assessing: bool,
    pub score: u8,
    pub feedback: String,
    pub has_improved_translation: bool,
    pub improved_translation: Option<String>,
    pub alternatives: Vec<String>,
}

/// Result of an alternatives request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlternativesOutcome {
    /// The draft has no finished sentence yet; nothing was requested.
    Incomplete { message: String },
    /// The service produced nothing usable.
    Empty { message: String },
    Alternatives { alternatives: Vec<String> },
}

#[derive(Debug, Default)]
struct SessionState {
    user_translation: String,
    last_assessed_text: String,
    ai_mode_enabled: bool,
    is_assessing: bool,
    score: u8,
    feedback: String,
    improved_translation: Option<String>,
    alternatives: Vec<String>,
}

struct SessionInner {
    id: String,
    story_id: String,
    user_id: Option<String>,
    original_text: String,
    source_language: String,
    translation_language: String,
    config: AssessmentConfig,
    assistant: Arc<dyn AiAssistantInterface>,
    state: RwLock<SessionState>,
    debouncer: Mutex<Debouncer>,
    /// Sequence number of the most recently dispatched assessment. A response
    /// only lands if its sequence still matches.
    assessment_seq: AtomicU64,
}

/// One reader working on one story. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct TranslationSession {
    inner: Arc<SessionInner>,
}

impl TranslationSession {
    pub fn new(
        id: String,
        story_id: String,
        user_id: Option<String>,
        original_text: String,
        source_language: String,
        translation_language: String,
        config: AssessmentConfig,
        assistant: Arc<dyn AiAssistantInterface>,
    ) -> Self {
        let debounce = Duration::from_millis(config.debounce_ms);
        Self {
            inner: Arc::new(SessionInner {
                id,
                story_id,
                user_id,
                original_text,
                source_language,
                translation_language,
                config,
                assistant,
                state: RwLock::new(SessionState::default()),
                debouncer: Mutex::new(Debouncer::new(debounce)),
                assessment_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn story_id(&self) -> &str {
        &self.inner.story_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.inner.user_id.as_deref()
    }

    pub fn translation_language(&self) -> &str {
        &self.inner.translation_language
    }

    fn request_for(&self, text: &str) -> AssessmentRequest {
        AssessmentRequest {
            original_text: self.inner.original_text.clone(),
            user_translation: text.to_string(),
            source_language: self.inner.source_language.clone(),
            target_language: self.inner.translation_language.clone(),
        }
    }

    /// Record a keystroke-level text change. Clause-ending keystrokes open (or
    /// restart) the debounce window; everything else just updates the draft.
    pub async fn handle_text_change(&self, new_text: String) {
        let ai_mode_enabled = {
            let mut state = self.inner.state.write().await;
            state.user_translation = new_text.clone();
            state.ai_mode_enabled
        };

        if !ai_mode_enabled || new_text.trim().is_empty() {
            return;
        }
        if !is_qualifying_keystroke(&new_text) {
            return;
        }

        let session = self.clone();
        let mut debouncer = self.inner.debouncer.lock().await;
        debouncer.schedule(async move {
            session.run_gated_assessment(new_text).await;
        });
    }

    /// The debounced path: re-evaluate every gate against the state at fire
    /// time, then dispatch if they all pass.
    async fn run_gated_assessment(&self, text: String) {
        let decision = {
            let state = self.inner.state.read().await;
            evaluate(
                &text,
                &state.last_assessed_text,
                &self.inner.original_text,
                state.ai_mode_enabled,
                &self.inner.config,
            )
        };

        match decision {
            TriggerDecision::Assess => self.dispatch_assessment(text).await,
            TriggerDecision::Skip(reason) => {
                debug!("Skipping assessment for session {}: {:?}", self.inner.id, reason);
            }
        }
    }

    /// Manual refresh: assess the current draft immediately, bypassing the
    /// debounce and cadence gates.
    pub async fn force_assessment(&self) {
        let text = self.inner.state.read().await.user_translation.clone();
        if text.trim().is_empty() {
            return;
        }
        self.dispatch_assessment(text).await;
    }

    async fn dispatch_assessment(&self, text: String) {
        let seq = self.inner.assessment_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.inner.state.write().await;
            state.is_assessing = true;
            // Marked before the call resolves, so identical input is not retried.
            state.last_assessed_text = text.clone();
        }

        let request = self.request_for(&text);
        let result = match self.inner.assistant.assess_translation(&request).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Assessment call failed: {}", err);
                AssessmentResult::failure("Error assessing translation")
            }
        };

        // A newer dispatch supersedes this response.
        if self.inner.assessment_seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale assessment response for session {}", self.inner.id);
            return;
        }

        let view = reconcile(&result, &text, &self.inner.config);
        let mut state = self.inner.state.write().await;
        state.score = view.score;
        state.feedback = view.feedback;
        state.improved_translation = view.improved_translation;
        state.is_assessing = false;
    }

    /// Enable or disable AI mode. Enabling runs the one-time immediate check
    /// when the draft already holds a finished thought.
    pub async fn set_ai_mode(&self, enabled: bool) {
        let text = {
            let mut state = self.inner.state.write().await;
            state.ai_mode_enabled = enabled;
            state.user_translation.clone()
        };
        if !enabled {
            return;
        }

        let has_punctuation = contains_clause_terminator(&text);
        let has_complete_sentence = contains_sentence_terminator(&text);
        if !text.trim().is_empty() && (has_punctuation || has_complete_sentence) {
            self.inner.state.write().await.alternatives.clear();
            self.dispatch_assessment(text).await;
        }
    }

    /// Request alternative phrasings. Gated by a looser completeness check
    /// than the assessment path: any finished sentence qualifies.
    pub async fn generate_alternatives(&self) -> AlternativesOutcome {
        let text = self.inner.state.read().await.user_translation.clone();

        let ends_with_punctuation = ends_with_sentence_terminator(&text);
        let has_complete_sentence = contains_sentence_terminator(&text);
        if text.trim().is_empty() || (!ends_with_punctuation && !has_complete_sentence) {
            return AlternativesOutcome::Incomplete {
                message: "Please complete at least one full sentence ending with a period, \
                          question mark, or exclamation point before requesting alternatives."
                    .to_string(),
            };
        }

        let request = self.request_for(&text);
        let mut alternatives = match self.inner.assistant.alternative_translations(&request).await {
            Ok(list) => list,
            Err(err) => {
                warn!("Alternatives call failed: {}", err);
                Vec::new()
            }
        };
        alternatives.truncate(self.inner.config.max_alternatives);

        self.inner.state.write().await.alternatives = alternatives.clone();

        if alternatives.is_empty() {
            return AlternativesOutcome::Empty {
                message: "No alternatives could be generated for your translation. It may \
                          already be good, or the text may be too short."
                    .to_string(),
            };
        }
        AlternativesOutcome::Alternatives { alternatives }
    }

    /// Replace the draft with a chosen alternative. The applied text counts as
    /// already assessed.
    pub async fn apply_alternative(&self, alternative: String) {
        let mut state = self.inner.state.write().await;
        state.user_translation = alternative.clone();
        state.last_assessed_text = alternative;
    }

    /// Replace the draft with the offered rewrite, if one is on offer.
    pub async fn apply_improved_translation(&self) -> Option<String> {
        let mut state = self.inner.state.write().await;
        let improved = state.improved_translation.take()?;
        state.user_translation = improved.clone();
        state.last_assessed_text = improved.clone();
        Some(improved)
    }

    /// Ask the model to finish the current partial draft. Failure falls back
    /// to the unchanged draft text.
    pub async fn autocomplete(&self) -> String {
        let text = self.inner.state.read().await.user_translation.clone();
        let request = self.request_for(&text);
        match self.inner.assistant.complete_translation(&request).await {
            Ok(completed) => completed,
            Err(err) => {
                warn!("Autocomplete call failed: {}", err);
                text
            }
        }
    }

    pub async fn view(&self) -> AssistantView {
        let state = self.inner.state.read().await;
        AssistantView {
            user_translation: state.user_translation.clone(),
            ai_mode_enabled: state.ai_mode_enabled,
            is_assessing: state.is_assessing,
            score: state.score,
            feedback: state.feedback.clone(),
            has_improved_translation: state.improved_translation.is_some(),
            improved_translation: state.improved_translation.clone(),
            alternatives: state.alternatives.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    struct MockAssistant {
        results: StdMutex<VecDeque<(Duration, AssessmentResult)>>,
        alternatives: StdMutex<Vec<String>>,
        assess_calls: AtomicUsize,
        alternatives_calls: AtomicUsize,
        last_assessed: StdMutex<Option<String>>,
    }

    impl MockAssistant {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                results: StdMutex::new(VecDeque::new()),
                alternatives: StdMutex::new(Vec::new()),
                assess_calls: AtomicUsize::new(0),
                alternatives_calls: AtomicUsize::new(0),
                last_assessed: StdMutex::new(None),
            })
        }

        fn queue_result(&self, delay: Duration, result: AssessmentResult) {
            self.results.lock().unwrap().push_back((delay, result));
        }

        fn set_alternatives(&self, alternatives: Vec<&str>) {
            *self.alternatives.lock().unwrap() =
                alternatives.into_iter().map(str::to_string).collect();
        }

        fn assess_count(&self) -> usize {
            self.assess_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AiAssistantInterface for MockAssistant {
        async fn assess_translation(
            &self,
            request: &AssessmentRequest,
        ) -> Result<AssessmentResult, anyhow::Error> {
            self.assess_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_assessed.lock().unwrap() = Some(request.user_translation.clone());

            let queued = self.results.lock().unwrap().pop_front();
            let (delay, result) = queued.unwrap_or((
                Duration::ZERO,
                AssessmentResult {
                    score: 85,
                    feedback: "Good".to_string(),
                    new_translate: false,
                    translation: None,
                },
            ));
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
            Ok(result)
        }

        async fn alternative_translations(
            &self,
            _request: &AssessmentRequest,
        ) -> Result<Vec<String>, anyhow::Error> {
            self.alternatives_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.alternatives.lock().unwrap().clone())
        }

        async fn complete_translation(
            &self,
            request: &AssessmentRequest,
        ) -> Result<String, anyhow::Error> {
            Ok(format!("{} completed", request.user_translation))
        }
    }

    fn session_with(assistant: Arc<MockAssistant>, original: &str) -> TranslationSession {
        TranslationSession::new(
            "session-1".to_string(),
            "story-1".to_string(),
            Some("reader@example.com".to_string()),
            original.to_string(),
            "de".to_string(),
            "en".to_string(),
            AssessmentConfig::default(),
            assistant,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn non_qualifying_keystrokes_never_schedule() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        session.handle_text_change("The dog runs".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(assistant.assess_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn short_text_never_assessed_even_with_terminator() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        session.handle_text_change("Der K.".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(assistant.assess_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn two_qualifying_keystrokes_in_the_window_yield_one_call() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        session.handle_text_change("The dog runs fast,".to_string()).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        session.handle_text_change("The dog runs fast, then.".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(assistant.assess_count(), 1);
        assert_eq!(
            assistant.last_assessed.lock().unwrap().as_deref(),
            Some("The dog runs fast, then.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_scenario() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        // 12 chars, no terminator: nothing scheduled.
        session.handle_text_change("The dog runs".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(assistant.assess_count(), 0);

        // Terminator lands, length and ratio gates pass: one debounced call.
        session.handle_text_change("The dog runs fast.".to_string()).await;
        assert_eq!(assistant.assess_count(), 0);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(assistant.assess_count(), 1);

        let view = session.view().await;
        assert_eq!(view.score, 85);
        assert_eq!(view.feedback, "Good");
        assert!(!view.has_improved_translation);
        assert_eq!(view.improved_translation, None);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_one() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        // First call is slow and scores 10; the second is fast and scores 90.
        assistant.queue_result(
            Duration::from_millis(5000),
            AssessmentResult {
                score: 10,
                feedback: "slow and stale".to_string(),
                new_translate: false,
                translation: None,
            },
        );
        assistant.queue_result(
            Duration::from_millis(100),
            AssessmentResult {
                score: 90,
                feedback: "fresh".to_string(),
                new_translate: false,
                translation: None,
            },
        );

        session.handle_text_change("The dog runs fast.".to_string()).await;
        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.force_assessment().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = {
            let session = session.clone();
            tokio::spawn(async move { session.force_assessment().await })
        };

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        slow.await.unwrap();
        fast.await.unwrap();

        let view = session.view().await;
        assert_eq!(view.score, 90);
        assert_eq!(view.feedback, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn enabling_ai_mode_runs_the_immediate_check() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");

        // Typed while AI mode was off: no scheduling.
        session.handle_text_change("The dog runs fast.".to_string()).await;
        assert_eq!(assistant.assess_count(), 0);

        // Switching AI mode on assesses the existing draft without a debounce.
        session.set_ai_mode(true).await;
        assert_eq!(assistant.assess_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn enabling_ai_mode_without_punctuation_stays_quiet() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");

        session.handle_text_change("The dog runs fast".to_string()).await;
        session.set_ai_mode(true).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(assistant.assess_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn alternatives_require_a_complete_sentence() {
        let assistant = MockAssistant::new();
        assistant.set_alternatives(vec!["Alt one.", "Alt two."]);
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");

        session.handle_text_change("Hello world".to_string()).await;
        let outcome = session.generate_alternatives().await;
        assert!(matches!(outcome, AlternativesOutcome::Incomplete { .. }));
        assert_eq!(assistant.alternatives_calls.load(Ordering::SeqCst), 0);

        session.handle_text_change("Hello world.".to_string()).await;
        let outcome = session.generate_alternatives().await;
        assert_eq!(
            outcome,
            AlternativesOutcome::Alternatives {
                alternatives: vec!["Alt one.".to_string(), "Alt two.".to_string()]
            }
        );
        assert_eq!(assistant.alternatives_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn alternatives_are_capped_at_two_in_service_order() {
        let assistant = MockAssistant::new();
        assistant.set_alternatives(vec!["one", "two", "three", "four", "five"]);
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");

        session.handle_text_change("Hello world.".to_string()).await;
        let outcome = session.generate_alternatives().await;
        assert_eq!(
            outcome,
            AlternativesOutcome::Alternatives {
                alternatives: vec!["one".to_string(), "two".to_string()]
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_alternatives_surface_an_explanation() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");

        session.handle_text_change("Hello world.".to_string()).await;
        let outcome = session.generate_alternatives().await;
        assert!(matches!(outcome, AlternativesOutcome::Empty { .. }));
        assert!(session.view().await.alternatives.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn applying_a_suggestion_marks_it_assessed() {
        let assistant = MockAssistant::new();
        assistant.queue_result(
            Duration::ZERO,
            AssessmentResult {
                score: 60,
                feedback: "Needs work".to_string(),
                new_translate: true,
                translation: Some("The dog runs quickly.".to_string()),
            },
        );
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.handle_text_change("The dog runs fast.".to_string()).await;
        session.set_ai_mode(true).await;

        let view = session.view().await;
        assert!(view.has_improved_translation);

        let applied = session.apply_improved_translation().await;
        assert_eq!(applied.as_deref(), Some("The dog runs quickly."));

        let view = session.view().await;
        assert_eq!(view.user_translation, "The dog runs quickly.");
        assert!(!view.has_improved_translation);

        // The applied text counts as assessed: retyping it stays quiet.
        session.handle_text_change("The dog runs quickly.".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(assistant.assess_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn applying_an_alternative_replaces_the_draft() {
        let assistant = MockAssistant::new();
        let session = session_with(assistant.clone(), "Der Hund läuft schnell.");
        session.set_ai_mode(true).await;

        session.apply_alternative("The hound sprints.".to_string()).await;
        let view = session.view().await;
        assert_eq!(view.user_translation, "The hound sprints.");

        session.handle_text_change("The hound sprints.".to_string()).await;
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(assistant.assess_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_assessment_lands_as_neutral_zero_score() {
        struct FailingAssistant;

        #[async_trait::async_trait]
        impl AiAssistantInterface for FailingAssistant {
            async fn assess_translation(
                &self,
                _request: &AssessmentRequest,
            ) -> Result<AssessmentResult, anyhow::Error> {
                anyhow::bail!("connection reset")
            }

            async fn alternative_translations(
                &self,
                _request: &AssessmentRequest,
            ) -> Result<Vec<String>, anyhow::Error> {
                anyhow::bail!("connection reset")
            }

            async fn complete_translation(
                &self,
                _request: &AssessmentRequest,
            ) -> Result<String, anyhow::Error> {
                anyhow::bail!("connection reset")
            }
        }

        let session = TranslationSession::new(
            "session-1".to_string(),
            "story-1".to_string(),
            Some("reader@example.com".to_string()),
            "Der Hund läuft schnell.".to_string(),
            "de".to_string(),
            "en".to_string(),
            AssessmentConfig::default(),
            Arc::new(FailingAssistant),
        );

        session.handle_text_change("The dog runs fast.".to_string()).await;
        session.force_assessment().await;

        let view = session.view().await;
        assert_eq!(view.score, 0);
        assert_eq!(view.feedback, "Error assessing translation");
        assert!(!view.has_improved_translation);
        assert!(!view.is_assessing);

        // Alternatives fail over to the informational empty outcome.
        let outcome = session.generate_alternatives().await;
        assert!(matches!(outcome, AlternativesOutcome::Empty { .. }));

        // Autocomplete falls back to the unchanged draft.
        assert_eq!(session.autocomplete().await, "The dog runs fast.");
    }
}
