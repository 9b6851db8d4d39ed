//! Conversation driver.
//!
//! Wraps the pure stage machine with the async collaborators:
//! - Inbound translation into the working language
//! - Question answering for interjections
//! - Outbound translation into the display language
//!
//! Every collaborator call goes through the circuit breaker and a timeout.
//! A failed call never touches the session; the candidate sees an apology.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use talentscout_core::{
    Language, Outcome, ScreeningConfig, Session, StageMachine, Transcript, TurnResponse,
};

use crate::cache::TranslationCache;
use crate::collaborators::{
    CollaboratorError, CollaboratorKind, ModelAnswerer, ModelTranslator, QuestionAnswerer,
    Translator,
};
use crate::config::RuntimeConfig;
use crate::providers::{InferenceConfig, ProviderRegistry};
use crate::resilience::CircuitBreaker;
use crate::RuntimeError;

/// Reply shown when a collaborator fails.
pub const APOLOGY: &str = "Sorry, I couldn't process that right now. Please try again.";

/// One candidate's conversation: session, display language and transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: String,
    language: Language,
    session: Session,
    transcript: Transcript,
    ended: bool,
}

impl Conversation {
    pub fn new(id: impl Into<String>, language: Language) -> Self {
        Self {
            id: id.into(),
            language,
            session: Session::new(),
            transcript: Transcript::new(),
            ended: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True once the candidate has left. No further turns are accepted.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// True once the candidate has left or finished the interview.
    pub fn is_done(&self) -> bool {
        self.ended || self.session.is_done()
    }

    fn response(&self, reply: String) -> TurnResponse {
        TurnResponse {
            reply,
            stage: self.session.stage(),
            done: self.is_done(),
        }
    }
}

/// Runs turns of any number of conversations against shared collaborators.
pub struct ScreeningRuntime {
    machine: StageMachine,
    config: RuntimeConfig,
    translator: Option<Arc<dyn Translator>>,
    answerer: Option<Arc<dyn QuestionAnswerer>>,
    circuit_breaker: CircuitBreaker,
}

impl ScreeningRuntime {
    pub fn builder() -> ScreeningRuntimeBuilder {
        ScreeningRuntimeBuilder::default()
    }

    /// Build model-backed collaborators from config. Without a provider
    /// section the runtime is English-only and answers interjections with
    /// the apology.
    pub fn from_config(
        config: RuntimeConfig,
        screening: ScreeningConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        let mut builder = Self::builder().screening(screening);

        if let Some(provider_settings) = &config.provider {
            let provider = registry.create(&provider_settings.provider_type, &provider_settings.settings)?;
            tracing::info!(provider = provider.name(), "Inference provider ready");

            let inference = InferenceConfig {
                timeout: config.collaborator_timeout,
                ..Default::default()
            };
            let cache = Arc::new(TranslationCache::new(
                config.translation.cache_capacity,
                config.translation.cache_ttl,
            ));

            let translator = ModelTranslator::new(provider.clone())
                .with_model_pattern(config.translation.model_pattern.clone())
                .with_inference_config(inference.clone())
                .with_retry(config.retry.clone())
                .with_cache(cache);

            let answerer = ModelAnswerer::new(provider)
                .with_model(
                    config.question_answering.model.clone(),
                    config.question_answering.max_length,
                )
                .with_inference_config(inference)
                .with_retry(config.retry.clone());

            builder = builder
                .translator(Arc::new(translator))
                .answerer(Arc::new(answerer));
        }

        Ok(builder.config(config).build())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    /// Whether conversations in `language` can be served.
    pub fn supports(&self, language: Language) -> bool {
        !language.needs_translation() || self.translator.is_some()
    }

    /// Open a conversation, checking that its language can be served.
    pub fn start(
        &self,
        id: impl Into<String>,
        language: Language,
    ) -> Result<Conversation, RuntimeError> {
        if !self.supports(language) {
            return Err(RuntimeError::ProviderNotConfigured(format!(
                "{} needs a translation provider",
                language.display_name()
            )));
        }

        let conversation = Conversation::new(id, language);
        tracing::info!(conversation = conversation.id(), language = %language, "Conversation started");
        Ok(conversation)
    }

    /// Process one utterance, typed in the conversation's display language.
    pub async fn handle_turn(
        &self,
        conversation: &mut Conversation,
        utterance: &str,
    ) -> Result<TurnResponse, RuntimeError> {
        if conversation.ended {
            return Err(RuntimeError::ConversationEnded(conversation.id.clone()));
        }

        if utterance.trim().is_empty() {
            return Ok(conversation.response(String::new()));
        }

        conversation.transcript.push_user(utterance);
        let language = conversation.language;

        let reply = match self.translate_in(language, utterance).await {
            Ok(working) => self.dispatch(conversation, &working).await,
            Err(e) => {
                tracing::warn!(conversation = %conversation.id, error = %e, "Inbound translation failed");
                APOLOGY.to_string()
            }
        };

        if reply.is_empty() {
            return Ok(conversation.response(reply));
        }

        let shown = self.translate_out(language, reply).await;
        conversation.transcript.push_assistant(shown.clone());

        Ok(conversation.response(shown))
    }

    async fn dispatch(&self, conversation: &mut Conversation, working: &str) -> String {
        let session = std::mem::take(&mut conversation.session);
        let (session, outcome) = self.machine.advance(session, working);
        conversation.session = session;

        match outcome {
            Outcome::Reply(reply) => reply,
            Outcome::Farewell(reply) => {
                conversation.ended = true;
                tracing::info!(conversation = %conversation.id, "Conversation ended by candidate");
                reply
            }
            Outcome::Interjection { prompt } => match self.answer(&prompt).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(conversation = %conversation.id, error = %e, "Question answering failed");
                    APOLOGY.to_string()
                }
            },
            Outcome::Ignored => String::new(),
        }
    }

    async fn translate_in(&self, language: Language, text: &str) -> Result<String, CollaboratorError> {
        if !language.needs_translation() {
            return Ok(text.to_string());
        }

        let translator = self
            .translator
            .as_ref()
            .ok_or(CollaboratorError::Unavailable(CollaboratorKind::Translation))?;

        self.guarded(
            CollaboratorKind::Translation,
            translator.translate(text, language, Language::WORKING),
        )
        .await
    }

    async fn translate_out(&self, language: Language, reply: String) -> String {
        if !language.needs_translation() {
            return reply;
        }

        let Some(translator) = self.translator.as_ref() else {
            return self.config.outbound_fallback.apply(reply, APOLOGY);
        };

        let result = self
            .guarded(
                CollaboratorKind::Translation,
                translator.translate(&reply, Language::WORKING, language),
            )
            .await;

        match result {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(error = %e, fallback = ?self.config.outbound_fallback, "Outbound translation failed");
                self.config.outbound_fallback.apply(reply, APOLOGY)
            }
        }
    }

    async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let answerer = self
            .answerer
            .as_ref()
            .ok_or(CollaboratorError::Unavailable(CollaboratorKind::QuestionAnswering))?;

        self.guarded(CollaboratorKind::QuestionAnswering, answerer.answer(prompt))
            .await
    }

    /// Run a collaborator call behind the circuit breaker and timeout.
    async fn guarded<T, F>(&self, kind: CollaboratorKind, call: F) -> Result<T, CollaboratorError>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        if self.circuit_breaker.is_open(kind) {
            return Err(CollaboratorError::CircuitOpen(kind));
        }

        let timeout = self.config.collaborator_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => {
                self.circuit_breaker.record_success(kind);
                Ok(value)
            }
            Ok(Err(e)) => {
                self.circuit_breaker.record_failure(kind);
                Err(e)
            }
            Err(_) => {
                self.circuit_breaker.record_failure(kind);
                Err(CollaboratorError::Timeout { kind, timeout })
            }
        }
    }
}

/// Builder for [`ScreeningRuntime`] with explicit collaborators.
#[derive(Default)]
pub struct ScreeningRuntimeBuilder {
    screening: ScreeningConfig,
    config: RuntimeConfig,
    translator: Option<Arc<dyn Translator>>,
    answerer: Option<Arc<dyn QuestionAnswerer>>,
}

impl ScreeningRuntimeBuilder {
    pub fn screening(mut self, screening: ScreeningConfig) -> Self {
        self.screening = screening;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn answerer(mut self, answerer: Arc<dyn QuestionAnswerer>) -> Self {
        self.answerer = Some(answerer);
        self
    }

    pub fn build(self) -> ScreeningRuntime {
        ScreeningRuntime {
            machine: StageMachine::new(self.screening),
            circuit_breaker: CircuitBreaker::new(self.config.circuit_breaker.clone()),
            config: self.config,
            translator: self.translator,
            answerer: self.answerer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use talentscout_core::{replies, Field, Role, Stage};

    use crate::resilience::FallbackStrategy;

    /// Inbound passes text through; outbound tags it with the target code.
    #[derive(Default)]
    struct TaggingTranslator {
        fail_inbound: bool,
        fail_outbound: bool,
        calls: Mutex<Vec<(Language, Language)>>,
    }

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(
            &self,
            text: &str,
            source: Language,
            target: Language,
        ) -> Result<String, CollaboratorError> {
            self.calls.lock().push((source, target));
            if target == Language::WORKING {
                if self.fail_inbound {
                    return Err(CollaboratorError::Unavailable(CollaboratorKind::Translation));
                }
                Ok(text.to_string())
            } else {
                if self.fail_outbound {
                    return Err(CollaboratorError::Unavailable(CollaboratorKind::Translation));
                }
                Ok(format!("[{}] {}", target.code(), text))
            }
        }
    }

    struct StubAnswerer {
        delay: Option<Duration>,
        calls: AtomicU32,
    }

    impl StubAnswerer {
        fn new() -> Self {
            Self {
                delay: None,
                calls: AtomicU32::new(0),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl QuestionAnswerer for StubAnswerer {
        async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(format!("answered: {}", prompt))
        }
    }

    const SCRIPT: [&str; 8] = [
        "hi",
        "Grace Hopper",
        "grace@navy.mil",
        "+15551234567",
        "40",
        "Rear Admiral",
        "Arlington",
        "COBOL",
    ];

    async fn play(runtime: &ScreeningRuntime, conversation: &mut Conversation, lines: &[&str]) {
        for line in lines {
            runtime.handle_turn(conversation, line).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_english_interview_without_collaborators() {
        let runtime = ScreeningRuntime::builder().build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();

        play(&runtime, &mut conversation, &SCRIPT).await;
        assert_eq!(conversation.session().stage(), Stage::Qa);
        assert_eq!(conversation.session().questions().len(), 4);

        let mut last = None;
        for answer in ["a", "b", "c", "d"] {
            last = Some(runtime.handle_turn(&mut conversation, answer).await.unwrap());
        }

        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(last.stage, Stage::Done);
        assert!(last.reply.contains("Final Score: 12/20"));
        assert_eq!(conversation.transcript().len(), 2 * (SCRIPT.len() + 4));
        assert_eq!(
            conversation.session().candidate().get(Field::Email),
            Some("gr***@navy.mil")
        );
    }

    #[tokio::test]
    async fn test_exit_ends_conversation() {
        let runtime = ScreeningRuntime::builder().build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();
        play(&runtime, &mut conversation, &SCRIPT[..3]).await;
        let before = conversation.session().clone();

        let response = runtime.handle_turn(&mut conversation, "bye").await.unwrap();
        assert_eq!(response.reply, replies::FAREWELL);
        assert!(response.done);
        assert_eq!(conversation.session(), &before);

        let again = runtime.handle_turn(&mut conversation, "hello").await;
        assert!(matches!(again, Err(RuntimeError::ConversationEnded(id)) if id == "c1"));
    }

    #[tokio::test]
    async fn test_completed_interview_still_answers_and_ends() {
        let answerer = Arc::new(StubAnswerer::new());
        let runtime = ScreeningRuntime::builder().answerer(answerer.clone()).build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();
        play(&runtime, &mut conversation, &SCRIPT).await;
        play(&runtime, &mut conversation, &["a", "b", "c", "d"]).await;
        assert_eq!(conversation.session().stage(), Stage::Done);
        assert!(!conversation.is_ended());
        let before = conversation.session().clone();

        let response = runtime.handle_turn(&mut conversation, "why?").await.unwrap();
        assert_eq!(response.reply, "answered: Answer this question clearly: why?");
        assert_eq!(conversation.session(), &before);
        assert_eq!(answerer.calls.load(Ordering::SeqCst), 1);

        let response = runtime.handle_turn(&mut conversation, "bye").await.unwrap();
        assert_eq!(response.reply, replies::FAREWELL);
        assert!(conversation.is_ended());
        assert_eq!(conversation.session(), &before);
    }

    #[tokio::test]
    async fn test_blank_input_is_not_recorded() {
        let runtime = ScreeningRuntime::builder().build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();

        let response = runtime.handle_turn(&mut conversation, "   ").await.unwrap();
        assert_eq!(response.reply, "");
        assert_eq!(response.stage, Stage::Greeting);
        assert!(conversation.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_interjection_is_answered_without_mutation() {
        let answerer = Arc::new(StubAnswerer::new());
        let runtime = ScreeningRuntime::builder().answerer(answerer.clone()).build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();
        play(&runtime, &mut conversation, &SCRIPT[..4]).await;
        let before = conversation.session().clone();

        let response = runtime
            .handle_turn(&mut conversation, "What does the role pay?")
            .await
            .unwrap();

        assert_eq!(
            response.reply,
            "answered: Answer this question clearly: What does the role pay?"
        );
        assert_eq!(conversation.session(), &before);
        assert_eq!(answerer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_interjection_without_answerer_apologizes() {
        let runtime = ScreeningRuntime::builder().build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();
        play(&runtime, &mut conversation, &SCRIPT[..2]).await;

        let response = runtime
            .handle_turn(&mut conversation, "is this remote?")
            .await
            .unwrap();

        assert_eq!(response.reply, APOLOGY);
        assert_eq!(response.stage, Stage::Email);
    }

    #[tokio::test]
    async fn test_translated_conversation() {
        let translator = Arc::new(TaggingTranslator::default());
        let runtime = ScreeningRuntime::builder()
            .translator(translator.clone())
            .build();
        let mut conversation = runtime.start("c1", Language::Tamil).unwrap();

        let response = runtime.handle_turn(&mut conversation, "வணக்கம்").await.unwrap();

        assert_eq!(response.reply, format!("[ta] {}", replies::GREETING));
        assert_eq!(
            *translator.calls.lock(),
            vec![
                (Language::Tamil, Language::English),
                (Language::English, Language::Tamil)
            ]
        );

        let entries = conversation.transcript().entries();
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].content, "வணக்கம்");
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].content, response.reply);
    }

    #[tokio::test]
    async fn test_inbound_failure_apologizes_without_mutation() {
        let translator = Arc::new(TaggingTranslator {
            fail_inbound: true,
            ..Default::default()
        });
        let runtime = ScreeningRuntime::builder().translator(translator).build();
        let mut conversation = runtime.start("c1", Language::Hindi).unwrap();

        let response = runtime.handle_turn(&mut conversation, "नमस्ते").await.unwrap();

        assert_eq!(response.reply, format!("[hi] {}", APOLOGY));
        assert_eq!(response.stage, Stage::Greeting);
    }

    #[tokio::test]
    async fn test_outbound_failure_falls_back() {
        let translator = Arc::new(TaggingTranslator {
            fail_outbound: true,
            ..Default::default()
        });

        let passthrough = ScreeningRuntime::builder()
            .translator(translator.clone())
            .build();
        let mut conversation = passthrough.start("c1", Language::Tamil).unwrap();
        let response = passthrough.handle_turn(&mut conversation, "hi").await.unwrap();
        assert_eq!(response.reply, replies::GREETING);
        assert_eq!(response.stage, Stage::Name);

        let apologize = ScreeningRuntime::builder()
            .translator(translator)
            .config(RuntimeConfig {
                outbound_fallback: FallbackStrategy::Apologize,
                ..Default::default()
            })
            .build();
        let mut conversation = apologize.start("c2", Language::Tamil).unwrap();
        let response = apologize.handle_turn(&mut conversation, "hi").await.unwrap();
        assert_eq!(response.reply, APOLOGY);
        assert_eq!(response.stage, Stage::Name);
    }

    #[test]
    fn test_start_requires_translator_for_other_languages() {
        let runtime = ScreeningRuntime::builder().build();
        assert!(runtime.supports(Language::English));
        assert!(matches!(
            runtime.start("c1", Language::Hindi),
            Err(RuntimeError::ProviderNotConfigured(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_answerer_times_out_and_opens_circuit() {
        let answerer = Arc::new(StubAnswerer::slow(Duration::from_secs(60)));
        let runtime = ScreeningRuntime::builder()
            .answerer(answerer.clone())
            .build();
        let mut conversation = runtime.start("c1", Language::English).unwrap();
        play(&runtime, &mut conversation, &SCRIPT[..1]).await;

        // Default failure threshold is 3
        for _ in 0..3 {
            let response = runtime.handle_turn(&mut conversation, "why?").await.unwrap();
            assert_eq!(response.reply, APOLOGY);
        }
        assert_eq!(answerer.calls.load(Ordering::SeqCst), 3);

        let response = runtime.handle_turn(&mut conversation, "why?").await.unwrap();
        assert_eq!(response.reply, APOLOGY);
        assert_eq!(answerer.calls.load(Ordering::SeqCst), 3);
        assert!(runtime
            .circuit_breaker()
            .is_open(CollaboratorKind::QuestionAnswering));
        assert_eq!(conversation.session().stage(), Stage::Name);
    }

    #[test]
    fn test_from_config_without_provider() {
        let runtime = ScreeningRuntime::from_config(
            RuntimeConfig::default(),
            ScreeningConfig::default(),
            &ProviderRegistry::with_defaults(),
        )
        .unwrap();
        assert!(!runtime.supports(Language::Tamil));
    }

    #[test]
    fn test_from_config_with_provider() {
        let config = RuntimeConfig::from_yaml(
            "provider:\n  type: huggingface\n  settings:\n    api_token: hf_test\n",
        )
        .unwrap();
        let runtime = ScreeningRuntime::from_config(
            config,
            ScreeningConfig::default(),
            &ProviderRegistry::with_defaults(),
        )
        .unwrap();
        assert!(runtime.supports(Language::Tamil));
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = RuntimeConfig::from_yaml("provider:\n  type: openai\n").unwrap();
        let result = ScreeningRuntime::from_config(
            config,
            ScreeningConfig::default(),
            &ProviderRegistry::with_defaults(),
        );
        assert!(matches!(result, Err(RuntimeError::Provider(_))));
    }
}
