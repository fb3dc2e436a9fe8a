use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bottrainer_core::model::{ConversationTurn, TurnId};
use bottrainer_interaction::{AnalyzeRequest, IntentBackend};

use super::Trigger;
use crate::session_config::SessionConfigStore;

/// Per-console analyze options that do not live in the session config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    /// Placeholder forwarded as-is; the backend resolves its own keys.
    pub api_key: String,
    pub temperature: Option<f32>,
}

#[derive(Debug, Default)]
struct Transcript {
    turns: Vec<ConversationTurn>,
    input: String,
    submitting: bool,
    next_id: u64,
}

impl Transcript {
    fn push(&mut self, build: impl FnOnce(TurnId) -> ConversationTurn) {
        self.next_id += 1;
        let turn = build(TurnId(self.next_id));
        self.turns.push(turn);
    }
}

/// Single-query conversation: an append-only transcript of user and system turns.
pub struct SingleQueryController {
    state: Arc<Mutex<Transcript>>,
    backend: Arc<dyn IntentBackend>,
    session: Arc<SessionConfigStore>,
    options: AnalyzeOptions,
}

impl SingleQueryController {
    pub fn new(
        backend: Arc<dyn IntentBackend>,
        session: Arc<SessionConfigStore>,
        options: AnalyzeOptions,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(Transcript::default())),
            backend,
            session,
            options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Transcript> {
        lock(&self.state)
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Copy of the transcript in creation order.
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.lock().turns.clone()
    }

    /// Submits `text` as if it had been typed into the input buffer.
    ///
    /// A blank `text` or a trigger while a submission is in flight leaves the
    /// buffer untouched.
    pub fn submit_text(&self, text: impl Into<String>) -> Trigger {
        self.begin(Some(text.into()))
    }

    /// Submits the input buffer.
    ///
    /// Blank input and triggers while a submission is in flight are ignored.
    /// Otherwise the user turn is appended at once, the buffer is cleared, and
    /// the analysis outcome is appended as a system turn when it arrives.
    pub fn submit(&self) -> Trigger {
        self.begin(None)
    }

    fn begin(&self, text: Option<String>) -> Trigger {
        let message = {
            let mut transcript = self.lock();
            let blank = match &text {
                Some(text) => text.trim().is_empty(),
                None => transcript.input.trim().is_empty(),
            };
            if blank {
                return Trigger::BlankInput;
            }
            if transcript.submitting {
                tracing::debug!("analysis already in flight, submission dropped");
                return Trigger::Busy;
            }
            let message = match text {
                Some(text) => {
                    transcript.input.clear();
                    text
                }
                None => std::mem::take(&mut transcript.input),
            };
            transcript.push(|id| ConversationTurn::user(id, message.clone()));
            transcript.submitting = true;
            message
        };
        self.send(message)
    }

    fn send(&self, message: String) -> Trigger {
        let config = self.session.snapshot();
        let request = AnalyzeRequest {
            message: message.clone(),
            model_type: config.model_kind,
            model_name: config.effective_model_name().to_string(),
            api_key: self.options.api_key.clone(),
            temperature: self.options.temperature,
        };
        tracing::info!(
            kind = %request.model_type,
            model = %request.model_name,
            "analyzing message"
        );

        let backend = Arc::clone(&self.backend);
        let state = Arc::downgrade(&self.state);
        Trigger::Started(tokio::spawn(async move {
            let outcome = backend.analyze(&request).await;
            let Some(state) = state.upgrade() else {
                tracing::debug!("query view torn down, discarding analysis");
                return;
            };
            let mut transcript = lock(&state);
            match outcome {
                Ok(analysis) => {
                    tracing::info!(
                        intent = %analysis.intent,
                        confidence = analysis.confidence,
                        "analysis complete"
                    );
                    transcript.push(|id| ConversationTurn::classified(id, message, analysis));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "analysis failed");
                    transcript.push(|id| ConversationTurn::failed(id, err.message));
                }
            }
            transcript.submitting = false;
        }))
    }
}

fn lock(state: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
