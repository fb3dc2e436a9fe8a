#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bottrainer_core::model::{
    Analysis, BatchResult, ComparisonReport, EvaluationReport, HistoryEntry, IntentMetrics,
};
use bottrainer_core::schema::IntentDataset;
use bottrainer_interaction::{
    AnalyzeRequest, BatchTestRequest, CompareModelsRequest, EvaluateRequest, IntentBackend,
    RemoteConfig, TransportError,
};
use serde_json::json;
use tokio::sync::Notify;

/// Scripted response for one backend operation.
///
/// A held endpoint parks every call until [`Endpoint::release`].
pub struct Endpoint<T> {
    response: Mutex<Result<T, TransportError>>,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: AtomicUsize,
}

impl<T: Clone> Endpoint<T> {
    fn new(response: Result<T, TransportError>) -> Self {
        Self {
            response: Mutex::new(response),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond(&self, response: Result<T, TransportError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn fail(&self, status: Option<u16>, message: &str) {
        self.respond(Err(TransportError::new(status, message)));
    }

    pub fn hold(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    /// Lets one parked (or the next) call through.
    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn serve(&self) -> Result<T, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.response.lock().unwrap().clone()
    }
}

/// In-memory backend with a mutable history log.
pub struct MockBackend {
    pub config: Endpoint<RemoteConfig>,
    pub analyze: Endpoint<Analysis>,
    pub batch: Endpoint<Vec<BatchResult>>,
    pub evaluate: Endpoint<EvaluationReport>,
    pub compare: Endpoint<ComparisonReport>,
    pub intents: Endpoint<IntentDataset>,
    /// Outcome reported by `DELETE /history`. The log is emptied either way.
    pub clear: Endpoint<()>,
    pub history_failure: Mutex<Option<TransportError>>,
    pub log: Mutex<Vec<HistoryEntry>>,
    pub history_calls: AtomicUsize,
    pub analyzed: Mutex<Vec<AnalyzeRequest>>,
    pub batch_requests: Mutex<Vec<(String, u32)>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            config: Endpoint::new(Ok(RemoteConfig::default())),
            analyze: Endpoint::new(Ok(analysis("greeting", 0.9))),
            batch: Endpoint::new(Ok(Vec::new())),
            evaluate: Endpoint::new(Ok(evaluation_report(0.73))),
            compare: Endpoint::new(Ok(comparison_report())),
            intents: Endpoint::new(Ok(IntentDataset { intents: Vec::new() })),
            clear: Endpoint::new(Ok(())),
            history_failure: Mutex::new(None),
            log: Mutex::new(Vec::new()),
            history_calls: AtomicUsize::new(0),
            analyzed: Mutex::new(Vec::new()),
            batch_requests: Mutex::new(Vec::new()),
        })
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntentBackend for MockBackend {
    async fn fetch_config(&self) -> Result<RemoteConfig, TransportError> {
        self.config.serve().await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Analysis, TransportError> {
        self.analyzed.lock().unwrap().push(request.clone());
        self.analyze.serve().await
    }

    async fn batch_test(
        &self,
        request: &BatchTestRequest<'_>,
    ) -> Result<Vec<BatchResult>, TransportError> {
        self.batch_requests
            .lock()
            .unwrap()
            .push((request.intent.to_string(), request.num_samples));
        self.batch.serve().await
    }

    async fn evaluate(&self, _request: &EvaluateRequest) -> Result<EvaluationReport, TransportError> {
        self.evaluate.serve().await
    }

    async fn compare_models(
        &self,
        _request: &CompareModelsRequest,
    ) -> Result<ComparisonReport, TransportError> {
        self.compare.serve().await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, TransportError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.history_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.log.lock().unwrap().clone())
    }

    async fn clear_history(&self) -> Result<(), TransportError> {
        self.log.lock().unwrap().clear();
        self.clear.serve().await
    }

    async fn intents(&self) -> Result<IntentDataset, TransportError> {
        self.intents.serve().await
    }
}

pub fn analysis(intent: &str, confidence: f64) -> Analysis {
    Analysis {
        intent: intent.to_string(),
        confidence,
        entities: BTreeMap::new(),
    }
}

pub fn batch_result(text: &str, predicted: &str, confidence: f64) -> BatchResult {
    BatchResult {
        text: text.to_string(),
        predicted_intent: predicted.to_string(),
        confidence,
        entities: BTreeMap::new(),
    }
}

pub fn evaluation_report(accuracy: f64) -> EvaluationReport {
    let mut per_intent = BTreeMap::new();
    per_intent.insert(
        "greeting".to_string(),
        IntentMetrics {
            precision: 0.9,
            recall: 0.85,
            f1: 0.87,
            support: 10,
        },
    );
    EvaluationReport {
        overall_accuracy: accuracy,
        per_intent,
    }
}

pub fn comparison_report() -> ComparisonReport {
    serde_json::from_value(json!({
        "gemma": {"accuracy": 0.8, "precision": 0.8, "recall": 0.8, "f1": 0.8},
        "qwen": {"accuracy": 0.7, "precision": 0.7, "recall": 0.7, "f1": 0.7}
    }))
    .unwrap()
}

pub fn history_entry(input: &str) -> HistoryEntry {
    HistoryEntry {
        timestamp: "2025-03-01T10:15:00".to_string(),
        input: input.to_string(),
        model: "gemma3".to_string(),
        intent: "greeting".to_string(),
        confidence: Some(0.9),
    }
}
