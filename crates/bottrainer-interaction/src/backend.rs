//! The classification backend's REST surface.
//!
//! [`IntentBackend`] is the seam the controllers depend on;
//! [`HttpIntentBackend`] implements it over [`TransportClient`].

use async_trait::async_trait;
use bottrainer_core::model::{
    Analysis, BatchResult, ComparisonReport, EvaluationReport, HistoryEntry, ModelKind,
};
use bottrainer_core::schema::IntentDataset;
use serde::{Deserialize, Serialize};

use crate::transport::{TransportClient, TransportError};

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub message: String,
    pub model_type: ModelKind,
    pub model_name: String,
    /// Placeholder; the backend resolves keys itself.
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Body of `POST /batch_test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchTestRequest<'a> {
    pub intent: &'a str,
    pub num_samples: u32,
}

/// Body of `POST /evaluate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluateRequest {
    pub samples_per_intent: u32,
}

/// Body of `POST /compare_models`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompareModelsRequest {
    pub num_intents: u32,
    pub samples_per_intent: u32,
}

// ============================================================================
// Remote configuration
// ============================================================================

/// Body of `GET /config`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub llm: Option<LlmSection>,
    #[serde(default)]
    pub ollama: Option<ModelSection>,
    #[serde(default)]
    pub gemini: Option<ModelSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LlmSection {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub available_models: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelSection {
    #[serde(default)]
    pub model_name: Option<String>,
}

impl RemoteConfig {
    /// The backend's default model kind, if it names one this console knows.
    pub fn default_kind(&self) -> Option<ModelKind> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.default_model.as_deref())
            .and_then(ModelKind::from_wire)
    }

    /// The backend's default model name for `kind`, ignoring blanks.
    pub fn model_name_for(&self, kind: ModelKind) -> Option<&str> {
        let section = match kind {
            ModelKind::Primary => self.ollama.as_ref(),
            ModelKind::Alternate => self.gemini.as_ref(),
        };
        section
            .and_then(|section| section.model_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// ============================================================================
// Backend seam
// ============================================================================

/// Operations the console issues against the classification service.
#[async_trait]
pub trait IntentBackend: Send + Sync {
    /// `GET /config`
    async fn fetch_config(&self) -> Result<RemoteConfig, TransportError>;

    /// `POST /analyze`
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Analysis, TransportError>;

    /// `POST /batch_test`
    async fn batch_test(
        &self,
        request: &BatchTestRequest<'_>,
    ) -> Result<Vec<BatchResult>, TransportError>;

    /// `POST /evaluate`
    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationReport, TransportError>;

    /// `POST /compare_models`
    async fn compare_models(
        &self,
        request: &CompareModelsRequest,
    ) -> Result<ComparisonReport, TransportError>;

    /// `GET /history`
    async fn history(&self) -> Result<Vec<HistoryEntry>, TransportError>;

    /// `DELETE /history`
    async fn clear_history(&self) -> Result<(), TransportError>;

    /// `GET /intents`
    async fn intents(&self) -> Result<IntentDataset, TransportError>;
}

/// [`IntentBackend`] over HTTP.
#[derive(Clone)]
pub struct HttpIntentBackend {
    transport: TransportClient,
}

impl HttpIntentBackend {
    pub fn new(transport: TransportClient) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[async_trait]
impl IntentBackend for HttpIntentBackend {
    async fn fetch_config(&self) -> Result<RemoteConfig, TransportError> {
        self.transport.get("/config").await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Analysis, TransportError> {
        self.transport.post("/analyze", request).await
    }

    async fn batch_test(
        &self,
        request: &BatchTestRequest<'_>,
    ) -> Result<Vec<BatchResult>, TransportError> {
        self.transport.post("/batch_test", request).await
    }

    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationReport, TransportError> {
        self.transport.post("/evaluate", request).await
    }

    async fn compare_models(
        &self,
        request: &CompareModelsRequest,
    ) -> Result<ComparisonReport, TransportError> {
        self.transport.post("/compare_models", request).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, TransportError> {
        // A backend with no log file answers `null`.
        let entries: Option<Vec<HistoryEntry>> = self.transport.get("/history").await?;
        Ok(entries.unwrap_or_default())
    }

    async fn clear_history(&self) -> Result<(), TransportError> {
        self.transport.delete("/history").await
    }

    async fn intents(&self) -> Result<IntentDataset, TransportError> {
        self.transport.get("/intents").await
    }
}
