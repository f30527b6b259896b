//! Gemini REST client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::domain::{Hotel, MatchedQuest, QuestCategory};
use crate::overpass::{RawHotel, RawPoi};
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::suggest::TripIdea;

use super::error::LlmError;
use super::parse::{fallback_prices, parse_prices, parse_quests, parse_trip_ideas};
use super::prompt::{price_prompt, quest_prompt, trip_ideas_prompt};
use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the language-model client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; `None` disables every AI feature
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Deadline for quest generation
    pub quest_timeout: Duration,
    /// Deadline for hotel price estimation
    pub price_timeout: Duration,
    /// Most POIs offered to the model in one prompt
    pub max_pois: usize,
    /// Most hotels priced in one prompt
    pub max_hotels: usize,
    /// Retry behaviour for transient failures
    pub retry: RetryPolicy,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            quest_timeout: Duration::from_secs(20),
            price_timeout: Duration::from_secs(15),
            max_pois: 30,
            max_hotels: 10,
            retry: RetryPolicy::default(),
        }
    }
}

impl LlmConfig {
    /// Create a config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// A config with AI features switched off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeouts(mut self, quests: Duration, prices: Duration) -> Self {
        self.quest_timeout = quests;
        self.price_timeout = prices;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Language-model client for quest generation and price estimation.
///
/// The high-level methods never fail: a missing key, a timeout or an
/// unusable reply is logged and turned into an empty or fallback result.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let key = HeaderValue::from_str(key).map_err(|_| LlmError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert("x-goog-api-key", key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send a prompt and return the reply text, within `deadline`.
    pub async fn generate_text(&self, prompt: &str, deadline: Duration) -> Result<String, LlmError> {
        if !self.is_enabled() {
            return Err(LlmError::NotConfigured);
        }

        let request = GenerateContentRequest::prompt(prompt);
        let call = retry_with_backoff(self.config.retry, LlmError::is_transient, || {
            self.post(&request)
        });

        tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| LlmError::Timeout(deadline))?
            .map_err(|e| e.into_inner())
    }

    async fn post(&self, request: &GenerateContentRequest) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        parsed.text().ok_or(LlmError::EmptyResponse)
    }

    /// Ask the model to turn POIs into side quests.
    ///
    /// Only the first `max_pois` POIs are offered. Returns an empty list
    /// on any failure.
    pub async fn generate_quests(
        &self,
        pois: &[RawPoi],
        interests: &[QuestCategory],
        origin_name: &str,
        destination_name: &str,
    ) -> Vec<MatchedQuest> {
        if pois.is_empty() {
            return Vec::new();
        }
        let pois = &pois[..pois.len().min(self.config.max_pois)];
        let prompt = quest_prompt(pois, interests, origin_name, destination_name);

        let result = match self.generate_text(&prompt, self.config.quest_timeout).await {
            Ok(text) => parse_quests(&text, pois),
            Err(e) => Err(e),
        };

        match result {
            Ok(quests) => {
                debug!(offered = pois.len(), generated = quests.len(), "generated quests");
                quests
            }
            Err(LlmError::NotConfigured) => {
                debug!("quest generation skipped, no API key");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "quest generation failed");
                Vec::new()
            }
        }
    }

    /// Ask the model for trip ideas starting from `start_location`.
    ///
    /// Shares the quest deadline. Returns an empty list on any failure so
    /// the caller can fall back to catalog-based ideas.
    pub async fn suggest_trip_ideas(
        &self,
        start_location: &str,
        budget: f64,
        days: u32,
        interests: &[QuestCategory],
    ) -> Vec<TripIdea> {
        let prompt = trip_ideas_prompt(start_location, budget, days, interests);

        let result = match self.generate_text(&prompt, self.config.quest_timeout).await {
            Ok(text) => parse_trip_ideas(&text, budget),
            Err(e) => Err(e),
        };

        match result {
            Ok(ideas) => {
                debug!(start = start_location, ideas = ideas.len(), "generated trip ideas");
                ideas
            }
            Err(LlmError::NotConfigured) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "trip idea generation failed");
                Vec::new()
            }
        }
    }

    /// Price the first `max_hotels` hotels.
    ///
    /// Falls back to per-kind prices when the model is unavailable or its
    /// reply cannot be used.
    pub async fn estimate_hotel_prices(&self, hotels: &[RawHotel], region_name: &str) -> Vec<Hotel> {
        let hotels = &hotels[..hotels.len().min(self.config.max_hotels)];
        if hotels.is_empty() {
            return Vec::new();
        }
        let prompt = price_prompt(hotels, region_name);

        let result = match self.generate_text(&prompt, self.config.price_timeout).await {
            Ok(text) => parse_prices(&text, hotels),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            if !matches!(e, LlmError::NotConfigured) {
                warn!(error = %e, "price estimation failed, using fallback prices");
            }
            fallback_prices(hotels)
        })
    }
}
