use super::GeminiResult;
use super::conversion::{from_gemini_response, to_gemini_request};
use super::dto::{GeminiRequest, GeminiResponse};
use reqwest::Client;
use storyboard_core::{GenerateRequest, GenerateResponse};
use storyboard_error::{GeminiError, GeminiErrorKind, HttpError, StoryboardResult};
use storyboard_interface::StoryboardDriver;
use tracing::{debug, error, instrument};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when neither the request nor the client names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the API key.
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Client for the Gemini `generateContent` REST endpoint.
///
/// The model named on a [`GenerateRequest`] wins over the client default,
/// so a single client serves both text and image models.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client using `GEMINI_API_KEY` from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::MissingApiKey`] when the variable is unset
    /// or blank.
    pub fn new() -> GeminiResult<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Self::with_api_key(api_key)
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>) -> GeminiResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            error!(error = ?e, "Failed to build HTTP client");
            GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string()))
        })?;
        debug!("Creating new Gemini client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
        })
    }

    /// Points the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Changes the model used when a request does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Sends a wire request and decodes the wire response.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn generate_gemini(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> StoryboardResult<GeminiResponse> {
        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                let err = HttpError::new(format!("Gemini API request failed: {}", e));
                match e.status() {
                    Some(status) => err.with_status(status.as_u16()),
                    None => err,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini API returned error");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message: body,
            })
            .into());
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            GeminiError::new(GeminiErrorKind::ResponseDecode(e.to_string()))
        })?;

        debug!(candidates = parsed.candidates.len(), "Received response from Gemini");
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl StoryboardDriver for GeminiClient {
    #[instrument(skip(self, request), fields(messages = request.messages().len()))]
    async fn generate(&self, request: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        let model = request
            .model()
            .clone()
            .unwrap_or_else(|| self.model_name.clone());
        let wire = to_gemini_request(request)?;
        let response = self.generate_gemini(&model, &wire).await?;
        Ok(from_gemini_response(response)?)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_accepts_prefixed_model_names() {
        let client = GeminiClient::with_api_key("k")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash-image"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_output_hides_key() {
        let client = GeminiClient::with_api_key("secret-key").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains(DEFAULT_MODEL));
    }

    #[test]
    fn default_model_can_be_overridden() {
        let client = GeminiClient::with_api_key("k")
            .unwrap()
            .with_default_model("gemini-2.5-pro");
        assert_eq!(client.model_name(), "gemini-2.5-pro");
        assert_eq!(client.provider_name(), "gemini");
    }

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        use storyboard_core::Message;
        use storyboard_error::StoryboardErrorKind;

        let client = GeminiClient::with_api_key("k")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let request = GenerateRequest::builder()
            .messages(vec![Message::user("hello")])
            .build()
            .unwrap();

        let err = client.generate(&request).await.unwrap_err();
        match err.kind() {
            StoryboardErrorKind::Http(http) => {
                assert!(http.message.starts_with("Gemini API request failed"));
                assert_eq!(http.status, None);
            }
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
