//! Test drivers: `StoryboardDriver` implementations that never touch the
//! network.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use storyboard_core::{GenerateRequest, GenerateResponse, Output};
use storyboard_error::{GeminiError, GeminiErrorKind, StoryboardResult};
use storyboard_interface::StoryboardDriver;

type Handler = dyn Fn(&GenerateRequest) -> StoryboardResult<GenerateResponse> + Send + Sync;

/// A driver that answers every request with a caller-supplied closure and
/// records each request it receives.
///
/// Clones share the handler and the request log.
#[derive(Clone)]
pub struct ScriptedDriver {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    delay: Duration,
}

impl std::fmt::Debug for ScriptedDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedDriver")
            .field("calls", &self.call_count())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ScriptedDriver {
    /// Creates a driver that answers with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&GenerateRequest) -> StoryboardResult<GenerateResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// A driver that returns `text` for every request.
    pub fn always_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text_response(text.clone())))
    }

    /// A driver that returns a small PNG for every request.
    pub fn always_image() -> Self {
        Self::new(|_| Ok(image_response()))
    }

    /// A driver that fails every request with an HTTP 500.
    pub fn always_failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| Err(server_error(message.clone()).into()))
    }

    /// Waits `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Snapshot of every request received, in order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryboardDriver for ScriptedDriver {
    async fn generate(&self, request: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.handler)(request)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// PNG signature followed by a few marker bytes. Not a decodable image,
/// which nothing in the storyboard crates needs.
pub fn tiny_png() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]
}

/// A response holding one text part.
pub fn text_response(text: impl Into<String>) -> GenerateResponse {
    GenerateResponse::new(vec![Output::Text(text.into())])
}

/// A response holding one PNG image part.
pub fn image_response() -> GenerateResponse {
    GenerateResponse::new(vec![Output::Image {
        mime: Some("image/png".to_string()),
        data: tiny_png(),
    }])
}

/// An HTTP 500 from the service.
pub fn server_error(message: impl Into<String>) -> GeminiError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 500,
        message: message.into(),
    })
}
