//! Trait definitions for generation backends.

use async_trait::async_trait;
use std::sync::Arc;
use storyboard_core::{GenerateRequest, GenerateResponse};
use storyboard_error::StoryboardResult;

/// Core trait that every generation backend implements.
///
/// A single call covers text, schema-constrained JSON and image output; the
/// request's `response_format` says which one is wanted.
#[async_trait]
pub trait StoryboardDriver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when a request names none.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D: StoryboardDriver + ?Sized> StoryboardDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: StoryboardDriver + ?Sized> StoryboardDriver for Box<D> {
    async fn generate(&self, req: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
