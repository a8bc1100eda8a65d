pub mod vision_client;

use crate::{
    error::Result,
    models::{GenerationOutcome, GenerationRequest},
};
use async_trait::async_trait;

pub use vision_client::VisionClient;

/// A multimodal model that turns a prompt plus one inline attachment into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome>;

    fn model_id(&self) -> &str;
}
