pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;

pub use config::{Config, GeminiConfig};
pub use error::{RelayError, Result};
pub use gemini::{TextGenerator, VisionClient};
pub use models::{GenerationOutcome, GenerationRequest, ResponseEnvelope, Upload};
