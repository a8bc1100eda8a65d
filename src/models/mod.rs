pub mod envelope;
pub mod gemini;
pub mod generation;

pub use envelope::*;
pub use generation::*;
