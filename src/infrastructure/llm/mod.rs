//! Text generation clients - Relay and Gemini classifier

pub mod relay;
pub mod gemini;


pub use relay::RelayClient;
pub use gemini::GeminiClassifier;
