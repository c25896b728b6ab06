//! LLM provider access
//!
//! The pipeline only needs text in, text out. A missing client means
//! degraded mode; see [`DEGRADED_WARNING`].

mod gemini;
pub mod offline;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::Result;

/// Reply used for every non-command turn while no LLM client is configured
pub const DEGRADED_WARNING: &str = "⚠️ The assistant is offline: no LLM API key is configured. \
     Set GEMINI_API_KEY (environment or secrets.toml) to enable answers. \
     Commands like /help, /time and /date still work.";

/// Text completion provider
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Short provider/model label for logs and readiness checks
    fn name(&self) -> &str;

    /// Generate a reply for a fully built prompt
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider returns no text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
