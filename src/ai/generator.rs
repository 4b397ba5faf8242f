//! Content Generator
//!
//! Stateless adapter between pipeline stages and the LLM provider. Each call
//! is one chat completion: system prompt layered from role, context and
//! output rules; the reply is stripped of code fences and leading prose.
//!
//! Provider failures are classified and logged here, then collapsed into
//! `SiteError::GenerationFailed` so stages see one error kind.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, error, warn};

use super::prompt;
use super::provider::{CompletionRequest, SharedProvider};
use super::timeout::with_timeout;
use crate::config::LlmConfig;
use crate::constants::network;
use crate::types::{ErrorClassifier, Result, SiteError};

const DOCTYPE: &str = "<!DOCTYPE html>";

/// Sends prompts to the provider and returns cleaned text
#[derive(Clone)]
pub struct ContentGenerator {
    provider: SharedProvider,
    timeout: Duration,
    max_retries: usize,
}

impl std::fmt::Debug for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGenerator")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ContentGenerator {
    pub fn new(provider: SharedProvider, timeout: Duration, max_retries: usize) -> Self {
        Self {
            provider,
            timeout,
            max_retries,
        }
    }

    pub fn from_config(provider: SharedProvider, config: &LlmConfig) -> Self {
        Self::new(
            provider,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Generate text for `prompt`, optionally grounding it with `context`
    pub async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String> {
        let request = CompletionRequest::new(prompt::system_prompt(context), prompt);

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(network::RETRY_BASE_DELAY_MS))
            .with_max_delay(Duration::from_secs(network::RETRY_MAX_DELAY_SECS))
            .with_max_times(self.max_retries);

        let attempt = || async {
            with_timeout(
                self.timeout,
                self.provider.complete(&request),
                "chat completion",
            )
            .await
        };

        let response = attempt
            .retry(backoff)
            .when(|e: &SiteError| e.is_recoverable())
            .notify(|e: &SiteError, delay: Duration| {
                warn!(
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Generation attempt failed, retrying"
                );
            })
            .await
            .map_err(|e| {
                let classified = ErrorClassifier::classify_site_error(&e, self.provider.name());
                error!(
                    category = %classified.category,
                    provider = self.provider.name(),
                    "API error: {}",
                    classified.message
                );
                SiteError::GenerationFailed
            })?;

        debug!(
            tokens = response.usage.total(),
            elapsed_ms = response.timing.total_ms,
            "Content generated"
        );

        Ok(clean_markup(&response.content))
    }
}

/// Strip code fences and any preamble before the document type declaration
pub fn clean_markup(raw: &str) -> String {
    let stripped = raw.replace("```html", "").replace("```", "");
    match stripped.find(DOCTYPE) {
        Some(start) => stripped[start..].trim().to_string(),
        None => stripped.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::testing::ScriptedProvider;
    use crate::types::ErrorCategory;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn generator(
        provider: ScriptedProvider,
        retries: usize,
    ) -> (ContentGenerator, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let generator = ContentGenerator::new(provider.clone(), Duration::from_secs(5), retries);
        (generator, provider)
    }

    #[test]
    fn test_clean_markup_strips_fences_and_preamble() {
        let raw = "Sure, here you go:\n```html\n<!DOCTYPE html>\n<html></html>\n```\n";
        assert_eq!(clean_markup(raw), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_clean_markup_plain_text_is_trimmed() {
        assert_eq!(clean_markup("  bakery-site \n"), "bakery-site");
        assert_eq!(clean_markup("```\nMenu, Contact\n```"), "Menu, Contact");
    }

    #[test]
    fn test_clean_markup_cuts_at_first_doctype() {
        let raw = "intro <!DOCTYPE html><p>a</p><!DOCTYPE html>";
        assert_eq!(clean_markup(raw), "<!DOCTYPE html><p>a</p><!DOCTYPE html>");
    }

    #[tokio::test]
    async fn test_generate_sends_layered_system_prompt() {
        let (generator, provider) = generator(
            ScriptedProvider::new().on("page", "```html\n<!DOCTYPE html><p/>```"),
            0,
        );

        let text = generator
            .generate("Create a page", Some("The index.html content is: <main/>"))
            .await
            .unwrap();
        assert_eq!(text, "<!DOCTYPE html><p/>");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user, "Create a page");
        assert!(calls[0].system.starts_with(prompt::ROLE));
        assert!(calls[0].system.contains("The index.html content is: <main/>"));
        assert!(calls[0].system.ends_with(prompt::OUTPUT_RULES));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_generation_failed() {
        let (generator, provider) =
            generator(ScriptedProvider::new().fail_on("x", ErrorCategory::Auth), 3);

        let err = generator.generate("x", None).await.unwrap_err();
        assert!(matches!(err, SiteError::GenerationFailed));
        assert_eq!(err.to_string(), "Failed to generate content");
        // Auth failures are not retried
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let (generator, provider) =
            generator(ScriptedProvider::new().fail_on("x", ErrorCategory::Transient), 0);

        assert!(generator.generate("x", None).await.is_err());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_retryable_errors_are_retried() {
        let (generator, provider) =
            generator(ScriptedProvider::new().fail_on("x", ErrorCategory::Transient), 2);

        assert!(generator.generate("x", None).await.is_err());
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_attempted_once() {
        let (generator, provider) =
            generator(ScriptedProvider::new().fail_on("x", ErrorCategory::ParseError), 2);

        let err = generator.generate("x", None).await.unwrap_err();
        assert!(matches!(err, SiteError::GenerationFailed));
        assert_eq!(provider.calls().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_clean_markup_has_no_fences(body in "[a-z<>/! ]{0,40}") {
            let raw = format!("```html\n{body}\n```");
            let cleaned = clean_markup(&raw);
            prop_assert!(!cleaned.contains("```"));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }
    }
}
