//! Scripted provider for pipeline, orchestrator and router tests.
//!
//! Replies are routed by substring match on the user prompt; the first rule
//! that matches wins. An optional gate holds every call whose prompt contains
//! a needle until the test releases permits.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Semaphore;

use super::{CompletionRequest, LlmProvider, LlmResponse};
use crate::types::{ErrorCategory, LlmError, Result, SiteError};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(ErrorCategory),
}

struct Gate {
    needle: String,
    permits: Arc<Semaphore>,
}

pub(crate) struct ScriptedProvider {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<CompletionRequest>>,
    gate: Option<Gate>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Reply with `text` when the user prompt contains `needle`
    pub fn on(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    /// Fail with `category` when the user prompt contains `needle`
    pub fn fail_on(mut self, needle: &str, category: ErrorCategory) -> Self {
        self.rules.push((needle.to_string(), Reply::Fail(category)));
        self
    }

    /// Replace the reply for `needle`, keeping rule order
    pub fn replace(mut self, needle: &str, text: &str) -> Self {
        self.rules.retain(|(n, _)| n != needle);
        self.rules
            .insert(0, (needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    /// Hold calls whose prompt contains `needle` until permits are added
    pub fn gated(mut self, needle: &str) -> (Self, Arc<Semaphore>) {
        let permits = Arc::new(Semaphore::new(0));
        self.gate = Some(Gate {
            needle: needle.to_string(),
            permits: Arc::clone(&permits),
        });
        (self, permits)
    }

    /// Two-page bakery site with noisy model output
    pub fn bakery() -> Self {
        Self::new()
            .on("suggest a concise, professional project name", "  Bakery Site\n")
            .on("list needed pages", "Menu, Contact, ")
            .on(
                "generate detailed descriptions",
                r#"Here are the pages:
[
  {"name": "Menu", "description": "Breads and cakes", "fileName": "menu.html", "generated": true},
  {"name": "Contact", "description": "Hours and map", "fileName": "contact.html"}
]
Enjoy!"#,
            )
            .on(
                "Create a professional",
                "Sure! Here is your page:\n```html\n<!DOCTYPE html>\n<html><body><h1>Bakery</h1></body></html>\n```",
            )
            .on(
                "Create a Menu page",
                "<!DOCTYPE html>\n<html><body><h1>Menu</h1></body></html>",
            )
            .on(
                "Create a Contact page",
                "```html\n<!DOCTYPE html>\n<html><body><h1>Contact</h1></body></html>\n```",
            )
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse> {
        if let Some(gate) = &self.gate
            && request.user.contains(gate.needle.as_str())
        {
            gate.permits
                .acquire()
                .await
                .map_err(|e| SiteError::LlmApi(e.to_string()))?
                .forget();
        }

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Text(text)) => Ok(LlmResponse::content_only(text)),
            Some(Reply::Fail(category)) => Err(SiteError::Llm(LlmError::with_provider(
                category,
                "scripted failure",
                "scripted",
            ))),
            None => Err(SiteError::Llm(LlmError::with_provider(
                ErrorCategory::BadRequest,
                format!("no scripted reply for prompt: {}", request.user),
                "scripted",
            ))),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
