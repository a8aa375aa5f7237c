//! Context Retriever: supplementary facts from the knowledge graph.
//!
//! Retrieval is optional and best-effort. `retrieve_or_empty` is the only entry
//! point the ask pipeline uses: it bounds the lookup with a timeout and turns
//! every failure into an empty fact list.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod graph;
pub mod keywords;

/// Facts handed to the prompt composer per question, at most.
pub const MAX_CONTEXT_FACTS: usize = 5;

/// A single fact from the graph store, e.g. `Rust` → `Skill: systems programming`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFact {
    pub key: String,
    pub value: String,
}

impl ContextFact {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContextRetrievalError {
    #[error("graph store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("graph store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("graph query failed: {0}")]
    Query(String),

    #[error("unexpected graph response: {0}")]
    Malformed(String),
}

/// Looks up facts relevant to a question. Implementations return at most
/// `MAX_CONTEXT_FACTS`, most relevant first.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve(&self, question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Used when no graph store is configured.
pub struct NoopRetriever;

#[async_trait]
impl ContextRetriever for NoopRetriever {
    async fn retrieve(&self, _question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError> {
        Ok(Vec::new())
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}

/// Runs the retriever under `timeout`. Errors and timeouts degrade to no facts.
pub async fn retrieve_or_empty(
    retriever: &dyn ContextRetriever,
    question: &str,
    timeout: Duration,
) -> Vec<ContextFact> {
    match tokio::time::timeout(timeout, retriever.retrieve(question)).await {
        Ok(Ok(mut facts)) => {
            facts.truncate(MAX_CONTEXT_FACTS);
            debug!(
                "Retrieved {} context facts from {}",
                facts.len(),
                retriever.backend()
            );
            facts
        }
        Ok(Err(e)) => {
            warn!("Context retrieval failed, continuing without context: {e}");
            Vec::new()
        }
        Err(_) => {
            warn!(
                "Context retrieval timed out after {}ms, continuing without context",
                timeout.as_millis()
            );
            Vec::new()
        }
    }
}
