//! Neo4j-backed retriever using the HTTP transactional Cypher endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::GraphConfig;
use crate::context::keywords::{extract_keywords, rank_by_hits};
use crate::context::{ContextFact, ContextRetrievalError, ContextRetriever, MAX_CONTEXT_FACTS};

/// Candidate nodes fetched before local ranking.
const CANDIDATE_LIMIT: u32 = 25;

const MATCH_NODES_CYPHER: &str = "\
MATCH (n)
WHERE n.name IS NOT NULL
  AND any(k IN $keywords WHERE toLower(n.name) CONTAINS k
                            OR toLower(coalesce(n.description, '')) CONTAINS k)
RETURN n.name AS name,
       coalesce(n.type, head(labels(n)), 'Entity') AS kind,
       coalesce(n.description, '') AS description
LIMIT $limit";

#[derive(Debug, Serialize)]
struct CypherRequest {
    statements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CypherResponse {
    #[serde(default)]
    results: Vec<CypherResult>,
    #[serde(default)]
    errors: Vec<CypherError>,
}

#[derive(Debug, Deserialize)]
struct CypherResult {
    #[serde(default)]
    data: Vec<CypherRow>,
}

#[derive(Debug, Deserialize)]
struct CypherRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CypherError {
    code: String,
    message: String,
}

/// One matching node before ranking.
#[derive(Debug, Clone, PartialEq)]
struct GraphNode {
    name: String,
    kind: String,
    description: String,
}

impl GraphNode {
    fn into_fact(self) -> ContextFact {
        let value = if self.description.trim().is_empty() {
            self.kind
        } else {
            format!("{}: {}", self.kind, self.description.trim())
        };
        ContextFact::new(self.name, value)
    }
}

pub struct Neo4jRetriever {
    client: Client,
    commit_url: String,
    username: String,
    password: String,
}

impl Neo4jRetriever {
    pub fn new(config: &GraphConfig, timeout: Duration) -> Result<Self, ContextRetrievalError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            commit_url: format!("{}/db/{}/tx/commit", config.http_url, config.database),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    async fn query_nodes(&self, keywords: &[String]) -> Result<Vec<GraphNode>, ContextRetrievalError> {
        let body = CypherRequest {
            statements: vec![json!({
                "statement": MATCH_NODES_CYPHER,
                "parameters": { "keywords": keywords, "limit": CANDIDATE_LIMIT },
            })],
        };

        let response = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.username, Some(&self.password))
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ContextRetrievalError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CypherResponse = response.json().await?;
        parse_nodes(parsed)
    }
}

fn parse_nodes(response: CypherResponse) -> Result<Vec<GraphNode>, ContextRetrievalError> {
    if let Some(err) = response.errors.first() {
        return Err(ContextRetrievalError::Query(format!(
            "{}: {}",
            err.code, err.message
        )));
    }

    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ContextRetrievalError::Malformed("no result set".to_string()))?;

    result
        .data
        .into_iter()
        .map(|r| match r.row.as_slice() {
            [name, kind, description] => Ok(GraphNode {
                name: as_text(name),
                kind: as_text(kind),
                description: as_text(description),
            }),
            other => Err(ContextRetrievalError::Malformed(format!(
                "expected 3 columns, got {}",
                other.len()
            ))),
        })
        .filter(|node| !matches!(node, Ok(n) if n.name.is_empty()))
        .collect()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ContextRetriever for Neo4jRetriever {
    async fn retrieve(&self, question: &str) -> Result<Vec<ContextFact>, ContextRetrievalError> {
        let keywords = extract_keywords(question);
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let nodes = self.query_nodes(&keywords).await?;
        debug!(
            "Graph returned {} candidate nodes for keywords {:?}",
            nodes.len(),
            keywords
        );

        Ok(rank_by_hits(nodes, &keywords, MAX_CONTEXT_FACTS, |n| {
            format!("{} {}", n.name, n.description)
        })
        .into_iter()
        .map(GraphNode::into_fact)
        .collect())
    }

    fn backend(&self) -> &'static str {
        "neo4j"
    }
}
