use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Success payload of `/query`; `response` is the assistant's answer
/// (markdown text, rendered by the caller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
