//! # Oracle HTTP Client
//!
//! Wrapper around an OpenAI-compatible chat completion endpoint. The
//! oracle turns free-text intent into structured mutation payloads; this
//! module only moves text back and forth, classification and validation
//! live in netsphere-core.

use netsphere_core::primitives::ORACLE_HISTORY_WINDOW;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors from the oracle client layer.
#[derive(Debug)]
pub enum OracleError {
    /// Cannot reach the oracle endpoint.
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    Unauthorized,
    /// 429 Too Many Requests.
    RateLimited,
    /// Endpoint returned a 5xx error.
    ServerError(u16, String),
    /// Response body did not carry a completion.
    ParseError(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to oracle at {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing API key"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::ServerError(status, msg) => write!(f, "Oracle error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for OracleError {}

/// One prior intent/response exchange, kept for oracle context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub intent: String,
    #[serde(default)]
    pub response: Option<String>,
}

/// HTTP client for the external oracle.
#[derive(Clone)]
pub struct OracleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OracleClient {
    /// Create a new client pointing at the given chat-completion base URL.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Request a completion for the given system prompt, recent history
    /// and user intent. Only the most recent turns within the history
    /// window are forwarded.
    pub async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        user: &str,
    ) -> Result<String, OracleError> {
        let mut messages = vec![serde_json::json!({"role": "system", "content": system})];
        let recent = if history.len() > ORACLE_HISTORY_WINDOW {
            &history[history.len() - ORACLE_HISTORY_WINDOW..]
        } else {
            history
        };
        for turn in recent {
            messages.push(serde_json::json!({"role": "user", "content": turn.intent}));
            if let Some(response) = &turn.response {
                messages.push(serde_json::json!({"role": "assistant", "content": response}));
            }
        }
        messages.push(serde_json::json!({"role": "user", "content": user}));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "response_format": {"type": "json_object"},
        });

        let url = format!("{}/chat/completions", self.base_url);
        let mut req = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| OracleError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OracleError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OracleError::ServerError(status.as_u16(), body));
        }

        let value: Value = resp
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| OracleError::ParseError("empty or missing completion".to_string()))?;
        Ok(content.to_string())
    }
}

/// Build the strict-JSON system prompt for the given state description.
///
/// When the intent was classified as a removal, the prompt additionally
/// spells out the removal payload shape.
#[must_use]
pub fn build_system_prompt(state_description: &str, removal: bool) -> String {
    let mut prompt = format!(
        r#"You are a network diagram assistant. Generate JSON representations of network diagrams based on user commands.

{state_description}

Respond STRICTLY with a JSON object with EXACTLY these field names:
{{
    "nodes": [
        {{"id": "unique_id", "name": "Human Readable Name", "type": "router|switch|server|computer|firewall|cloud|hub|ethernet_switch|load_balancer|database|wireless_ap|voip_phone|printer|storage", "details": {{}}}}
    ],
    "connections": [
        {{"source": "node1_id", "target": "node2_id", "type": "standard|dashed|thick|red|green|wireless"}}
    ]
}}

IMPORTANT:
- Use ONLY "nodes" and "connections" as top-level keys
- Never use variations like "node" or "connection"
- Include ALL required fields for each node and connection
- If the command is unclear or incomplete, respond with {{"error": "Please provide more details about what you want to add or connect"}}
- Verify that referenced nodes exist before creating connections"#
    );

    if removal {
        prompt.push_str(
            r#"
For removal commands, respond STRICTLY with:
{
    "remove": {
        "nodes": ["node_id1", "node_id2"],
        "connections": [{"source": "node1_id", "target": "node2_id"}]
    }
}"#,
        );
    }
    prompt
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_state_description() {
        let prompt = build_system_prompt("Nodes: r1 (router).", false);
        assert!(prompt.contains("Nodes: r1 (router)."));
        assert!(prompt.contains("\"nodes\""));
        assert!(!prompt.contains("\"remove\""));
    }

    #[test]
    fn prompt_adds_removal_shape_for_removal_intents() {
        let prompt = build_system_prompt("The current diagram is empty. ", true);
        assert!(prompt.contains("\"remove\""));
        assert!(prompt.contains("For removal commands"));
    }
}
