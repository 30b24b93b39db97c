use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::LlmClient;
use crate::config::LlmConfig;
use crate::errors::{EduMarketError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API 客户端（非流式）
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| EduMarketError::upstream(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            self.api_key
                .parse()
                .map_err(|_| EduMarketError::validation("LLM API key 含有非法字符"))?,
        );
        headers.insert(
            "anthropic-version",
            ANTHROPIC_VERSION
                .parse()
                .map_err(|_| EduMarketError::validation("anthropic-version 头无效"))?,
        );
        Ok(headers)
    }

    fn map_http_error(status: u16, body: &str) -> EduMarketError {
        match status {
            401 | 403 => {
                EduMarketError::authentication("LLM API key is invalid or lacks permission")
            }
            429 => EduMarketError::upstream("LLM rate limit exceeded"),
            _ => EduMarketError::upstream(format!(
                "LLM request failed with status {status}: {body}"
            )),
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [RequestMessage {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if status != 200 {
            warn!("LLM 请求失败: {} {}", status, text);
            return Err(Self::map_http_error(status, &text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| EduMarketError::upstream(format!("无法解析 LLM 响应: {e}")))?;

        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            debug!("LLM 响应因 max_tokens 被截断");
        }

        let output: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if output.is_empty() {
            return Err(EduMarketError::upstream("LLM response contained no text"));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 100,
            system: "sys",
            messages: [RequestMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "sys");
    }

    #[test]
    fn test_response_text_blocks() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"id":"x","content":[{"type":"text","text":"{\"a\":1}"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(parsed.content[0].text.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_http_error_mapping() {
        assert_eq!(AnthropicClient::map_http_error(401, "").code(), "E010");
        assert_eq!(AnthropicClient::map_http_error(500, "boom").code(), "E012");
    }
}
