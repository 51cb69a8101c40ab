//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the summarization LLM, reached through an
//! OpenAI-compatible chat-completion gateway.
//! It implements the `SummarizationService` port from the `core` crate.

use std::time::Duration;

use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reskick_core::{
    domain::SummaryStyle,
    ports::{PortError, PortResult, SummarizationService},
};
use serde::Deserialize;
use tracing::error;

pub const RATE_LIMITED_MESSAGE: &str = "Quá nhiều yêu cầu, vui lòng thử lại sau.";
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "Hết lượt sử dụng AI, vui lòng nạp thêm credits.";
pub const GATEWAY_FAILED_MESSAGE: &str = "Lỗi AI, vui lòng thử lại.";

const CONCISE_INSTRUCTIONS: &str =
    "Tóm tắt ngắn gọn trong 2-3 câu bằng tiếng Việt. Chỉ nêu ý chính nhất.";
const DETAILED_INSTRUCTIONS: &str = "Tóm tắt chi tiết trong 5-7 câu bằng tiếng Việt. Bao gồm các luận điểm chính, ví dụ quan trọng và kết luận.";
const EASY_INSTRUCTIONS: &str = "Giải thích nội dung bằng tiếng Việt một cách đơn giản, dễ hiểu như đang nói chuyện với học sinh cấp 3. Dùng ngôn ngữ thân thiện, có thể dùng ví dụ gần gũi.";

const SYSTEM_PROMPT_TEMPLATE: &str = "Bạn là trợ lý AI giúp học sinh Việt Nam hiểu các bài viết tiếng Anh.
Nhiệm vụ: {instructions}
Chỉ trả lời bằng tiếng Việt. Không thêm tiêu đề hay ghi chú. Chỉ trả lại nội dung tóm tắt.";

const USER_INPUT_TEMPLATE: &str = "Hãy tóm tắt bài viết tiếng Anh sau:\n\n{text}";

/// The task line for a style. Unknown styles get the concise instructions.
pub fn instructions_for(style: &SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Detailed => DETAILED_INSTRUCTIONS,
        SummaryStyle::Easy => EASY_INSTRUCTIONS,
        SummaryStyle::Concise | SummaryStyle::Other(_) => CONCISE_INSTRUCTIONS,
    }
}

pub fn system_prompt(style: &SummaryStyle) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{instructions}", instructions_for(style))
}

//=========================================================================================
// Response Shape
//=========================================================================================

// Only the first choice's content is read; everything else is optional so that
// gateways which omit fields still parse.
#[derive(Deserialize, Default)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize, Default)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    fn first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` using an OpenAI-compatible gateway.
///
/// Requests are built with `async-openai`'s types but sent with a plain HTTP
/// client so the gateway's status codes can be mapped one by one and no request
/// is ever retried.
#[derive(Clone)]
pub struct GatewaySummaryAdapter {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GatewaySummaryAdapter {
    /// Creates a new `GatewaySummaryAdapter`. `base_url` is the API root that
    /// `/chat/completions` is appended to.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> PortResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn build_request(
        &self,
        text: &str,
        style: &SummaryStyle,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt(style))
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(USER_INPUT_TEMPLATE.replace("{text}", text))
                .build()?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for GatewaySummaryAdapter {
    /// Summarizes `text` in Vietnamese using the instructions for `style`.
    async fn summarize(&self, text: &str, style: &SummaryStyle) -> PortResult<String> {
        let request = self
            .build_request(text, style)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(PortError::RateLimited(RATE_LIMITED_MESSAGE.to_string()))
            }
            StatusCode::PAYMENT_REQUIRED => {
                return Err(PortError::QuotaExhausted(QUOTA_EXHAUSTED_MESSAGE.to_string()))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                error!("AI gateway error: {} {}", status, body);
                return Err(PortError::Unexpected(GATEWAY_FAILED_MESSAGE.to_string()));
            }
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(completion.first_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::spawn_stub;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn stub_replying(status: AxumStatus, body: Value) -> (Router, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let router = Router::new().route(
            "/chat/completions",
            post(move |Json(request): Json<Value>| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    captured.lock().unwrap().push(request);
                    (status, Json(body))
                }
            }),
        );
        (router, seen)
    }

    async fn adapter_for(router: Router) -> GatewaySummaryAdapter {
        let base = spawn_stub(router).await;
        GatewaySummaryAdapter::new(base, "gw-key", "google/gemini-3-flash-preview").unwrap()
    }

    #[test]
    fn unknown_styles_fall_back_to_concise_instructions() {
        let fallback = system_prompt(&SummaryStyle::from_key("haiku"));
        assert_eq!(fallback, system_prompt(&SummaryStyle::Concise));
        assert!(fallback.contains(CONCISE_INSTRUCTIONS));
        assert!(system_prompt(&SummaryStyle::Easy).contains("học sinh cấp 3"));
    }

    #[tokio::test]
    async fn sends_system_and_user_messages_with_the_configured_model() {
        let (router, seen) = stub_replying(
            AxumStatus::OK,
            json!({ "choices": [{ "message": { "role": "assistant", "content": "Bản tóm tắt" } }] }),
        );
        let adapter = adapter_for(router).await;

        let summary = adapter
            .summarize("The quick brown fox...", &SummaryStyle::Detailed)
            .await
            .unwrap();

        assert_eq!(summary, "Bản tóm tắt");
        let request = seen.lock().unwrap().remove(0);
        assert_eq!(request["model"], "google/gemini-3-flash-preview");
        assert_eq!(request["messages"][0]["role"], "system");
        assert!(request["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains(DETAILED_INSTRUCTIONS));
        assert_eq!(request["messages"][1]["role"], "user");
        assert_eq!(
            request["messages"][1]["content"],
            "Hãy tóm tắt bài viết tiếng Anh sau:\n\nThe quick brown fox..."
        );
    }

    #[tokio::test]
    async fn missing_content_is_an_empty_summary() {
        let (router, _) = stub_replying(AxumStatus::OK, json!({ "choices": [] }));
        let adapter = adapter_for(router).await;

        let summary = adapter.summarize("text", &SummaryStyle::Concise).await.unwrap();

        assert_eq!(summary, "");
    }

    #[tokio::test]
    async fn rate_limits_and_quota_map_to_dedicated_errors() {
        let (router, _) = stub_replying(AxumStatus::TOO_MANY_REQUESTS, json!({}));
        let adapter = adapter_for(router).await;
        assert_eq!(
            adapter.summarize("t", &SummaryStyle::Concise).await.unwrap_err(),
            PortError::RateLimited(RATE_LIMITED_MESSAGE.into())
        );

        let (router, _) = stub_replying(AxumStatus::PAYMENT_REQUIRED, json!({}));
        let adapter = adapter_for(router).await;
        assert_eq!(
            adapter.summarize("t", &SummaryStyle::Concise).await.unwrap_err(),
            PortError::QuotaExhausted(QUOTA_EXHAUSTED_MESSAGE.into())
        );
    }

    #[tokio::test]
    async fn other_failures_get_the_generic_message() {
        let (router, seen) = stub_replying(AxumStatus::SERVICE_UNAVAILABLE, json!({}));
        let adapter = adapter_for(router).await;

        let err = adapter.summarize("t", &SummaryStyle::Easy).await.unwrap_err();

        assert_eq!(err.user_message(), GATEWAY_FAILED_MESSAGE);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
