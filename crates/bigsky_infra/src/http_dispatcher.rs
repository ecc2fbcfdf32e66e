use std::time::Duration;

use anyhow::Context as _;
use bigsky_app::Dispatcher;
use bigsky_config::{ApiConfig, RetryConfig};
use bigsky_domain::{ChatCompletion, Error, Payload};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::retry::retry_with_config;

/// Release version, overridable at build time through `APP_VERSION`
pub const VERSION: &str = match option_env!("APP_VERSION") {
    None => env!("CARGO_PKG_VERSION"),
    Some(v) => v,
};

/// Sends payloads to an OpenAI compatible `chat/completions` endpoint
pub struct HttpDispatcher {
    client: Client,
    url: Url,
    api_key: Option<String>,
    model: Option<String>,
    retry: RetryConfig,
}

impl HttpDispatcher {
    pub fn new(api: &ApiConfig, retry: RetryConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .default_headers(Self::headers())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: api.completions_url()?,
            api_key: api.api_key.clone(),
            model: api.model.clone(),
            retry,
        })
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("bigsky-eval/{VERSION}"))
                .unwrap_or(HeaderValue::from_static("bigsky-eval")),
        );
        headers
    }

    /// Request body: the payload as captured, with the model overridden when
    /// configured
    fn body(&self, payload: &Payload) -> anyhow::Result<Value> {
        let mut body = serde_json::to_value(payload)?;
        if let (Some(model), Value::Object(body)) = (&self.model, &mut body) {
            body.insert("model".to_string(), Value::String(model.clone()));
        }
        Ok(body)
    }

    async fn send(&self, body: &Value) -> anyhow::Result<ChatCompletion> {
        let mut request = self.client.post(self.url.clone()).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|error| {
            if error.is_timeout() || error.is_connect() {
                Error::Retryable(error.into())
            } else {
                Error::Transport(error.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, text).into());
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|error| Error::Transport(format!("Invalid completion response: {error}")))?;
        debug!(id = ?completion.id, choices = completion.choices.len(), "Received completion");
        Ok(completion)
    }

    fn status_error(&self, status: StatusCode, text: String) -> Error {
        let message = format!("{status}: {text}");
        if self.retry.is_retryable(status.as_u16()) {
            Error::Retryable(anyhow::anyhow!(message))
        } else {
            Error::Transport(message)
        }
    }
}

#[async_trait::async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, payload: &Payload) -> anyhow::Result<ChatCompletion> {
        let body = self.body(payload)?;
        debug!(url = %self.url, messages = payload.messages.len(), "Sending completion request");

        let suppress = self.retry.suppress_retry_errors;
        let notify = move |error: &anyhow::Error, delay: Duration| {
            if !suppress {
                warn!(error = %error, delay_ms = delay.as_millis() as u64, "Retrying completion request");
            }
        };

        retry_with_config(&self.retry, || self.send(&body), Some(notify)).await
    }
}

#[cfg(test)]
mod tests {
    use bigsky_domain::{ToolCall, ToolCallArguments, ToolName};
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn payload() -> Payload {
        Payload::from_raw(
            &json!({
                "model": "gpt-4o",
                "tools": [],
                "messages": [{"role": "system", "content": "You route."}]
            })
            .to_string(),
        )
        .unwrap()
    }

    fn api(server: &mockito::Server) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(&format!("{}/v1", server.url())).unwrap(),
            api_key: Some("sk-test".to_string()),
            model: None,
            timeout_secs: 5,
        }
    }

    fn retry() -> RetryConfig {
        RetryConfig::default().min_delay_ms(1u64).max_retry_attempts(2usize)
    }

    #[tokio::test]
    async fn test_dispatch_posts_payload_and_decodes_tool_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("user-agent", format!("bigsky-eval/{VERSION}").as_str())
            .match_body(Matcher::PartialJson(json!({"model": "gpt-4.1"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "chatcmpl-7",
                    "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": [
                        {"id": "call_1", "type": "function", "function": {"name": "add_page", "arguments": "{}"}}
                    ]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let api = ApiConfig { model: Some("gpt-4.1".to_string()), ..api(&server) };
        let fixture = HttpDispatcher::new(&api, retry()).unwrap();

        let actual = fixture.dispatch(&payload()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(actual.id.as_deref(), Some("chatcmpl-7"));
        let expected = Some(ToolCall {
            name: ToolName::new("add_page"),
            arguments: ToolCallArguments::new("{}"),
        });
        assert_eq!(actual.first_tool_call(), expected);
    }

    #[tokio::test]
    async fn test_retryable_status_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;
        let fixture = HttpDispatcher::new(&api(&server), retry()).unwrap();

        let actual = fixture.dispatch(&payload()).await;

        mock.assert_async().await;
        let error = actual.unwrap_err();
        assert!(matches!(error.downcast_ref::<Error>(), Some(Error::Retryable(_))));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_body("bad request")
            .expect(1)
            .create_async()
            .await;
        let fixture = HttpDispatcher::new(&api(&server), retry()).unwrap();

        let actual = fixture.dispatch(&payload()).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(
            actual.to_string(),
            "Completion backend request failed: 400 Bad Request: bad request"
        );
    }

    #[test]
    fn test_body_keeps_payload_model_without_override() {
        let api = ApiConfig {
            base_url: Url::parse("http://localhost/v1/").unwrap(),
            api_key: None,
            model: None,
            timeout_secs: 5,
        };
        let fixture = HttpDispatcher::new(&api, retry()).unwrap();

        let actual = fixture.body(&payload()).unwrap();

        assert_eq!(actual["model"], json!("gpt-4o"));
        assert_eq!(actual["messages"], json!([{"role": "system", "content": "You route."}]));
    }
}
