use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::NotifyError;

/// A sink for human-readable messages.
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers messages to one chat through the Telegram Bot API.
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    base_url: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(
        token: String,
        chat_id: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            token,
            chat_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let reply = response.json::<BotApiReply>().await.ok();

        match reply {
            Some(BotApiReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotApiReply { description, .. }) => Err(NotifyError::ApiError {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "unknown error".to_string()),
            }),
            None => Err(NotifyError::ApiError {
                status: status.as_u16(),
                description: "unreadable response body".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> TelegramNotifier {
        TelegramNotifier::new(
            "123:abc".into(),
            "42".into(),
            format!("{}/", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_text_to_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).send("hello").await.unwrap();
    }

    #[tokio::test]
    async fn api_rejection_carries_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send("hello").await.unwrap_err();
        match err {
            NotifyError::ApiError {
                status,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_is_still_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::ApiError { status: 502, .. }));
    }

    #[tokio::test]
    async fn network_error_hides_token() {
        let notifier = TelegramNotifier::new(
            "123:abc".into(),
            "42".into(),
            "http://127.0.0.1:9".into(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::NetworkError(_)));
        assert!(!err.to_string().contains("123:abc"));
    }
}
