use std::error::Error;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::PollError;

/// Anything that can answer "what changed since `from_date`?".
pub trait StatusSource {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

/// HTTP client for the homework status endpoint.
pub struct PracticumClient {
    token: String,
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl PracticumClient {
    pub fn new(token: String, endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            token,
            endpoint,
            timeout,
            client,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> PollError {
        let cause = if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            describe_chain(&err.without_url())
        };
        PollError::Transport {
            endpoint: self.endpoint.clone(),
            cause,
        }
    }
}

/// Renders an error followed by each of its sources, joined with ": ".
fn describe_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let next = cause.to_string();
        if !text.ends_with(&next) {
            text.push_str(": ");
            text.push_str(&next);
        }
        source = cause.source();
    }
    text
}

impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PollError::HttpStatus {
                endpoint: self.endpoint.clone(),
                code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| PollError::Shape(format!("response body is not valid JSON: {e}")))
    }
}
