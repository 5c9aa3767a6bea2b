//! Errors from the Telegram Bot API client.

use thiserror::Error;

/// Why a message did not reach the chat.
///
/// None of these stop the poll loop; they are logged and dropped.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Telegram answered with a non-2xx status or `"ok": false`.
    #[error("Telegram API error (status {status}): {description}")]
    ApiError { status: u16, description: String },

    /// Failure below HTTP (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
