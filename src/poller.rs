use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, trace, warn};

use crate::config::BotConfig;
use crate::error::{FailureKind, PollError};
use crate::practicum::{StatusSource, validate};
use crate::state_machine::{PollState, StageOutcome, State};
use crate::telegram::Notifier;
use crate::verdict::Verdicts;

/// What a single iteration ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Iteration {
    /// The response carried no homework.
    NoChange,
    /// A status change was rendered and handed to the notifier.
    StatusChanged(String),
    /// The iteration failed; `notified` is false when the message was a repeat.
    Failed { message: String, notified: bool },
}

/// Polls the status source forever and reports changes to the notifier.
pub struct PollLoop<S, N> {
    source: S,
    notifier: N,
    verdicts: Verdicts,
    endpoint: String,
    retry_period: Duration,
    request_timeout: Duration,
    state: PollState,
}

impl<S: StatusSource, N: Notifier> PollLoop<S, N> {
    pub fn new(source: S, notifier: N, config: &BotConfig, from_date: i64) -> Self {
        Self {
            source,
            notifier,
            verdicts: config.verdicts.clone(),
            endpoint: config.endpoint.clone(),
            retry_period: config.retry_period(),
            request_timeout: config.request_timeout(),
            state: PollState::new(from_date),
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Runs until the process is killed.
    pub async fn run(&mut self) {
        info!(
            "Starting poll loop (interval: {:?}, from_date: {})",
            self.retry_period,
            self.state.cursor()
        );
        loop {
            self.tick().await;
            sleep(self.retry_period).await;
        }
    }

    /// One fetch → validate → translate → notify pass, without the sleep.
    pub async fn tick(&mut self) -> Iteration {
        self.transition(StageOutcome::Success);
        match self.poll_once().await {
            Ok(None) => {
                debug!("No status changes since {}", self.state.cursor());
                self.transition(StageOutcome::Success);
                Iteration::NoChange
            }
            Ok(Some(text)) => {
                info!("Homework status changed: {text}");
                self.deliver(&text).await;
                self.state.clear_error();
                self.transition(StageOutcome::Success);
                Iteration::StatusChanged(text)
            }
            Err(err) => {
                self.transition(StageOutcome::Failure);
                self.handle_failure(&err).await
            }
        }
    }

    async fn poll_once(&mut self) -> Result<Option<String>, PollError> {
        let cursor = self.state.cursor();
        let raw = timeout(self.request_timeout, self.source.fetch(cursor))
            .await
            .map_err(|_| PollError::Transport {
                endpoint: self.endpoint.clone(),
                cause: format!("request timed out after {}s", self.request_timeout.as_secs()),
            })??;
        self.transition(StageOutcome::Success);

        let response = validate(&raw)?;
        if !self.state.advance_cursor(response.current_date) {
            warn!(
                "Server reported current_date {} before cursor {}; keeping cursor",
                response.current_date,
                self.state.cursor()
            );
        }

        let Some(latest) = response.latest() else {
            self.transition(StageOutcome::Empty);
            return Ok(None);
        };
        if response.homeworks.len() > 1 {
            debug!(
                "Response carried {} homeworks; only the first is reported",
                response.homeworks.len()
            );
        }
        self.transition(StageOutcome::Success);

        let text = self.verdicts.translate(latest)?;
        self.transition(StageOutcome::Success);
        Ok(Some(text))
    }

    async fn handle_failure(&mut self, err: &PollError) -> Iteration {
        let message = format!("Program failure: {err}");
        match err.kind() {
            FailureKind::System => error!(
                kind = %err.kind(),
                from_date = self.state.cursor(),
                "{message}"
            ),
            FailureKind::Business => error!(kind = %err.kind(), "{message}"),
        }

        let notified = self.state.record_error(&message);
        if notified {
            self.deliver(&message).await;
        } else {
            debug!("Suppressing repeated failure notification");
        }
        Iteration::Failed { message, notified }
    }

    async fn deliver(&self, text: &str) {
        match self.notifier.send(text).await {
            Ok(()) => debug!("Message sent: {text}"),
            Err(e) => error!("Failed to send message: {e}"),
        }
    }

    fn transition(&mut self, outcome: StageOutcome) {
        let from: State = self.state.phase();
        let to = self.state.step(outcome);
        trace!("{from} -> {to}");
    }
}
