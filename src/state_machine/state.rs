use std::fmt;

/// Phases of one poll cycle.
///
/// Each cycle flows through: FETCHING → VALIDATING → (NO_CHANGE | TRANSLATING
/// → NOTIFYING) → SLEEPING, and any failure jumps straight to SLEEPING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Fetching,
    Validating,
    NoChange,
    Translating,
    Notifying,
    Sleeping,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => write!(f, "IDLE"),
            State::Fetching => write!(f, "FETCHING"),
            State::Validating => write!(f, "VALIDATING"),
            State::NoChange => write!(f, "NO_CHANGE"),
            State::Translating => write!(f, "TRANSLATING"),
            State::Notifying => write!(f, "NOTIFYING"),
            State::Sleeping => write!(f, "SLEEPING"),
        }
    }
}

/// What the stage that just ran produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// Validation passed but the response carried no homework.
    Empty,
    Failure,
}

pub struct StateMachine;

impl StateMachine {
    /// Computes the phase that follows `current` given the stage outcome.
    ///
    /// The machine never terminates: SLEEPING always leads back to FETCHING.
    pub fn next(current: State, outcome: StageOutcome) -> State {
        if outcome == StageOutcome::Failure {
            return State::Sleeping;
        }
        match current {
            State::Idle | State::Sleeping => State::Fetching,
            State::Fetching => State::Validating,
            State::Validating => match outcome {
                StageOutcome::Empty => State::NoChange,
                _ => State::Translating,
            },
            State::Translating => State::Notifying,
            State::NoChange | State::Notifying => State::Sleeping,
        }
    }
}

/// Mutable state owned by the poll loop for the life of the process.
#[derive(Debug, Clone)]
pub struct PollState {
    cursor: i64,
    last_notified_error: Option<String>,
    phase: State,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_notified_error: None,
            phase: State::Idle,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn phase(&self) -> State {
        self.phase
    }

    /// Applies a stage outcome and returns the new phase.
    pub fn step(&mut self, outcome: StageOutcome) -> State {
        self.phase = StateMachine::next(self.phase, outcome);
        self.phase
    }

    /// Moves the cursor to the server-reported time.
    ///
    /// Returns `false` and keeps the current cursor when `next` is older.
    pub fn advance_cursor(&mut self, next: i64) -> bool {
        if next < self.cursor {
            return false;
        }
        self.cursor = next;
        true
    }

    /// A status change reached the notifier; the next failure is news again.
    pub fn clear_error(&mut self) {
        self.last_notified_error = None;
    }

    /// Records a failure message. Returns `true` when it differs from the
    /// last one surfaced and therefore should be sent.
    pub fn record_error(&mut self, message: &str) -> bool {
        if self.last_notified_error.as_deref() == Some(message) {
            return false;
        }
        self.last_notified_error = Some(message.to_string());
        true
    }
}
