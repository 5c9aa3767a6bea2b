mod state;

pub use state::{PollState, StageOutcome, State};
