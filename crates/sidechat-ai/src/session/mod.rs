//! Turn orchestration.
//!
//! An `Orchestrator` owns the history and drives one user turn at a time:
//! append the prompt, call the model, run at most one requested tool,
//! call the model again with the tool result, append the answer and
//! notify the presenter.

mod chat;
mod manager;
mod types;


pub use manager::Orchestrator;
pub use types::{NullPresenter, Presenter, TurnOutcome, TurnState};
