//! Terminal quiz client: talks to the generation service and runs one quiz
//! session at a time in memory.

pub mod api;
pub mod app;
pub mod form;
pub mod guard;
pub mod session;
pub mod terminal;
pub mod timer;
pub mod tui;
pub mod ui;

pub use api::{ClientError, QuizApiClient, QuizGenerator};
pub use app::{ClientApp, KeyOutcome};
pub use session::{QuizSession, QuizSettings, SessionError, SessionPhase};
