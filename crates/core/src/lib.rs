//! Core of the traty expense bot: the conversational data-collection state
//! machine, the per-session record accumulator, and the session registry.
//! Transport (Telegram) and persistence (Google Sheets) are external
//! collaborators behind the [`sink::ExpenseSink`] seam and the types in
//! [`flow::states`].

pub mod config;
pub mod domain;
pub mod errors;
pub mod flow;
pub mod session;
pub mod sink;

pub use domain::choices::{Category, Payer, PaymentMethod};
pub use domain::expense::{ExpenseDraft, ExpenseRecord, SessionId};
pub use errors::{DomainError, SinkError};
pub use flow::engine::ExpenseFlow;
pub use flow::states::{ConversationState, InboundEvent, Reply, StepAction, StepOutcome};
pub use session::{Session, SessionRegistry};
pub use sink::{ExpenseSink, InMemorySink};
