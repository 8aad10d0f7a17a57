//! Telegram transport for traty:
//! - **Long polling** (`poller`) - `getUpdates` loop with reconnect backoff
//! - **Bot API client** (`api`) - `UpdateTransport` seam plus the HTTP impl
//! - **Updates** (`updates`) - envelope decoding and inbound event mapping
//! - **Keyboards** (`keyboard`) - choice rows as one-time reply keyboards
//!
//! Every text update is routed straight to the conversation state machine;
//! there is no catch-all handler competing for inbound text.

pub mod api;
pub mod keyboard;
pub mod poller;
pub mod updates;

pub use api::{HttpTelegramApi, TransportError, UpdateTransport};
pub use poller::{LongPollRunner, ReconnectPolicy};
