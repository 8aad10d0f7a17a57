use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::domain::expense::{ExpenseDraft, SessionId};
use crate::flow::engine::ExpenseFlow;
use crate::flow::prompts;
use crate::flow::states::{ConversationState, InboundEvent, Reply};
use crate::sink::ExpenseSink;

/// One user's interaction context: current machine state plus the record
/// under construction.
#[derive(Clone, Debug)]
pub struct Session {
    pub state: ConversationState,
    pub draft: ExpenseDraft,
}

impl Session {
    fn new() -> Self {
        Self { state: ConversationState::AwaitingAmount, draft: ExpenseDraft::default() }
    }
}

/// Process-wide map from session identity to conversation state. Inbound
/// events for one session are serialized on a per-session mutex; distinct
/// sessions proceed independently. The registry map lock is only held while
/// resolving the entry, never across a flow step or a sink call.
pub struct SessionRegistry {
    flow: ExpenseFlow,
    sink: Arc<dyn ExpenseSink>,
    sessions: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new(sink: Arc<dyn ExpenseSink>) -> Self {
        Self { flow: ExpenseFlow, sink, sessions: Mutex::new(HashMap::new()) }
    }

    /// Returns the existing session handle or creates one in the initial
    /// state.
    fn resolve(&self, id: SessionId) -> Arc<tokio::sync::Mutex<Session>> {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            sessions.entry(id).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::new()))),
        )
    }

    /// Forces a session back to its initial state, discarding any partial
    /// record.
    pub async fn reset(&self, id: SessionId) {
        let handle = self.resolve(id);
        let mut session = handle.lock().await;
        session.state = ConversationState::AwaitingAmount;
        session.draft.clear();
        info!(session_id = %id, "session reset to initial state");
    }

    /// The single entry point Transport calls: runs one machine step for the
    /// session and returns the prompt to send, if any. When the step demands
    /// persistence the transition commits only after the sink call resolves;
    /// a failed append parks the session in `PendingPersist` with the draft
    /// intact.
    pub async fn advance(&self, id: SessionId, inbound: InboundEvent) -> Option<Reply> {
        let handle = self.resolve(id);
        let mut guard = handle.lock().await;
        let session = &mut *guard;

        let today = Local::now().date_naive();
        let outcome = self.flow.advance(&session.state, &mut session.draft, &inbound, today);
        debug!(
            session_id = %id,
            from = ?outcome.from,
            to = ?outcome.next,
            actions = ?outcome.actions,
            "conversation step applied"
        );

        if !outcome.demands_persist() {
            session.state = outcome.next;
            return outcome.reply;
        }

        let record = match session.draft.complete() {
            Ok(record) => record,
            Err(error) => {
                // Unreachable through the flow itself; reset rather than
                // strand the session.
                warn!(session_id = %id, error = %error, "persist demanded on incomplete draft");
                session.state = ConversationState::AwaitingAmount;
                session.draft.clear();
                return Some(prompts::amount_prompt());
            }
        };

        match self.sink.append(&record).await {
            Ok(()) => {
                info!(
                    session_id = %id,
                    date = %record.formatted_date(),
                    amount = %record.amount,
                    category = record.category.label(),
                    "expense appended to sheet"
                );
                session.draft.clear();
                session.state = outcome.next;
                outcome.reply
            }
            Err(error) => {
                warn!(session_id = %id, error = %error, "sheet append failed; record retained");
                session.state = ConversationState::PendingPersist;
                Some(prompts::persist_failed_notice())
            }
        }
    }

    /// Current state snapshot, creating the session if needed.
    pub async fn state_of(&self, id: SessionId) -> ConversationState {
        let handle = self.resolve(id);
        let session = handle.lock().await;
        session.state.clone()
    }

    /// Draft snapshot, creating the session if needed.
    pub async fn draft_of(&self, id: SessionId) -> ExpenseDraft {
        let handle = self.resolve(id);
        let session = handle.lock().await;
        session.draft.clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Local;
    use rust_decimal::Decimal;

    use crate::domain::choices::{Category, Payer, PaymentMethod};
    use crate::domain::expense::SessionId;
    use crate::flow::prompts::{CHOICE_SKIP_METHOD, CHOICE_TODAY};
    use crate::flow::states::{ConversationState, InboundEvent};
    use crate::sink::{ExpenseSink, InMemorySink};

    use super::SessionRegistry;

    fn text(value: &str) -> InboundEvent {
        InboundEvent::Text(value.to_string())
    }

    async fn run_linear_flow(registry: &SessionRegistry, id: SessionId) {
        for input in ["12.50", CHOICE_TODAY, "Коля", CHOICE_SKIP_METHOD, "Магазин", "Продукты"] {
            let _ = registry.advance(id, text(input)).await;
        }
    }

    #[tokio::test]
    async fn full_linear_run_appends_exactly_one_row_and_recycles() {
        let sink = Arc::new(InMemorySink::default());
        let registry = SessionRegistry::new(sink.clone());
        let id = SessionId(7);

        run_linear_flow(&registry, id).await;

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.amount, Decimal::new(1250, 2));
        assert_eq!(record.date, Local::now().date_naive());
        assert_eq!(record.payer, Payer::Kolya);
        assert_eq!(record.method, PaymentMethod::Freedom);
        assert_eq!(record.place, "Магазин");
        assert_eq!(record.category, Category::Groceries);

        assert_eq!(registry.state_of(id).await, ConversationState::AwaitingAmount);
        assert!(registry.draft_of(id).await.is_empty());
    }

    #[tokio::test]
    async fn cancel_mid_flow_never_touches_the_sink() {
        let sink = Arc::new(InMemorySink::default());
        let registry = SessionRegistry::new(sink.clone());
        let id = SessionId(8);

        let _ = registry.advance(id, text("99")).await;
        let _ = registry.advance(id, text(CHOICE_TODAY)).await;
        assert_eq!(registry.state_of(id).await, ConversationState::AwaitingPayer);

        let _ = registry.advance(id, InboundEvent::Cancel).await;

        assert_eq!(sink.append_count(), 0);
        assert_eq!(registry.state_of(id).await, ConversationState::AwaitingAmount);
        assert!(registry.draft_of(id).await.is_empty());
    }

    #[tokio::test]
    async fn failed_append_retains_the_record_and_parks_the_session() {
        let sink = Arc::new(InMemorySink::failing_times(1));
        let registry = SessionRegistry::new(sink.clone());
        let id = SessionId(9);

        run_linear_flow(&registry, id).await;

        assert_eq!(sink.append_count(), 0);
        assert_eq!(registry.state_of(id).await, ConversationState::PendingPersist);
        let draft = registry.draft_of(id).await;
        assert!(draft.missing_fields().is_empty(), "all six fields must survive the failure");
    }

    #[tokio::test]
    async fn retry_after_failed_append_completes_the_cycle() {
        let sink = Arc::new(InMemorySink::failing_times(1));
        let registry = SessionRegistry::new(sink.clone());
        let id = SessionId(10);

        run_linear_flow(&registry, id).await;
        assert_eq!(registry.state_of(id).await, ConversationState::PendingPersist);

        let _ = registry.advance(id, text("повторить")).await;

        assert_eq!(sink.append_count(), 1);
        assert_eq!(registry.state_of(id).await, ConversationState::AwaitingAmount);
        assert!(registry.draft_of(id).await.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let sink = Arc::new(InMemorySink::default());
        let registry = SessionRegistry::new(sink.clone());

        let _ = registry.advance(SessionId(1), text("10")).await;
        let _ = registry.advance(SessionId(2), text("не число")).await;

        assert_eq!(registry.state_of(SessionId(1)).await, ConversationState::AwaitingDateChoice);
        assert_eq!(registry.state_of(SessionId(2)).await, ConversationState::AwaitingAmount);
        assert_eq!(registry.session_count(), 2);
    }

    #[tokio::test]
    async fn reset_discards_partial_data() {
        let sink = Arc::new(InMemorySink::default());
        let registry = SessionRegistry::new(sink);
        let id = SessionId(3);

        let _ = registry.advance(id, text("42")).await;
        registry.reset(id).await;

        assert_eq!(registry.state_of(id).await, ConversationState::AwaitingAmount);
        assert!(registry.draft_of(id).await.is_empty());
    }

    #[tokio::test]
    async fn one_session_can_produce_many_records() {
        let sink = Arc::new(InMemorySink::default());
        let registry = SessionRegistry::new(sink.clone());
        let id = SessionId(4);

        run_linear_flow(&registry, id).await;
        run_linear_flow(&registry, id).await;

        assert_eq!(sink.append_count(), 2);
        assert_eq!(registry.session_count(), 1);
    }
}
