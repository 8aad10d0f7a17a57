use serde::{Deserialize, Serialize};

/// Choice keyboards are rendered in rows of at most three labels,
/// order preserved.
pub const MAX_CHOICES_PER_ROW: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    AwaitingAmount,
    AwaitingDateChoice,
    AwaitingDateValue,
    AwaitingPayer,
    AwaitingPaymentChoice,
    AwaitingPaymentMethod,
    AwaitingPlace,
    AwaitingCategory,
    /// A fully built record whose sheet append failed. Any text retries the
    /// append; cancel abandons the record.
    PendingPersist,
}

impl ConversationState {
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::AwaitingAmount)
    }
}

/// One inbound transport event for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    Start,
    Cancel,
    Text(String),
    /// Stickers, photos, edits and other transport noise. Dropped without a
    /// state change or a reply.
    Unsupported,
}

/// One outbound prompt: text plus optional quick-reply choice rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub choice_rows: Vec<Vec<String>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), choice_rows: Vec::new() }
    }

    pub fn with_choices(text: impl Into<String>, labels: &[&str]) -> Self {
        let choice_rows = labels
            .chunks(MAX_CHOICES_PER_ROW)
            .map(|row| row.iter().map(|label| (*label).to_string()).collect())
            .collect();
        Self { text: text.into(), choice_rows }
    }

    pub fn has_choices(&self) -> bool {
        !self.choice_rows.is_empty()
    }
}

/// Named side effects of a step, in the order they must be applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    /// Date entry was skipped; the current calendar date was written.
    UseTodayForDate,
    /// Method selection was skipped; the default method was written.
    DefaultPaymentMethod,
    /// The draft is complete and must be appended to the sheet before the
    /// transition commits.
    PersistRecord,
    ClearDraft,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub from: ConversationState,
    pub next: ConversationState,
    pub reply: Option<Reply>,
    pub actions: Vec<StepAction>,
}

impl StepOutcome {
    pub fn demands_persist(&self) -> bool {
        self.actions.contains(&StepAction::PersistRecord)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationState, Reply};

    #[test]
    fn choice_labels_are_chunked_into_rows_of_three() {
        let reply = Reply::with_choices("pick", &["a", "b", "c", "d", "e", "f", "g"]);

        assert_eq!(
            reply.choice_rows,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string(), "e".to_string(), "f".to_string()],
                vec!["g".to_string()],
            ]
        );
    }

    #[test]
    fn short_choice_sets_fit_one_row() {
        let reply = Reply::with_choices("pick", &["a", "b"]);
        assert_eq!(reply.choice_rows.len(), 1);
        assert!(reply.has_choices());
    }

    #[test]
    fn plain_text_reply_has_no_keyboard() {
        assert!(!Reply::text("ok").has_choices());
    }

    #[test]
    fn only_awaiting_amount_is_initial() {
        assert!(ConversationState::AwaitingAmount.is_initial());
        assert!(!ConversationState::PendingPersist.is_initial());
    }
}
