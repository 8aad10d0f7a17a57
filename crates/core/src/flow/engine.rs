use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::choices::{Category, Payer, PaymentMethod};
use crate::domain::expense::ExpenseDraft;
use crate::flow::prompts;
use crate::flow::states::{ConversationState, InboundEvent, Reply, StepAction, StepOutcome};

/// The conversational data-collection machine. One call per inbound event;
/// pure apart from writes into the caller-owned draft. The caller supplies
/// `today` so skipped date entry stays deterministic under test.
///
/// Persistence is not performed here: a completed record surfaces as
/// [`StepAction::PersistRecord`] and the session registry commits the
/// transition only after the sink call resolves.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpenseFlow;

impl ExpenseFlow {
    pub fn initial_state(&self) -> ConversationState {
        ConversationState::AwaitingAmount
    }

    pub fn advance(
        &self,
        state: &ConversationState,
        draft: &mut ExpenseDraft,
        inbound: &InboundEvent,
        today: NaiveDate,
    ) -> StepOutcome {
        let text = match inbound {
            // Transport noise never advances or resets a session.
            InboundEvent::Unsupported => return self.ignore(state),
            InboundEvent::Cancel => return self.cancel(state, draft),
            InboundEvent::Start => return self.restart(state, draft),
            InboundEvent::Text(text) => text.trim(),
        };

        match state {
            ConversationState::AwaitingAmount => self.collect_amount(draft, text),
            ConversationState::AwaitingDateChoice => self.choose_date_option(draft, text, today),
            ConversationState::AwaitingDateValue => self.collect_date(draft, text, today),
            ConversationState::AwaitingPayer => self.collect_payer(draft, text),
            ConversationState::AwaitingPaymentChoice => self.choose_payment_option(draft, text),
            ConversationState::AwaitingPaymentMethod => self.collect_method(draft, text),
            ConversationState::AwaitingPlace => self.collect_place(draft, text),
            ConversationState::AwaitingCategory => self.collect_category(draft, text),
            ConversationState::PendingPersist => self.retry_persist(),
        }
    }

    fn ignore(&self, state: &ConversationState) -> StepOutcome {
        StepOutcome {
            from: state.clone(),
            next: state.clone(),
            reply: None,
            actions: Vec::new(),
        }
    }

    fn cancel(&self, state: &ConversationState, draft: &mut ExpenseDraft) -> StepOutcome {
        let actions =
            if draft.is_empty() { Vec::new() } else { vec![StepAction::ClearDraft] };
        draft.clear();
        StepOutcome {
            from: state.clone(),
            next: ConversationState::AwaitingAmount,
            reply: Some(prompts::cancel_notice()),
            actions,
        }
    }

    fn restart(&self, state: &ConversationState, draft: &mut ExpenseDraft) -> StepOutcome {
        let actions =
            if draft.is_empty() { Vec::new() } else { vec![StepAction::ClearDraft] };
        draft.clear();
        StepOutcome {
            from: state.clone(),
            next: ConversationState::AwaitingAmount,
            reply: Some(prompts::amount_prompt()),
            actions,
        }
    }

    fn collect_amount(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        match parse_amount(text) {
            Some(amount) => {
                draft.amount = Some(amount);
                self.step(
                    ConversationState::AwaitingAmount,
                    ConversationState::AwaitingDateChoice,
                    prompts::date_choice_prompt(),
                )
            }
            None => self.stay(ConversationState::AwaitingAmount, prompts::invalid_amount()),
        }
    }

    fn choose_date_option(
        &self,
        draft: &mut ExpenseDraft,
        text: &str,
        today: NaiveDate,
    ) -> StepOutcome {
        match text {
            prompts::CHOICE_ENTER_DATE => self.step(
                ConversationState::AwaitingDateChoice,
                ConversationState::AwaitingDateValue,
                prompts::date_value_prompt(),
            ),
            prompts::CHOICE_TODAY => {
                draft.date = Some(today);
                StepOutcome {
                    from: ConversationState::AwaitingDateChoice,
                    next: ConversationState::AwaitingPayer,
                    reply: Some(prompts::payer_prompt()),
                    actions: vec![StepAction::UseTodayForDate],
                }
            }
            _ => self.stay(
                ConversationState::AwaitingDateChoice,
                prompts::choice_reprompt(&prompts::date_choice_prompt()),
            ),
        }
    }

    fn collect_date(&self, draft: &mut ExpenseDraft, text: &str, today: NaiveDate) -> StepOutcome {
        match parse_day_month(text, today.year()) {
            Ok(date) => {
                draft.date = Some(date);
                self.step(
                    ConversationState::AwaitingDateValue,
                    ConversationState::AwaitingPayer,
                    prompts::payer_prompt(),
                )
            }
            Err(error) => self.stay(
                ConversationState::AwaitingDateValue,
                prompts::invalid_date(error.reason()),
            ),
        }
    }

    fn collect_payer(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        match Payer::from_label(text) {
            Some(payer) => {
                draft.payer = Some(payer);
                self.step(
                    ConversationState::AwaitingPayer,
                    ConversationState::AwaitingPaymentChoice,
                    prompts::payment_choice_prompt(),
                )
            }
            None => self.stay(
                ConversationState::AwaitingPayer,
                prompts::choice_reprompt(&prompts::payer_prompt()),
            ),
        }
    }

    fn choose_payment_option(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        match text {
            prompts::CHOICE_PICK_METHOD => self.step(
                ConversationState::AwaitingPaymentChoice,
                ConversationState::AwaitingPaymentMethod,
                prompts::payment_method_prompt(),
            ),
            prompts::CHOICE_SKIP_METHOD => {
                draft.method = Some(PaymentMethod::DEFAULT);
                StepOutcome {
                    from: ConversationState::AwaitingPaymentChoice,
                    next: ConversationState::AwaitingPlace,
                    reply: Some(prompts::place_prompt()),
                    actions: vec![StepAction::DefaultPaymentMethod],
                }
            }
            _ => self.stay(
                ConversationState::AwaitingPaymentChoice,
                prompts::choice_reprompt(&prompts::payment_choice_prompt()),
            ),
        }
    }

    fn collect_method(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        match PaymentMethod::from_label(text) {
            Some(method) => {
                draft.method = Some(method);
                self.step(
                    ConversationState::AwaitingPaymentMethod,
                    ConversationState::AwaitingPlace,
                    prompts::place_prompt(),
                )
            }
            None => self.stay(
                ConversationState::AwaitingPaymentMethod,
                prompts::choice_reprompt(&prompts::payment_method_prompt()),
            ),
        }
    }

    fn collect_place(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        if text.is_empty() {
            return self.stay(ConversationState::AwaitingPlace, prompts::invalid_place());
        }

        draft.place = Some(text.to_string());
        self.step(
            ConversationState::AwaitingPlace,
            ConversationState::AwaitingCategory,
            prompts::category_prompt(),
        )
    }

    fn collect_category(&self, draft: &mut ExpenseDraft, text: &str) -> StepOutcome {
        match Category::from_label(text) {
            Some(category) => {
                draft.category = Some(category);
                // Success-path outcome; on a failed append the registry parks
                // the session in PendingPersist instead.
                StepOutcome {
                    from: ConversationState::AwaitingCategory,
                    next: ConversationState::AwaitingAmount,
                    reply: Some(prompts::saved_notice()),
                    actions: vec![StepAction::PersistRecord, StepAction::ClearDraft],
                }
            }
            None => self.stay(
                ConversationState::AwaitingCategory,
                prompts::choice_reprompt(&prompts::category_prompt()),
            ),
        }
    }

    fn retry_persist(&self) -> StepOutcome {
        StepOutcome {
            from: ConversationState::PendingPersist,
            next: ConversationState::AwaitingAmount,
            reply: Some(prompts::saved_notice()),
            actions: vec![StepAction::PersistRecord, StepAction::ClearDraft],
        }
    }

    fn step(
        &self,
        from: ConversationState,
        next: ConversationState,
        reply: Reply,
    ) -> StepOutcome {
        StepOutcome { from, next, reply: Some(reply), actions: Vec::new() }
    }

    fn stay(&self, state: ConversationState, reply: Reply) -> StepOutcome {
        StepOutcome {
            from: state.clone(),
            next: state,
            reply: Some(reply),
            actions: Vec::new(),
        }
    }
}

/// Accepts both `.` and `,` as the decimal separator; the value must be a
/// strictly positive number.
fn parse_amount(text: &str) -> Option<Decimal> {
    let normalized = text.replace(',', ".");
    let amount = normalized.parse::<Decimal>().ok()?;
    (amount > Decimal::ZERO).then_some(amount)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateInputError {
    NotFourDigits,
    NoSuchDate,
}

impl DateInputError {
    fn reason(&self) -> &'static str {
        match self {
            Self::NotFourDigits => "нужно ровно 4 цифры (ддмм)",
            Self::NoSuchDate => "такой даты в этом году нет",
        }
    }
}

/// Parses a `ддмм` string against the real calendar of the given year, so
/// `3213` (day 32) and `3102` (31 February) are both rejected.
fn parse_day_month(text: &str, year: i32) -> Result<NaiveDate, DateInputError> {
    if text.len() != 4 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(DateInputError::NotFourDigits);
    }

    let day: u32 = text[..2].parse().map_err(|_| DateInputError::NotFourDigits)?;
    let month: u32 = text[2..].parse().map_err(|_| DateInputError::NotFourDigits)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateInputError::NoSuchDate)
}
