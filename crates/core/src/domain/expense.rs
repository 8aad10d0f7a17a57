use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::choices::{Category, Payer, PaymentMethod};
use crate::errors::DomainError;

/// Telegram chat id; one registry session per chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The record under construction. Every field is written at most once per
/// record lifetime; the draft is cleared after a successful append.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub payer: Option<Payer>,
    pub method: Option<PaymentMethod>,
    pub place: Option<String>,
    pub category: Option<Category>,
}

impl ExpenseDraft {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.payer.is_none() {
            missing.push("payer");
        }
        if self.method.is_none() {
            missing.push("method");
        }
        if self.place.is_none() {
            missing.push("place");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        missing
    }

    /// Copies the draft out as an immutable record. The draft itself is left
    /// untouched so a failed append can be retried from the same data.
    pub fn complete(&self) -> Result<ExpenseRecord, DomainError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteRecord { missing });
        }

        Ok(ExpenseRecord {
            amount: self.amount.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            payer: self.payer.unwrap_or(Payer::Rinat),
            method: self.method.unwrap_or(PaymentMethod::DEFAULT),
            place: self.place.clone().unwrap_or_default(),
            category: self.category.unwrap_or(Category::Goods),
        })
    }
}

/// A completed expense, eligible for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payer: Payer,
    pub method: PaymentMethod,
    pub place: String,
    pub category: Category,
}

impl ExpenseRecord {
    pub fn formatted_date(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }

    /// One sheet row in the fixed column order:
    /// date, amount, payer, method, place, category.
    pub fn row_values(&self) -> Vec<Value> {
        let amount = self
            .amount
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(self.amount.to_string()));

        vec![
            Value::String(self.formatted_date()),
            amount,
            Value::String(self.payer.label().to_string()),
            Value::String(self.method.label().to_string()),
            Value::String(self.place.clone()),
            Value::String(self.category.label().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::domain::choices::{Category, Payer, PaymentMethod};
    use crate::errors::DomainError;

    use super::ExpenseDraft;

    fn full_draft() -> ExpenseDraft {
        ExpenseDraft {
            amount: Some(Decimal::new(1250, 2)),
            date: NaiveDate::from_ymd_opt(2026, 3, 5),
            payer: Some(Payer::Kolya),
            method: Some(PaymentMethod::Freedom),
            place: Some("Магазин".to_string()),
            category: Some(Category::Groceries),
        }
    }

    #[test]
    fn complete_requires_all_six_fields() {
        let mut draft = full_draft();
        draft.place = None;

        let error = draft.complete().expect_err("incomplete draft must not complete");
        assert!(matches!(
            error,
            DomainError::IncompleteRecord { ref missing } if missing == &vec!["place"]
        ));
    }

    #[test]
    fn complete_leaves_draft_intact() {
        let draft = full_draft();
        let record = draft.complete().expect("full draft completes");

        assert_eq!(record.amount, Decimal::new(1250, 2));
        assert_eq!(draft, full_draft());
    }

    #[test]
    fn row_values_follow_sheet_column_order() {
        let record = full_draft().complete().expect("full draft completes");

        assert_eq!(
            record.row_values(),
            vec![
                json!("05.03.2026"),
                json!(12.5),
                json!("Коля"),
                json!("Freedom"),
                json!("Магазин"),
                json!("Продукты"),
            ]
        );
    }

    #[test]
    fn clear_resets_every_field() {
        let mut draft = full_draft();
        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.missing_fields().len(), 6);
    }
}
