use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::expense::ExpenseRecord;
use crate::errors::SinkError;

/// The external append-only tabular store. One row per completed record;
/// the append must resolve before the completion reply is sent.
#[async_trait]
pub trait ExpenseSink: Send + Sync {
    async fn append(&self, record: &ExpenseRecord) -> Result<(), SinkError>;
}

/// Test sink that records appended rows and can be scripted to fail.
#[derive(Default)]
pub struct InMemorySink {
    state: Mutex<InMemorySinkState>,
}

#[derive(Default)]
struct InMemorySinkState {
    records: Vec<ExpenseRecord>,
    failures_remaining: u32,
}

impl InMemorySink {
    pub fn failing_times(failures: u32) -> Self {
        Self {
            state: Mutex::new(InMemorySinkState {
                records: Vec::new(),
                failures_remaining: failures,
            }),
        }
    }

    pub fn records(&self) -> Vec<ExpenseRecord> {
        self.state.lock().map(|state| state.records.clone()).unwrap_or_default()
    }

    pub fn append_count(&self) -> usize {
        self.records().len()
    }
}

#[async_trait]
impl ExpenseSink for InMemorySink {
    async fn append(&self, record: &ExpenseRecord) -> Result<(), SinkError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SinkError::Append("in-memory sink poisoned".to_string()))?;

        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(SinkError::Append("scripted failure".to_string()));
        }

        state.records.push(record.clone());
        Ok(())
    }
}
