use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use traty_core::config::SheetsConfig;
use traty_core::{ExpenseRecord, ExpenseSink, SinkError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Appends completed expense rows to one spreadsheet range through the
/// Sheets v4 `values:append` endpoint. Token issuance is a bootstrap
/// concern; the client only carries the bearer token it was given.
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    sheet_range: String,
    access_token: SecretString,
    api_base: String,
}

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self, SinkError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| SinkError::Unreachable(error.to_string()))?;

        Ok(Self {
            http,
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_range: config.sheet_range.clone(),
            access_token: config.access_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn append_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.api_base, self.spreadsheet_id, self.sheet_range
        )
    }

    fn probe_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}?fields=spreadsheetId", self.api_base, self.spreadsheet_id)
    }

    /// Cheap reachability check used by bootstrap to fail fast when the
    /// spreadsheet is missing or the token is rejected.
    pub async fn probe(&self) -> Result<(), SinkError> {
        let response = self
            .http
            .get(self.probe_url())
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|error| SinkError::Unreachable(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Unreachable(format!(
                "spreadsheet probe returned {status}"
            )));
        }

        debug!(spreadsheet_id = %self.spreadsheet_id, "spreadsheet probe succeeded");
        Ok(())
    }
}

#[async_trait]
impl ExpenseSink for SheetsClient {
    async fn append(&self, record: &ExpenseRecord) -> Result<(), SinkError> {
        let body = AppendRequest { values: vec![record.row_values()] };

        let response = self
            .http
            .post(self.append_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|error| SinkError::Unreachable(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "sheet append rejected");
            return Err(SinkError::Append(format!("append returned {status}: {detail}")));
        }

        debug!(range = %self.sheet_range, "expense row appended");
        Ok(())
    }
}
