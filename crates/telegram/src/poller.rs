use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tracing::{debug, info, warn};

use traty_core::SessionRegistry;

use crate::api::{TransportError, UpdateTransport};
use crate::updates::inbound_from_update;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Long-poll event loop: pulls update batches from the transport, routes
/// every update through the session registry, and sends the resulting
/// prompt back. A transport failure backs off and retries; the registry and
/// its sessions survive reconnects untouched.
pub struct LongPollRunner {
    transport: Arc<dyn UpdateTransport>,
    registry: Arc<SessionRegistry>,
    reconnect_policy: ReconnectPolicy,
}

impl LongPollRunner {
    pub fn new(
        transport: Arc<dyn UpdateTransport>,
        registry: Arc<SessionRegistry>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, registry, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.poll_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "long poll transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "long poll retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn poll_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening long poll loop");

        loop {
            let Some(updates) = self.transport.next_updates().await? else {
                info!(attempt, "update stream closed");
                return Ok(());
            };

            for update in &updates {
                let Some((session_id, inbound)) = inbound_from_update(update) else {
                    debug!(update_id = update.update_id, "update carries no message; skipped");
                    continue;
                };

                debug!(
                    update_id = update.update_id,
                    session_id = %session_id,
                    event = ?inbound,
                    "routing update to conversation"
                );

                let Some(reply) = self.registry.advance(session_id, inbound).await else {
                    continue;
                };

                if let Err(error) = self.transport.send_reply(session_id, &reply).await {
                    warn!(
                        update_id = update.update_id,
                        session_id = %session_id,
                        error = %error,
                        "failed to send reply; continuing poll loop"
                    );
                }
            }
        }
    }
}
