//! Rate-limited webhook notification dispatch.
//!
//! The alerter owns the cooldown timer. Batches arriving inside the
//! cooldown window are dropped, never queued; a dispatch pass advances the
//! timer even when every endpoint fails, so the policy is at-most-one batch
//! per cooldown interval, not at-least-once delivery.

use anyhow::Result;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::AlertSettings;
use crate::pipeline::Event;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Webhook body: the full event batch plus the dispatch timestamp.
#[derive(Debug, Serialize)]
pub struct AlertPayload<'a> {
    pub events: &'a [Event],
    pub ts: u64,
}

/// Delivery seam. The production transport POSTs JSON over HTTP; tests
/// substitute a recording implementation.
pub trait AlertTransport: Send {
    fn post(&self, url: &str, payload: &AlertPayload<'_>) -> Result<()>;
}

/// `ureq`-backed transport with a short per-request timeout. A slow
/// endpoint stalls the frame loop for at most the timeout, once per
/// cooldown interval.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(REQUEST_TIMEOUT)
    }
}

impl AlertTransport for HttpTransport {
    fn post(&self, url: &str, payload: &AlertPayload<'_>) -> Result<()> {
        // Non-2xx statuses surface as errors, same as connect failures.
        self.agent.post(url).send_json(payload)?;
        Ok(())
    }
}

/// Cooldown-gated dispatcher for per-frame event batches.
pub struct Alerter {
    enabled: bool,
    cooldown: Duration,
    webhooks: Vec<String>,
    /// Unix seconds of the last dispatch pass. Zero guarantees the first
    /// eligible batch always sends.
    last_sent: u64,
    transport: Box<dyn AlertTransport>,
}

impl Alerter {
    pub fn new(settings: &AlertSettings) -> Self {
        Self::with_transport(settings, Box::<HttpTransport>::default())
    }

    pub fn with_transport(settings: &AlertSettings, transport: Box<dyn AlertTransport>) -> Self {
        Self {
            enabled: settings.enabled,
            cooldown: settings.cooldown,
            webhooks: settings.webhooks.clone(),
            last_sent: 0,
            transport,
        }
    }

    /// Dispatch the batch unless disabled, empty, or still cooling down.
    /// Returns whether a dispatch pass ran; the only error is a system
    /// clock failure.
    pub fn maybe_alert(&mut self, events: &[Event]) -> Result<bool> {
        let now = now_s()?;
        Ok(self.maybe_alert_at(events, now))
    }

    /// Clock-injected variant of [`maybe_alert`](Self::maybe_alert), used
    /// by tests and offline replay.
    pub fn maybe_alert_at(&mut self, events: &[Event], now: u64) -> bool {
        if !self.enabled || events.is_empty() {
            return false;
        }
        if now.saturating_sub(self.last_sent) < self.cooldown.as_secs() {
            return false;
        }

        let payload = AlertPayload { events, ts: now };
        for url in &self.webhooks {
            // Per-endpoint failures are swallowed: delivery to the
            // remaining endpoints continues and the cooldown still resets.
            if let Err(e) = self.transport.post(url, &payload) {
                log::warn!("webhook delivery to {} failed: {}", url, e);
            }
        }
        self.last_sent = now;
        true
    }
}

fn now_s() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}
