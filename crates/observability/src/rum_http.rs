//! HTTP delivery of RUM events to a collector.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::rum::{RumConfig, RumEvent, RumSink};

/// Header carrying the collector client token.
pub const CLIENT_TOKEN_HEADER: &str = "DD-CLIENT-TOKEN";

/// Collector intake path, relative to the configured collector URL.
pub const INTAKE_PATH: &str = "/v1/rum";

#[derive(Debug, Serialize)]
struct Application<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct Session {
    id: Uuid,
}

/// Wire envelope posted to the collector.
#[derive(Debug, Serialize)]
struct RumEnvelope<'a> {
    event_id: Uuid,
    date: i64,
    application: Application<'a>,
    session: Session,
    service: &'a str,
    env: &'a str,
    #[serde(flatten)]
    event: &'a RumEvent,
}

/// Sink that posts each event to an HTTP collector on a background task.
///
/// Every sink instance is one RUM session. Events emitted outside a tokio
/// runtime are dropped with a warning. Call `flush` before the runtime shuts
/// down, or deliveries still in flight are lost.
#[derive(Debug, Clone)]
pub struct HttpRumSink {
    client: reqwest::Client,
    config: RumConfig,
    session_id: Uuid,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl HttpRumSink {
    pub fn new(config: RumConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            session_id: Uuid::now_v7(),
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn intake_url(&self) -> Option<String> {
        self.config
            .collector_url
            .as_deref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), INTAKE_PATH))
    }

    fn envelope(&self, event: &RumEvent) -> anyhow::Result<serde_json::Value> {
        let envelope = RumEnvelope {
            event_id: Uuid::now_v7(),
            date: Utc::now().timestamp_millis(),
            application: Application {
                id: &self.config.application_id,
            },
            session: Session {
                id: self.session_id,
            },
            service: &self.config.service,
            env: &self.config.env,
            event,
        };
        serde_json::to_value(&envelope).context("failed to encode RUM envelope")
    }
}

async fn deliver(
    client: reqwest::Client,
    url: String,
    client_token: Option<String>,
    body: serde_json::Value,
) -> anyhow::Result<()> {
    let mut req = client.post(&url).json(&body);
    if let Some(token) = &client_token {
        req = req.header(CLIENT_TOKEN_HEADER, token);
    }

    let resp = req
        .send()
        .await
        .with_context(|| format!("failed to reach RUM collector at {url}"))?;

    if !resp.status().is_success() {
        anyhow::bail!("RUM collector rejected event ({})", resp.status());
    }
    Ok(())
}

impl RumSink for HttpRumSink {
    fn emit(&self, event: RumEvent) {
        let Some(url) = self.intake_url() else {
            return;
        };

        let body = match self.envelope(&event) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("dropping RUM event: {err:?}");
                return;
            }
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("no async runtime available; dropping RUM event");
                return;
            }
        };

        let client = self.client.clone();
        let client_token = self.config.client_token.clone();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Reap finished deliveries so the set does not grow unbounded.
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn_on(
            async move {
                if let Err(err) = deliver(client, url, client_token, body).await {
                    tracing::warn!("RUM delivery failed: {err:?}");
                }
            },
            &handle,
        );
    }

    fn flush(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let mut pending = {
                let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *in_flight)
            };
            while let Some(res) = pending.join_next().await {
                if let Err(err) = res {
                    tracing::warn!("RUM delivery task failed: {err}");
                }
            }
        })
    }
}
