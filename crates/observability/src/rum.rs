//! Real-user monitoring (RUM) events.
//!
//! A RUM event describes something a user did (an *action*) or something that
//! went wrong while they were looking (an *error*). Events are fire-and-forget:
//! sinks never report failures back to the caller, and nothing in the
//! application reads them back.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

/// Free-form event context (always a JSON object).
pub type RumContext = Map<String, Value>;

/// A single RUM event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RumEvent {
    /// A named custom user action.
    Action { name: String, context: RumContext },
    /// An error observed by the user, with tags describing where it happened.
    Error { message: String, context: RumContext },
}

impl RumEvent {
    /// Build an action from any serializable context struct.
    pub fn action(name: impl Into<String>, context: &impl Serialize) -> Self {
        Self::Action {
            name: name.into(),
            context: context_from(context),
        }
    }

    /// Build an error report from any serializable context struct.
    pub fn error(message: impl Into<String>, context: &impl Serialize) -> Self {
        Self::Error {
            message: message.into(),
            context: context_from(context),
        }
    }

    pub fn context(&self) -> &RumContext {
        match self {
            RumEvent::Action { context, .. } | RumEvent::Error { context, .. } => context,
        }
    }

    /// Action name, or `None` for errors.
    pub fn action_name(&self) -> Option<&str> {
        match self {
            RumEvent::Action { name, .. } => Some(name),
            RumEvent::Error { .. } => None,
        }
    }
}

fn context_from(context: &impl Serialize) -> RumContext {
    match serde_json::to_value(context) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
        Err(e) => {
            tracing::warn!("failed to serialize RUM context: {}", e);
            Map::new()
        }
    }
}

/// Destination for RUM events.
///
/// Implementations must not block the caller on delivery and must swallow
/// their own failures.
pub trait RumSink: Send + Sync {
    fn emit(&self, event: RumEvent);

    /// Wait until events handed to background delivery have been sent.
    ///
    /// Sinks that finish inside `emit` have nothing to wait for.
    fn flush(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}

/// RUM collector settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RumConfig {
    /// Base URL of the collector; `None` disables delivery.
    pub collector_url: Option<String>,
    pub application_id: String,
    pub client_token: Option<String>,
    pub service: String,
    pub env: String,
}

impl Default for RumConfig {
    fn default() -> Self {
        Self {
            collector_url: None,
            application_id: "shopfront".to_string(),
            client_token: None,
            service: "shopfront-web".to_string(),
            env: "dev".to_string(),
        }
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRumSink {
    events: Mutex<Vec<RumEvent>>,
}

impl InMemoryRumSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far, oldest first.
    pub fn events(&self) -> Vec<RumEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Contexts of all actions with the given name.
    pub fn actions(&self, name: &str) -> Vec<RumContext> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RumEvent::Action { name: n, context } if n == name => Some(context),
                _ => None,
            })
            .collect()
    }

    /// `(message, context)` of all reported errors.
    pub fn errors(&self) -> Vec<(String, RumContext)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RumEvent::Error { message, context } => Some((message, context)),
                RumEvent::Action { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RumSink for InMemoryRumSink {
    fn emit(&self, event: RumEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Sink that only logs events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRumSink;

impl RumSink for TracingRumSink {
    fn emit(&self, event: RumEvent) {
        let context = serde_json::Value::Object(event.context().clone());
        match &event {
            RumEvent::Action { name, .. } => {
                tracing::info!(rum.action = %name, rum.context = %context, "rum action");
            }
            RumEvent::Error { message, .. } => {
                tracing::warn!(rum.error = %message, rum.context = %context, "rum error");
            }
        }
    }
}
