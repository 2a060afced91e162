// src/core/events.rs

//! The contract for the external event-notification bus.

use crate::core::model::User;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Name of the event published after every login attempt.
pub const EVENT_LOGIN: &str = "security.authentication.login";

/// Payload of a published event.
pub type EventPayload = HashMap<String, Value>;

/// The event-notification bus, supplied by the caller.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &str, payload: EventPayload);
}

/// Builds the payload of a login event: `{"user": <user>}`, with a null user
/// for a failed attempt.
pub fn login_payload(user: Option<&User>) -> EventPayload {
    let value = user
        .and_then(|user| serde_json::to_value(user).ok())
        .unwrap_or(Value::Null);

    let mut payload = EventPayload::new();
    payload.insert("user".to_string(), value);
    payload
}
