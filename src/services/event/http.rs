use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AccessToken, EventStore, StoreError};
use crate::models::event::{EditIntent, EventDefinition, EventDraft, EventId};
use crate::models::settings::Settings;

/// [`EventStore`] backed by the REST event API.
pub struct HttpEventStore {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct EventList {
    events: Vec<EventDefinition>,
}

#[derive(Serialize)]
struct DeleteBody {
    event_id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl HttpEventStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build event API HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.api_base_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.base_url)
    }

    fn event_url(&self, id: EventId) -> String {
        format!("{}/events/{}", self.base_url, id)
    }

    async fn send(request: RequestBuilder, token: &AccessToken) -> Result<Response, StoreError> {
        let response = request
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::warn!("Event API answered {} ({} byte body)", status, body.len());
        Err(StoreError::Rejected {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Extract the server's `detail` message from an error body.
///
/// Accepts `{"detail": "text"}` and the validation shape
/// `{"detail": [{"msg": "text", ...}]}`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

impl EventStore for HttpEventStore {
    async fn create_event(
        &self,
        draft: &EventDraft,
        token: &AccessToken,
    ) -> Result<EventDefinition, StoreError> {
        log::debug!("POST {}", self.events_url());
        let request = self.client.post(self.events_url()).json(draft);
        let response = Self::send(request, token).await?;
        Self::decode(response).await
    }

    async fn list_events(&self, token: &AccessToken) -> Result<Vec<EventDefinition>, StoreError> {
        log::debug!("GET {}", self.events_url());
        let request = self.client.get(self.events_url());
        let response = Self::send(request, token).await?;
        let list: EventList = Self::decode(response).await?;
        Ok(list.events)
    }

    async fn edit_event(
        &self,
        intent: &EditIntent,
        token: &AccessToken,
    ) -> Result<EventDefinition, StoreError> {
        let url = self.event_url(intent.id);
        log::debug!("PUT {}", url);
        let request = self.client.put(url).json(intent);
        let response = Self::send(request, token).await?;
        Self::decode(response).await
    }

    async fn delete_event(
        &self,
        id: EventId,
        occurrence_date: Option<NaiveDate>,
        token: &AccessToken,
    ) -> Result<(), StoreError> {
        let url = self.event_url(id);
        log::debug!("DELETE {}", url);
        let body = DeleteBody {
            event_id: id,
            date: occurrence_date,
        };
        let request = self.client.delete(url).json(&body);
        Self::send(request, token).await?;
        Ok(())
    }
}
