//! [`EventsApi`] over HTTP

use super::{ApiError, EventsApi};
use crate::config::Config;
use crate::types::{
    Attendee, Event, EventId, RsvpReceipt, RsvpRequest, RsvpResponse, SearchResults, Stats,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Backend client
///
/// Every request is bounded by the timeout given at construction.
#[derive(Clone, Debug)]
pub struct HttpEventsApi {
    client: Client,
    base_url: Url,
}

impl HttpEventsApi {
    /// Create a client for the backend at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if `base_url` is not an absolute URL
    /// or the HTTP client cannot be built
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| ApiError::Transport(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("invalid base URL: {base_url}")));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the site configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api.base_url, config.api.request_timeout)
    }

    /// The base URL with `segments` appended, each percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(segments)?)
            .query(query)
            .send()
            .await
            .map_err(send_error)?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            },
        }
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    #[tracing::instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get_json(&["api", "events"], &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json(&["api", "stats"], &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn event(&self, id: &EventId) -> Result<Event, ApiError> {
        self.get_json(&["api", "events", id.as_str()], &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn search_attendees(&self, query: &str) -> Result<Vec<Attendee>, ApiError> {
        let found: SearchResults = self.get_json(&["search_attendee"], &[("q", query)]).await?;
        Ok(found.results)
    }

    #[tracing::instrument(skip(self, request), fields(event_id = %request.event_id))]
    async fn submit_rsvp(&self, request: &RsvpRequest) -> Result<RsvpReceipt, ApiError> {
        let response = self
            .client
            .post(self.url(&["api", "rsvp"])?)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(send_error)?;
        let parsed: Option<RsvpResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(reply) if status.is_success() && reply.success => Ok(RsvpReceipt {
                attendance_id: reply.attendance_id,
            }),
            Some(reply) => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: reply.error,
            }),
            None if status.is_success() => Err(ApiError::Decode(format!(
                "unexpected RSVP response body: {body}"
            ))),
            None => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: None,
            }),
        }
    }
}

fn send_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(error.to_string())
    }
}

/// The `error` field of a JSON error body
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<RsvpResponse>(body)
        .ok()
        .and_then(|reply| reply.error)
}
