//! Google Calendar API client.
//!
//! Thin HTTP layer over `events.list`: request building, pagination and
//! status mapping. Items deserialize straight into [`RawEvent`].

use serde::Deserialize;
use tracing::debug;
use weekgrid_core::TimeWindow;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::RawEvent;

use super::config::{GoogleConfig, GoogleCredentials};

/// Safety stop for runaway pagination.
const MAX_PAGES: usize = 50;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    credentials: GoogleCredentials,
    base_url: String,
    page_size: Option<u32>,
}

impl GoogleCalendarClient {
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            credentials: config.credentials.clone(),
            base_url: config.base_url.clone(),
            page_size: config.page_size,
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    fn page_query(
        &self,
        window: &TimeWindow,
        page_token: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("timeMin", window.start.to_rfc3339()),
            ("timeMax", window.end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(size) = self.page_size {
            query.push(("maxResults", size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        if let GoogleCredentials::ApiKey(ref key) = self.credentials {
            query.push(("key", key.clone()));
        }
        query
    }

    /// Lists the events of a calendar intersecting `window`, following
    /// `nextPageToken` until exhausted. Cancelled instances are dropped.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> ProviderResult<Vec<RawEvent>> {
        let mut all_events = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let response = self
                .list_events_page(calendar_id, window, page_token.as_deref())
                .await?;
            all_events.extend(response.items.into_iter().filter(|e| !e.is_cancelled()));

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => {
                    debug!(
                        calendar = calendar_id,
                        pages = page,
                        events = all_events.len(),
                        "listed events"
                    );
                    return Ok(all_events);
                }
            }
        }

        Err(ProviderError::invalid_response(format!(
            "more than {MAX_PAGES} pages of events"
        )))
    }

    async fn list_events_page(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let mut request = self
            .http_client
            .get(self.events_url(calendar_id))
            .query(&self.page_query(window, page_token));
        if let GoogleCredentials::AccessToken(ref token) = self.credentials {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {e}")
            } else {
                format!("request failed: {e}")
            };
            ProviderError::network(message).with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {e}")).with_source(e)
        })
    }
}

/// Maps a non-success status to a provider error.
fn status_error(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> ProviderError {
    use reqwest::StatusCode;

    match status {
        StatusCode::UNAUTHORIZED => {
            ProviderError::authentication("credentials expired or invalid")
        }
        StatusCode::FORBIDDEN => ProviderError::authorization("access denied to calendar"),
        StatusCode::NOT_FOUND => ProviderError::not_found("calendar not found"),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {s} seconds"))
                .unwrap_or_default()
        )),
        _ => ProviderError::server(format!("API error ({status}): {}", body.trim())),
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
    next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap(),
        )
    }

    fn client(credentials: GoogleCredentials, base_url: &str) -> GoogleCalendarClient {
        GoogleCalendarClient::new(&GoogleConfig::new(credentials).with_base_url(base_url)).unwrap()
    }

    /// Serves the given `(status line, body)` responses, one per connection,
    /// and returns the request heads it received.
    async fn serve(
        responses: Vec<(&'static str, String)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/calendar/v3", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                requests.push(String::from_utf8_lossy(&head).into_owned());
                let reply = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });
        (base_url, handle)
    }

    mod request_building {
        use super::*;

        #[test]
        fn encodes_calendar_id() {
            let client = client(GoogleCredentials::ApiKey("k".into()), "https://example.com/v3");
            assert_eq!(
                client.events_url("team@example.com"),
                "https://example.com/v3/calendars/team%40example.com/events"
            );
        }

        #[test]
        fn api_key_goes_in_query() {
            let client = client(GoogleCredentials::ApiKey("secret".into()), "https://example.com");
            let query = client.page_query(&window(), Some("next"));
            assert!(query.contains(&("key", "secret".to_string())));
            assert!(query.contains(&("pageToken", "next".to_string())));
            assert!(query.contains(&("singleEvents", "true".to_string())));
            assert!(query.contains(&("timeMin", "2025-02-03T00:00:00+00:00".to_string())));
        }

        #[test]
        fn access_token_stays_out_of_query() {
            let client = client(
                GoogleCredentials::AccessToken("tok".into()),
                "https://example.com",
            );
            let query = client.page_query(&window(), None);
            assert!(query.iter().all(|(k, _)| *k != "key" && *k != "pageToken"));
        }
    }

    mod status_mapping {
        use super::*;

        #[test]
        fn maps_known_statuses() {
            let code = |status| status_error(status, None, "").code();
            assert_eq!(code(StatusCode::UNAUTHORIZED), ProviderErrorCode::AuthenticationFailed);
            assert_eq!(code(StatusCode::FORBIDDEN), ProviderErrorCode::AuthorizationFailed);
            assert_eq!(code(StatusCode::NOT_FOUND), ProviderErrorCode::NotFound);
            assert_eq!(code(StatusCode::TOO_MANY_REQUESTS), ProviderErrorCode::RateLimited);
            assert_eq!(code(StatusCode::BAD_GATEWAY), ProviderErrorCode::ServerError);
        }

        #[test]
        fn includes_retry_after() {
            let err = status_error(StatusCode::TOO_MANY_REQUESTS, Some(30), "");
            assert!(err.message().contains("retry after 30 seconds"));
        }
    }

    mod http {
        use super::*;

        #[tokio::test]
        async fn follows_pages_and_drops_cancelled() {
            let first = r#"{
                "items": [
                    {"id": "a",
                     "start": {"dateTime": "2025-02-03T09:00:00Z"},
                     "end": {"dateTime": "2025-02-03T10:00:00Z"}},
                    {"id": "x", "status": "cancelled"}
                ],
                "nextPageToken": "page-2"
            }"#;
            let second = r#"{
                "items": [
                    {"id": "b", "start": {"date": "2025-02-04"}, "end": {"date": "2025-02-05"}}
                ]
            }"#;
            let (base_url, server) =
                serve(vec![("200 OK", first.to_string()), ("200 OK", second.to_string())]).await;

            let client = client(GoogleCredentials::AccessToken("tok".into()), &base_url);
            let events = client.list_events("primary", &window()).await.unwrap();
            let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, ["a", "b"]);

            let requests = server.await.unwrap();
            assert!(requests[0].starts_with("GET /calendar/v3/calendars/primary/events?"));
            assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer tok"));
            assert!(requests[1].contains("pageToken=page-2"));
        }

        #[tokio::test]
        async fn forbidden_is_authorization_error() {
            let (base_url, _server) =
                serve(vec![("403 Forbidden", r#"{"error": {}}"#.to_string())]).await;
            let client = client(GoogleCredentials::ApiKey("k".into()), &base_url);
            let err = client.list_events("primary", &window()).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
        }

        #[tokio::test]
        async fn garbage_body_is_invalid_response() {
            let (base_url, _server) = serve(vec![("200 OK", "not json".to_string())]).await;
            let client = client(GoogleCredentials::ApiKey("k".into()), &base_url);
            let err = client.list_events("primary", &window()).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        }
    }
}
