use std::time::Duration;

use eyre::{Result, WrapErr};
use primitives::{Cursor, StatusesResponse};
use reqwest::{Client as HttpClient, RequestBuilder, header::AUTHORIZATION};
use tracing::{debug, error, info};
use url::Url;

/// Client for the homework review API.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    http: HttpClient,
    token: String,
    url: Url,
}

impl ReviewClient {
    /// Create a new review API client. Every request is bounded by `timeout`.
    pub fn new(token: String, url: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build review API HTTP client")?;
        Ok(Self { http, token, url })
    }

    /// Endpoint this client polls.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Authenticate the request.
    fn auth(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header(AUTHORIZATION, format!("OAuth {}", self.token))
    }

    /// Fetch homework statuses updated since `cursor`.
    ///
    /// Error statuses and unparseable bodies are logged and degrade to an empty
    /// response. Failing to get any response at all is returned as an error.
    pub async fn homework_statuses(&self, cursor: Cursor) -> Result<StatusesResponse> {
        let from_date = cursor.timestamp();
        debug!(url = %self.url, from_date, "Polling review API");

        let resp = self
            .auth(self.http.get(self.url.clone()))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .wrap_err_with(|| format!("review API request to {} failed", self.url))?;

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(%status, url = %self.url, from_date, error = %e, "Failed to read review API response");
                return Ok(StatusesResponse::default());
            }
        };

        if !status.is_success() {
            error!(%status, url = %self.url, from_date, %body, "Review API returned an error status");
            return Ok(StatusesResponse::default());
        }

        info!(response = %body, "Review API response");

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!(url = %self.url, from_date, error = %e, "Malformed review API response");
                Ok(StatusesResponse::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Poller;

    use mockito::{Matcher, Server, ServerGuard};
    use primitives::{CurrentDate, HomeworkRecord};

    const PATH: &str = "/api/user_api/homework_statuses/";

    fn client_for(server: &ServerGuard) -> ReviewClient {
        let url = Url::parse(&format!("{}{}", server.url(), PATH)).unwrap();
        ReviewClient::new("test-token".to_owned(), url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_cursor_and_oauth_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_header("authorization", "OAuth test-token")
            .match_query(Matcher::UrlEncoded("from_date".into(), "1700000000".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"homeworks":[{"homework_name":"hw1","status":"approved"}],"current_date":1700000300}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.url().path(), PATH);
        let resp = client.poll(Cursor::from_timestamp(1_700_000_000)).await.unwrap();

        assert_eq!(resp.latest(), Some(&HomeworkRecord::new("hw1", "approved")));
        assert_eq!(resp.current_date, CurrentDate::Timestamp(1_700_000_300));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_degrades_to_empty_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"homeworks":[{"homework_name":"hw1","status":"approved"}]}"#)
            .create_async()
            .await;

        let resp = client_for(&server).poll(Cursor::from_timestamp(0)).await.unwrap();

        assert_eq!(resp, StatusesResponse::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_degrades_to_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code":"not_authenticated"}"#)
            .create_async()
            .await;

        let resp = client_for(&server).poll(Cursor::from_timestamp(0)).await.unwrap();
        assert!(resp.homeworks.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let resp = client_for(&server).poll(Cursor::from_timestamp(0)).await.unwrap();
        assert_eq!(resp, StatusesResponse::default());
    }

    #[tokio::test]
    async fn connect_error_is_returned() {
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let client =
            ReviewClient::new("test-token".to_owned(), url, Duration::from_millis(500)).unwrap();

        let err = client.poll(Cursor::from_timestamp(0)).await.unwrap_err();
        assert!(err.downcast_ref::<reqwest::Error>().is_some_and(|e| e.is_connect() || e.is_timeout()));
    }
}
