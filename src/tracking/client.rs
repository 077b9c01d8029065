//! A client for the Shippo shipment tracking API.

use std::time::Duration;

use reqwest::{Client, Url, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The base URL of the production tracking API.
pub const DEFAULT_TRACKING_API_URL: &str = "https://api.goshippo.com/v1";
/// How long to wait for the tracking API before giving up.
pub const DEFAULT_TRACKING_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a shipment was last seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    tracking_status: Option<TrackingStatus>,
}

#[derive(Debug, Deserialize)]
struct TrackingStatus {
    location: Option<TrackLocation>,
}

#[derive(Debug, Deserialize)]
struct TrackLocation {
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    country: Option<String>,
}

/// Looks up shipments with a single bounded HTTP request per lookup.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl TrackingClient {
    /// Create a client for the API at `base_url`, e.g. [DEFAULT_TRACKING_API_URL].
    ///
    /// If `api_key` is set it is sent with each request. Requests that take
    /// longer than `timeout` fail.
    ///
    /// # Errors
    /// Returns [Error::TrackingUnavailable] if the HTTP client could not be created.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                Error::TrackingUnavailable(format!("could not create HTTP client: {error}"))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            http,
        })
    }

    fn track_url(&self, carrier: &str, tracking_num: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url).map_err(|error| {
            Error::TrackingUnavailable(format!("invalid base URL {}: {error}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::TrackingUnavailable(format!("invalid base URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["tracks", carrier, tracking_num, ""]);

        Ok(url)
    }

    /// Get the last known location of the shipment `tracking_num` sent with `carrier`.
    ///
    /// # Errors
    /// Returns [Error::TrackingUnavailable] if the request fails or times out,
    /// the API responds with an error status, or the response does not
    /// contain a location.
    pub async fn locate(
        &self,
        carrier: &str,
        tracking_num: &str,
    ) -> Result<ShipmentLocation, Error> {
        let url = self.track_url(carrier, tracking_num)?;
        tracing::debug!("Requesting tracking status from {url}");

        let mut request = self.http.get(url).header("Accept", "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("ShippoToken {api_key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|error| Error::TrackingUnavailable(format!("request failed: {error}")))?;

        if !response.status().is_success() {
            return Err(Error::TrackingUnavailable(format!(
                "tracking API responded with {}",
                response.status()
            )));
        }

        let track: TrackResponse = response.json().await.map_err(|error| {
            Error::TrackingUnavailable(format!("could not parse tracking response: {error}"))
        })?;

        let location = track
            .tracking_status
            .and_then(|status| status.location)
            .ok_or_else(|| {
                Error::TrackingUnavailable("tracking response has no location".to_owned())
            })?;

        Ok(ShipmentLocation {
            city: location.city,
            state: location.state,
            zipcode: location.zip,
            country: location.country,
        })
    }
}

#[cfg(test)]
pub(crate) mod fake_tracking_api {
    //! A local stand-in for the tracking API.

    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    pub const API_KEY: &str = "test-key";

    async fn track(
        Path((carrier, tracking_num)): Path<(String, String)>,
        headers: HeaderMap,
    ) -> Response {
        let authorized = headers
            .get("authorization")
            .is_some_and(|value| value == format!("ShippoToken {API_KEY}").as_str());

        match (carrier.as_str(), tracking_num.as_str()) {
            _ if !authorized => StatusCode::UNAUTHORIZED.into_response(),
            ("usps", "9205590164917312751089") => Json(json!({
                "carrier": "usps",
                "tracking_number": tracking_num,
                "tracking_status": {
                    "status": "TRANSIT",
                    "location": {
                        "city": "San Francisco",
                        "state": "CA",
                        "zip": "94103",
                        "country": "US"
                    }
                }
            }))
            .into_response(),
            ("usps", "no-location") => {
                Json(json!({ "tracking_status": { "location": null } })).into_response()
            }
            ("usps", "malformed") => "not json".into_response(),
            ("usps", "slow") => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::OK.into_response()
            }
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Serve the fake API on a random local port and return its base URL.
    pub async fn spawn() -> String {
        let app = Router::new().route("/v1/tracks/{carrier}/{tracking_num}/", get(track));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake tracking API");
        let address = listener.local_addr().expect("Could not get local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake tracking API stopped");
        });

        format!("http://{address}/v1")
    }
}

#[cfg(test)]
mod tracking_client_tests {
    use std::time::Duration;

    use crate::Error;

    use super::{ShipmentLocation, TrackingClient, fake_tracking_api};

    async fn get_client(timeout: Duration) -> TrackingClient {
        let base_url = fake_tracking_api::spawn().await;

        TrackingClient::new(&base_url, Some(fake_tracking_api::API_KEY.to_owned()), timeout)
            .unwrap()
    }

    #[track_caller]
    fn assert_unavailable(result: Result<ShipmentLocation, Error>) {
        assert!(
            matches!(result, Err(Error::TrackingUnavailable(_))),
            "want tracking unavailable, got {result:?}"
        );
    }

    #[test]
    fn builds_track_url_with_trailing_slash() {
        let client = TrackingClient::new(
            "https://api.goshippo.com/v1/",
            None,
            Duration::from_secs(1),
        )
        .unwrap();

        let url = client.track_url("usps", "92055 901").unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.goshippo.com/v1/tracks/usps/92055%20901/"
        );
    }

    #[tokio::test]
    async fn extracts_location() {
        let client = get_client(Duration::from_secs(5)).await;

        let location = client
            .locate("usps", "9205590164917312751089")
            .await
            .unwrap();

        assert_eq!(
            location,
            ShipmentLocation {
                city: Some("San Francisco".to_owned()),
                state: Some("CA".to_owned()),
                zipcode: Some("94103".to_owned()),
                country: Some("US".to_owned()),
            }
        );
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let client = get_client(Duration::from_secs(5)).await;

        assert_unavailable(client.locate("usps", "unknown").await);
    }

    #[tokio::test]
    async fn missing_api_key_is_unavailable() {
        let base_url = fake_tracking_api::spawn().await;
        let client = TrackingClient::new(&base_url, None, Duration::from_secs(5)).unwrap();

        assert_unavailable(client.locate("usps", "9205590164917312751089").await);
    }

    #[tokio::test]
    async fn malformed_body_is_unavailable() {
        let client = get_client(Duration::from_secs(5)).await;

        assert_unavailable(client.locate("usps", "malformed").await);
    }

    #[tokio::test]
    async fn missing_location_is_unavailable() {
        let client = get_client(Duration::from_secs(5)).await;

        assert_unavailable(client.locate("usps", "no-location").await);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let client = get_client(Duration::from_millis(100)).await;

        assert_unavailable(client.locate("usps", "slow").await);
    }

    #[tokio::test]
    async fn unreachable_api_is_unavailable() {
        let client =
            TrackingClient::new("http://127.0.0.1:1/v1", None, Duration::from_secs(1)).unwrap();

        assert_unavailable(client.locate("usps", "9205590164917312751089").await);
    }
}
