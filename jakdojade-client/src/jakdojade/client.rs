//! Jakdojade HTTP client.
//!
//! Registers an anonymous device on first use, then signs every data
//! request with the device's credentials.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{
    ConnectionPreference, DEFAULT_ROUTES_COUNT, Engine, FetchType, Location, RealtimeSearchMode,
    RoutesCorrelation, SearchQuery, TimeOptions, TransitOptions,
};
use crate::session::{Credentials, DeviceSession, SessionManager};
use crate::sign::{QueryParams, json_body, sign};

use super::convert::normalize_response;
use super::error::JakdojadeError;
use super::headers::{add_signature, base_headers, unix_timestamp};
use super::types::{RawSearchResponse, RegisterResponse, RouteSearchRequest, SearchResponse};

/// Default base URL for the Jakdojade API.
pub const DEFAULT_BASE_URL: &str = "https://api.jakdojade.pl";

/// City used for location lookups when none is given.
pub const DEFAULT_CITY_SYMBOL: &str = "WARSZAWA";

pub const REGISTER_PATH: &str = "/api/profiles/v2/register-anonymous";
pub const ROUTES_PATH: &str = "/api/jd/v3/routes";
pub const LOCATIONS_PATH: &str = "/api/jd/v2/locations";

/// Characters of an error body kept in a JSON error.
const ERROR_BODY_LIMIT: usize = 500;

/// A fresh web-client style device id.
pub fn new_device_id() -> String {
    format!("device-web-{}", uuid::Uuid::new_v4())
}

/// Configuration for the Jakdojade client.
#[derive(Debug, Clone)]
pub struct JakdojadeConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Device id sent with every request
    pub device_id: String,
    /// Credentials from an earlier registration; skips registering
    pub credentials: Option<Credentials>,
    /// Value of `X-jd-param-locale` and the location lookup locale
    pub locale: String,
}

impl Default for JakdojadeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl JakdojadeConfig {
    /// Create a config for a new anonymous device.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            device_id: new_device_id(),
            credentials: None,
            locale: "en".to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Reuse an existing device id.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Reuse credentials from an earlier registration.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Jakdojade API client.
///
/// Cheap to clone. Clones share the HTTP connection pool and the session,
/// so the device registers at most once across all of them.
#[derive(Debug, Clone)]
pub struct JakdojadeClient {
    http: reqwest::Client,
    base_url: String,
    locale: String,
    session: SessionManager,
}

impl JakdojadeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JakdojadeConfig) -> Result<Self, JakdojadeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let session = match config.credentials {
            Some(credentials) => {
                SessionManager::with_credentials(config.device_id, credentials.validate()?)
            }
            None => SessionManager::new(config.device_id),
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            locale: config.locale,
            session,
        })
    }

    pub fn device_id(&self) -> &str {
        self.session.device_id()
    }

    /// The established session, if any.
    pub fn session(&self) -> Option<DeviceSession> {
        self.session.current()
    }

    /// Register the device now instead of on the first request.
    ///
    /// Returns the existing session without contacting the API when one is
    /// already established. Persist the returned session to skip
    /// registration next time.
    pub async fn register(&self) -> Result<DeviceSession, JakdojadeError> {
        self.session
            .ensure_session(|device_id| self.register_device(device_id))
            .await
    }

    async fn register_device(&self, device_id: String) -> Result<Credentials, JakdojadeError> {
        let url = format!("{}{}", self.base_url, REGISTER_PATH);
        let headers = base_headers(&device_id, &self.locale, &unix_timestamp())?;

        info!(device_id = %device_id, "Registering anonymous device");

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .body("{}")
            .send()
            .await
            .map_err(JakdojadeError::RegistrationHttp)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Registration failed");
            return Err(JakdojadeError::Registration {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(JakdojadeError::RegistrationHttp)?;

        let registered: RegisterResponse = serde_json::from_str(&body)
            .map_err(|e| JakdojadeError::MalformedCredentials(e.to_string()))?;

        match (registered.profile_login, registered.password_hash) {
            (Some(profile_login), Some(password_hash)) => {
                Ok(Credentials::new(profile_login, password_hash))
            }
            (None, _) => Err(JakdojadeError::MalformedCredentials(
                "missing profileLogin".to_string(),
            )),
            (_, None) => Err(JakdojadeError::MalformedCredentials(
                "missing passwordHash".to_string(),
            )),
        }
    }

    /// Send a signed request and return the response body.
    ///
    /// The body bytes are both hashed for the signature and sent as-is.
    async fn send_signed(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        params: Option<&QueryParams>,
    ) -> Result<String, JakdojadeError> {
        let session = self.register().await?;

        let timestamp = unix_timestamp();
        let signature = sign(
            endpoint,
            body.as_deref(),
            params,
            session.profile_login(),
            session.password_secret(),
            &timestamp,
        )?;

        let mut headers = base_headers(&session.device_id, &self.locale, &timestamp)?;
        add_signature(&mut headers, session.profile_login(), &signature)?;

        debug!(%method, path = endpoint, %timestamp, "Sending signed request");

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(params) = params {
            request = request.query(&params.pairs());
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), path = endpoint, "API request failed");
            return Err(JakdojadeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    /// Search for routes.
    ///
    /// Routes in the response are normalized; the provider's other
    /// top-level fields, including any `error` indicator, are kept.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, JakdojadeError> {
        let body = json_body(&RouteSearchRequest::from(query))?;
        let text = self
            .send_signed(Method::POST, ROUTES_PATH, Some(body), None)
            .await?;

        let raw: RawSearchResponse = parse_json(&text)?;
        let response = normalize_response(raw);

        debug!(routes = response.routes.len(), "Normalized route search");
        Ok(response)
    }

    /// Search with provider defaults for everything but the endpoints,
    /// time and transit options.
    pub async fn search_route(
        &self,
        start: Location,
        destination: Location,
        time_options: TimeOptions,
        options: TransitOptions,
    ) -> Result<SearchResponse, JakdojadeError> {
        let query = SearchQuery {
            engine: Engine::default(),
            fetch_type: FetchType::default(),
            routes_correlation: RoutesCorrelation::default(),
            user_location: None,
            start,
            destination,
            time_options,
            realtime_search_mode: RealtimeSearchMode::default(),
            routes_count: DEFAULT_ROUTES_COUNT,
            public_transport_options: options,
            connection_preference: ConnectionPreference::default(),
        };

        self.search(&query).await
    }

    /// Look up addresses and stops matching `query`.
    ///
    /// `city_symbol` defaults to [`DEFAULT_CITY_SYMBOL`]. The provider's
    /// response is returned unmodified.
    pub async fn location_search(
        &self,
        query: &str,
        city_symbol: Option<&str>,
    ) -> Result<Value, JakdojadeError> {
        let params = location_params(query, city_symbol, &self.locale);
        let text = self
            .send_signed(Method::GET, LOCATIONS_PATH, None, Some(&params))
            .await?;

        parse_json(&text)
    }
}

/// Query parameters for a location lookup.
pub fn location_params(query: &str, city_symbol: Option<&str>, locale: &str) -> QueryParams {
    QueryParams::new()
        .with("suggestions_search_engine", "MIXED")
        .with("query", query)
        .with("locale", locale)
        .with("no_user_points", "false")
        .with("city_symbol", city_symbol.unwrap_or(DEFAULT_CITY_SYMBOL))
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, JakdojadeError> {
    serde_json::from_str(body).map_err(|e| JakdojadeError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(ERROR_BODY_LIMIT).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::canonicalize;

    #[test]
    fn config_defaults() {
        let config = JakdojadeConfig::new();
        assert_eq!(config.base_url, "https://api.jakdojade.pl");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.locale, "en");
        assert!(config.credentials.is_none());
        assert!(config.device_id.starts_with("device-web-"));
    }

    #[test]
    fn device_ids_are_unique() {
        let a = new_device_id();
        let b = new_device_id();
        assert_ne!(a, b);
        // "device-web-" + hyphenated uuid
        assert_eq!(a.len(), "device-web-".len() + 36);
    }

    #[test]
    fn config_builder() {
        let config = JakdojadeConfig::new()
            .with_base_url("http://localhost:1234")
            .with_timeout(5)
            .with_device_id("device-web-fixed")
            .with_locale("pl")
            .with_credentials(Credentials::new("anon", "secret"));

        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.device_id, "device-web-fixed");
        assert_eq!(config.locale, "pl");
        assert_eq!(
            config.credentials,
            Some(Credentials::new("anon", "secret"))
        );
    }

    #[test]
    fn supplied_credentials_are_the_session() {
        let config = JakdojadeConfig::new()
            .with_device_id("device-web-fixed")
            .with_credentials(Credentials::new("anon", "secret"));
        let client = JakdojadeClient::new(config).unwrap();

        let session = client.session().unwrap();
        assert_eq!(session.device_id, "device-web-fixed");
        assert_eq!(session.profile_login(), "anon");
    }

    #[test]
    fn empty_supplied_credentials_are_rejected() {
        let config = JakdojadeConfig::new().with_credentials(Credentials::new("", "secret"));
        let err = JakdojadeClient::new(config).unwrap_err();
        assert!(matches!(err, JakdojadeError::MalformedCredentials(_)));
    }

    #[test]
    fn new_client_has_no_session() {
        let client = JakdojadeClient::new(JakdojadeConfig::new()).unwrap();
        assert!(client.session().is_none());
    }

    #[test]
    fn location_params_canonical_form() {
        let params = location_params("Plac Defilad", None, "en");
        assert_eq!(
            canonicalize(&params),
            "city_symbol=WARSZAWA&locale=en&no_user_points=false&query=Plac+Defilad&suggestions_search_engine=MIXED"
        );

        let params = location_params("Rynek", Some("KRAKOW"), "pl");
        assert!(canonicalize(&params).starts_with("city_symbol=KRAKOW&locale=pl&"));
    }

    #[test]
    fn json_error_keeps_truncated_body() {
        let body = "x".repeat(2000);
        let err = parse_json::<Value>(&body).unwrap_err();

        match err {
            JakdojadeError::Json { body: Some(kept), .. } => assert_eq!(kept.len(), 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
