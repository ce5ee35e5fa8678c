//! Request headers expected by the Jakdojade API.
//!
//! The API accepts requests that look like its web client: a browser user
//! agent plus a fixed set of `X-jd-*` parameters. Signed calls add the
//! profile login and the signature on top of these.

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use super::error::JakdojadeError;

/// Browser user agent sent with every request.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) Gecko/20100101 Firefox/129.0";

pub const APP_PLATFORM: HeaderName = HeaderName::from_static("x-jd-param-app-platform");
pub const APP_VERSION: HeaderName = HeaderName::from_static("x-jd-param-app-version");
pub const LOCALE: HeaderName = HeaderName::from_static("x-jd-param-locale");
pub const DEVICE_ID: HeaderName = HeaderName::from_static("x-jd-param-user-device-id");
pub const SECURITY_VERSION: HeaderName = HeaderName::from_static("x-jd-security-version");
pub const TICKET_SYSTEM_VERSION: HeaderName =
    HeaderName::from_static("x-jd-ticket-system-version");
pub const TIMESTAMP: HeaderName = HeaderName::from_static("x-jd-timestamp");
pub const PROFILE_LOGIN: HeaderName = HeaderName::from_static("x-jd-param-profile-login");
pub const SIGN: HeaderName = HeaderName::from_static("x-jd-sign");

/// Current Unix time in whole seconds, as sent in `X-jd-timestamp`.
pub fn unix_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

/// Headers sent on every request, signed or not.
pub fn base_headers(
    device_id: &str,
    locale: &str,
    timestamp: &str,
) -> Result<HeaderMap, JakdojadeError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(APP_PLATFORM, HeaderValue::from_static("web"));
    headers.insert(APP_VERSION, HeaderValue::from_static("1.0.0"));
    headers.insert(SECURITY_VERSION, HeaderValue::from_static("4"));
    headers.insert(TICKET_SYSTEM_VERSION, HeaderValue::from_static("28"));
    headers.insert(LOCALE, header_value(locale, "x-jd-param-locale")?);
    headers.insert(DEVICE_ID, header_value(device_id, "x-jd-param-user-device-id")?);
    headers.insert(TIMESTAMP, header_value(timestamp, "x-jd-timestamp")?);

    Ok(headers)
}

/// Add the profile login and signature to a header map.
pub fn add_signature(
    headers: &mut HeaderMap,
    profile_login: &str,
    signature: &str,
) -> Result<(), JakdojadeError> {
    headers.insert(
        PROFILE_LOGIN,
        header_value(profile_login, "x-jd-param-profile-login")?,
    );
    headers.insert(SIGN, header_value(signature, "x-jd-sign")?);
    Ok(())
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, JakdojadeError> {
    HeaderValue::from_str(value).map_err(|_| JakdojadeError::InvalidHeader(name))
}
