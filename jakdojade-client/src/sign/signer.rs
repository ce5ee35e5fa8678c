//! Content hashing and the request signature.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};

use super::canonical::{QueryParams, canonicalize};

/// Errors producing signing inputs.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The request body could not be rendered as JSON
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The secret could not key the MAC
    #[error("invalid signing key")]
    InvalidKey,
}

/// Render a request body as compact JSON.
///
/// These exact bytes must be both hashed and sent; re-serializing after
/// signing can reorder or reformat and break the signature.
pub fn json_body<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>, SignError> {
    Ok(serde_json::to_vec(body)?)
}

/// URL-safe, unpadded base64 of the SHA-256 digest of `content`.
pub fn content_hash(content: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(content))
}

/// Compute the `X-jd-sign` value for a request.
///
/// The signed payload is `path_timestamp_login_bodyHash_paramsHash`, with
/// the path lower-cased and either hash empty when its input is absent.
/// An empty parameter set hashes to the empty string, same as no
/// parameters at all.
pub fn sign(
    path: &str,
    body: Option<&[u8]>,
    params: Option<&QueryParams>,
    profile_login: &str,
    password_secret: &str,
    timestamp: &str,
) -> Result<String, SignError> {
    let body_hash = body.map(content_hash).unwrap_or_default();

    let canonical = params.map(canonicalize).unwrap_or_default();
    let params_hash = if canonical.is_empty() {
        String::new()
    } else {
        tracing::trace!(canonical = %canonical, "canonical query");
        content_hash(canonical.as_bytes())
    };

    let payload = format!(
        "{}_{}_{}_{}_{}",
        path.to_lowercase(),
        timestamp,
        profile_login,
        body_hash,
        params_hash
    );

    let mut mac = Hmac::<Sha512>::new_from_slice(password_secret.as_bytes())
        .map_err(|_| SignError::InvalidKey)?;
    mac.update(payload.as_bytes());

    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}
