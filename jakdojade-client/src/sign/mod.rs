//! Request signing for the Jakdojade API.
//!
//! Every authenticated call carries an `X-jd-sign` header: an HMAC-SHA512
//! over the lower-cased request path, the Unix timestamp, the profile login,
//! and content hashes of the JSON body and the canonical query string.
//! The server recomputes the same value independently, so every byte of the
//! canonical form matters. A mismatch surfaces only as a rejected request.

mod canonical;
mod signer;

pub use canonical::{QueryParams, canonicalize};
pub use signer::{SignError, content_hash, json_body, sign};
