//! Anonymous device sessions.
//!
//! Every signed request needs a profile login and password secret. Those
//! come from an anonymous registration, which must happen at most once per
//! client no matter how many requests race to need it.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::jakdojade::JakdojadeError;

/// Credentials used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub profile_login: String,
    /// Secret keying the request signature. Returned by the provider as
    /// `passwordHash`.
    pub password_secret: String,
}

impl Credentials {
    pub fn new(profile_login: impl Into<String>, password_secret: impl Into<String>) -> Self {
        Self {
            profile_login: profile_login.into(),
            password_secret: password_secret.into(),
        }
    }

    /// Reject credentials with an empty login or secret.
    pub fn validate(self) -> Result<Self, JakdojadeError> {
        if self.profile_login.is_empty() {
            return Err(JakdojadeError::MalformedCredentials(
                "empty profileLogin".to_string(),
            ));
        }
        if self.password_secret.is_empty() {
            return Err(JakdojadeError::MalformedCredentials(
                "empty passwordHash".to_string(),
            ));
        }
        Ok(self)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("profile_login", &self.profile_login)
            .field("password_secret", &"<redacted>")
            .finish()
    }
}

/// A device id together with the credentials registered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    pub device_id: String,
    pub credentials: Credentials,
}

impl DeviceSession {
    pub fn profile_login(&self) -> &str {
        &self.credentials.profile_login
    }

    pub fn password_secret(&self) -> &str {
        &self.credentials.password_secret
    }
}

/// Owns the device id and lazily acquired credentials.
///
/// Clones share the same credential cell, so a registration performed
/// through one clone is visible to all of them.
#[derive(Debug, Clone)]
pub struct SessionManager {
    device_id: String,
    credentials: Arc<OnceCell<Credentials>>,
}

impl SessionManager {
    /// A manager that will register on first use.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            credentials: Arc::new(OnceCell::new()),
        }
    }

    /// A manager with credentials supplied up front. No registration will
    /// ever be performed.
    pub fn with_credentials(device_id: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            device_id: device_id.into(),
            credentials: Arc::new(OnceCell::new_with(Some(credentials))),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Credentials if a session has been established.
    pub fn current(&self) -> Option<DeviceSession> {
        self.credentials.get().map(|credentials| DeviceSession {
            device_id: self.device_id.clone(),
            credentials: credentials.clone(),
        })
    }

    /// Return the session, running `register` if none exists yet.
    ///
    /// Concurrent callers wait on a single registration. If it fails, every
    /// waiter gets an error and the next call tries again.
    pub async fn ensure_session<F, Fut>(&self, register: F) -> Result<DeviceSession, JakdojadeError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Credentials, JakdojadeError>>,
    {
        let device_id = self.device_id.clone();
        let credentials = self
            .credentials
            .get_or_try_init(|| async move {
                let credentials = register(device_id).await?.validate()?;
                info!(
                    profile_login = %credentials.profile_login,
                    "Registered anonymous device"
                );
                Ok::<_, JakdojadeError>(credentials)
            })
            .await?;

        Ok(DeviceSession {
            device_id: self.device_id.clone(),
            credentials: credentials.clone(),
        })
    }
}
