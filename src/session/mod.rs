//! Signed cookie sessions
//!
//! The server keeps no per-user storage. Each user's [`UiState`] and pending
//! notifications travel in a cookie of the form
//! `base64url(json).base64url(hmac_sha256(json))`.

use crate::ui::{Notification, UiState};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session
pub const SESSION_COOKIE: &str = "vizualnetwork-session";

/// Everything remembered between requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub ui: UiState,
    /// Notifications to show on the next rendered page
    pub flash: Vec<Notification>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session key")]
    Key,
    #[error("malformed session cookie")]
    Malformed,
    #[error("session signature mismatch")]
    BadSignature,
    #[error("invalid session payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Signs and verifies session cookies with the instance secret
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        if self.key.is_empty() {
            return Err(SessionError::Key);
        }
        HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::Key)
    }

    /// Serialize and sign
    pub fn encode(&self, state: &SessionState) -> Result<String, SessionError> {
        let payload = serde_json::to_vec(state)?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verify and deserialize
    pub fn decode(&self, value: &str) -> Result<SessionState, SessionError> {
        let (payload, signature) = value.split_once('.').ok_or(SessionError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        Ok(serde_json::from_slice(&payload)?)
    }

    /// Session from the request cookies; a missing or tampered cookie starts
    /// a fresh session
    pub fn load(&self, headers: &HeaderMap) -> SessionState {
        match cookie_value(headers, SESSION_COOKIE) {
            Some(value) => self.decode(value).unwrap_or_else(|e| {
                tracing::debug!("Discarding session cookie: {}", e);
                SessionState::default()
            }),
            None => SessionState::default(),
        }
    }
}

/// Find a cookie by name across all `Cookie` headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value for a site-wide, script-inaccessible cookie
pub fn set_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::View;
    use axum::http::HeaderValue;

    fn state() -> SessionState {
        SessionState {
            ui: UiState {
                view: View::About,
                settings_open: true,
                engine: "wisp".to_string(),
                ..Default::default()
            },
            flash: vec![Notification::warning("Please enter a URL or search term")],
        }
    }

    #[test]
    fn test_signed_state_survives() {
        let codec = SessionCodec::new("secret");
        let value = codec.encode(&state()).unwrap();
        assert!(!value.contains(';'));
        assert_eq!(codec.decode(&value).unwrap(), state());
    }

    #[test]
    fn test_other_key_rejected() {
        let value = SessionCodec::new("secret").encode(&state()).unwrap();
        let err = SessionCodec::new("other").decode(&value).unwrap_err();
        assert!(matches!(err, SessionError::BadSignature));
    }

    #[test]
    fn test_empty_key_refuses_to_sign() {
        let err = SessionCodec::new("").encode(&state()).unwrap_err();
        assert!(matches!(err, SessionError::Key));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = SessionCodec::new("secret");
        let value = codec.encode(&state()).unwrap();
        let (_, signature) = value.split_once('.').unwrap();

        let forged = SessionState {
            ui: UiState {
                engine: "scramjet".to_string(),
                ..Default::default()
            },
            flash: Vec::new(),
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let err = codec
            .decode(&format!("{}.{}", forged_payload, signature))
            .unwrap_err();
        assert!(matches!(err, SessionError::BadSignature));
    }

    #[test]
    fn test_malformed_cookie() {
        let codec = SessionCodec::new("secret");
        assert!(matches!(
            codec.decode("no-dot-here").unwrap_err(),
            SessionError::Malformed
        ));
        assert!(matches!(
            codec.decode("!!!.???").unwrap_err(),
            SessionError::Malformed
        ));
    }

    #[test]
    fn test_cookie_lookup() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; vizualnetwork-theme=neon-grid"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));

        assert_eq!(cookie_value(&headers, "vizualnetwork-theme"), Some("neon-grid"));
        assert_eq!(cookie_value(&headers, "b"), Some("2"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_load_falls_back_to_fresh_session() {
        let codec = SessionCodec::new("secret");
        let mut headers = HeaderMap::new();
        assert_eq!(codec.load(&headers), SessionState::default());

        headers.insert(
            COOKIE,
            HeaderValue::from_static("vizualnetwork-session=garbage.value"),
        );
        assert_eq!(codec.load(&headers), SessionState::default());

        let value = codec.encode(&state()).unwrap();
        let cookie = format!("{}={}", SESSION_COOKIE, value);
        headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());
        assert_eq!(codec.load(&headers), state());
    }

    #[test]
    fn test_set_cookie_format() {
        assert_eq!(
            set_cookie("vizualnetwork-theme", "neon-grid", 60),
            "vizualnetwork-theme=neon-grid; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );
    }
}
