//! PIN registration and the short-lived PIN sessions guarding sensitive routes.

use api_types::pin::{PinRegister, PinToken, PinVerify};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use engine::{EngineError, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::{ServerError, server::ServerState};

static PIN_TOKEN_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-pin-token");

/// `TypedHeader` carrying the token handed out by `POST /me/pin/verify`.
#[derive(Debug)]
pub struct PinTokenHeader(String);

impl Header for PinTokenHeader {
    fn name() -> &'static axum::http::HeaderName {
        &PIN_TOKEN_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(PinTokenHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-pin-token header"),
        }
    }
}

/// Wrong PINs in a row before verification is locked.
pub const MAX_PIN_FAILURES: u32 = 5;

#[derive(Default)]
struct Failures {
    count: u32,
    locked_until: Option<Instant>,
}

/// In-memory PIN sessions: token -> (username, expiry), plus the per-user
/// count of consecutive wrong PINs.
pub struct PinSessions {
    ttl: Duration,
    lockout: Duration,
    sessions: RwLock<HashMap<String, (String, Instant)>>,
    failures: RwLock<HashMap<String, Failures>>,
}

impl PinSessions {
    pub fn new(ttl: Duration, lockout: Duration) -> Self {
        Self {
            ttl,
            lockout,
            sessions: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session for `username` and return its token.
    pub async fn open(&self, username: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(token.clone(), (username.to_string(), now + self.ttl));
        token
    }

    pub async fn is_valid(&self, token: &str, username: &str) -> bool {
        let sessions = self.sessions.read().await;
        matches!(
            sessions.get(token),
            Some((owner, expires_at)) if owner == username && *expires_at > Instant::now()
        )
    }

    pub async fn is_locked(&self, username: &str) -> bool {
        let failures = self.failures.read().await;
        failures
            .get(username)
            .and_then(|f| f.locked_until)
            .is_some_and(|until| until > Instant::now())
    }

    /// Count a wrong PIN. Returns `true` when this failure locks the user.
    pub async fn record_failure(&self, username: &str) -> bool {
        let now = Instant::now();
        let mut failures = self.failures.write().await;
        let entry = failures.entry(username.to_string()).or_default();
        if entry.locked_until.is_some_and(|until| until <= now) {
            *entry = Failures::default();
        }
        entry.count += 1;
        if entry.count >= MAX_PIN_FAILURES {
            entry.count = 0;
            entry.locked_until = Some(now + self.lockout);
            return true;
        }
        false
    }

    pub async fn clear_failures(&self, username: &str) {
        self.failures.write().await.remove(username);
    }

    /// Drop every session of `username`.
    pub async fn close_all(&self, username: &str) {
        self.sessions
            .write()
            .await
            .retain(|_, (owner, _)| owner != username);
    }
}

/// Fail with `403` unless the request carries a live PIN token of `user`.
pub async fn require_pin(
    state: &ServerState,
    header: Option<TypedHeader<PinTokenHeader>>,
    user: &User,
) -> Result<(), ServerError> {
    let Some(TypedHeader(PinTokenHeader(token))) = header else {
        return Err(EngineError::Forbidden("pin verification required".to_string()).into());
    };
    if state.pins.is_valid(&token, &user.username).await {
        Ok(())
    } else {
        tracing::warn!("stale pin token for {}", user.username);
        Err(EngineError::Forbidden("pin verification required".to_string()).into())
    }
}

/// Register a PIN. Replacing an existing PIN needs a verified session.
pub async fn register(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    pin_header: Option<TypedHeader<PinTokenHeader>>,
    Json(payload): Json<PinRegister>,
) -> Result<StatusCode, ServerError> {
    if user.has_pin {
        require_pin(&state, pin_header, &user).await?;
    }
    state.engine.register_pin(&user.username, &payload.pin).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn verify(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<PinVerify>,
) -> Result<Json<PinToken>, ServerError> {
    if state.pins.is_locked(&user.username).await {
        tracing::warn!("pin verification locked for {}", user.username);
        return Err(EngineError::Forbidden("too many pin attempts".to_string()).into());
    }
    if !state.engine.verify_pin(&user.username, &payload.pin).await? {
        if state.pins.record_failure(&user.username).await {
            tracing::warn!(
                "pin verification locked for {} after {MAX_PIN_FAILURES} failures",
                user.username
            );
            return Err(EngineError::Forbidden("too many pin attempts".to_string()).into());
        }
        tracing::warn!("wrong pin for {}", user.username);
        return Err(EngineError::Forbidden("pin does not match".to_string()).into());
    }
    state.pins.clear_failures(&user.username).await;

    let token = state.pins.open(&user.username).await;
    Ok(Json(PinToken {
        token,
        expires_in_secs: state.pins.ttl().as_secs(),
    }))
}
