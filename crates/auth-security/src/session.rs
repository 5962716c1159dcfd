//! Session window policy
//!
//! A token carries two expiries: the signed `exp` claim and the session
//! window `session_start + lifetime`. Both are folded into one
//! authoritative expiry here so no caller checks them separately.

use serde::Serialize;
use thiserror::Error;

use auth_shared::constants::REFRESH_LIFETIME_MULTIPLIER;

use crate::jwt::Claims;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Session expired at {expired_at}")]
pub struct SessionExpired {
    pub expired_at: i64,
}

/// Derived on every check, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionDescriptor {
    pub time_remaining: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    lifetime_secs: i64,
}

impl SessionWindow {
    pub fn new(lifetime_secs: i64) -> Self {
        Self { lifetime_secs }
    }

    /// The window implied by a refresh token issued for `base_lifetime_secs` sessions.
    pub fn refresh(base_lifetime_secs: i64) -> Self {
        Self::new(base_lifetime_secs.saturating_mul(REFRESH_LIFETIME_MULTIPLIER))
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    pub fn session_expiry(&self, claims: &Claims) -> i64 {
        claims.session_start.saturating_add(self.lifetime_secs)
    }

    /// The earlier of the signed expiry and the session window end.
    pub fn authoritative_expiry(&self, claims: &Claims) -> i64 {
        self.session_expiry(claims).min(claims.exp)
    }

    pub fn check(&self, claims: &Claims, now: i64) -> Result<SessionDescriptor, SessionExpired> {
        let expires_at = self.authoritative_expiry(claims);
        if now >= expires_at {
            return Err(SessionExpired { expired_at: expires_at });
        }

        Ok(SessionDescriptor {
            time_remaining: (expires_at - now).max(0),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(session_start: i64, exp: i64) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            session_start,
            iat: session_start,
            exp,
        }
    }

    #[test]
    fn test_window_boundary() {
        let window = SessionWindow::new(3600);
        let claims = claims(1000, 4600);

        assert_eq!(
            window.check(&claims, 4599),
            Ok(SessionDescriptor { time_remaining: 1, expires_at: 4600 })
        );
        assert_eq!(window.check(&claims, 4600), Err(SessionExpired { expired_at: 4600 }));
    }

    #[test]
    fn test_window_wins_over_far_future_exp() {
        let window = SessionWindow::new(3600);
        let claims = claims(1000, 1_000_000);
        assert_eq!(window.authoritative_expiry(&claims), 4600);
        assert!(window.check(&claims, 4600).is_err());
    }

    #[test]
    fn test_exp_wins_when_earlier() {
        let window = SessionWindow::new(3600);
        let claims = claims(1000, 2000);
        assert_eq!(window.authoritative_expiry(&claims), 2000);
        assert_eq!(window.check(&claims, 2000), Err(SessionExpired { expired_at: 2000 }));
    }

    #[test]
    fn test_time_remaining_is_non_increasing() {
        let window = SessionWindow::new(3600);
        let claims = claims(1000, 4600);

        let mut previous = i64::MAX;
        for now in (0..6000).step_by(37) {
            let remaining = window.check(&claims, now).map(|d| d.time_remaining).unwrap_or(0);
            assert!(remaining >= 0);
            assert!(remaining <= previous, "remaining grew at t={}", now);
            previous = remaining;
        }
    }

    #[test]
    fn test_refresh_window_is_seven_times_base() {
        let access = SessionWindow::new(3600);
        let refresh = SessionWindow::refresh(3600);
        let claims = claims(1000, i64::MAX);

        assert_eq!(refresh.lifetime_secs(), 7 * access.lifetime_secs());
        assert_eq!(
            refresh.session_expiry(&claims) - claims.session_start,
            7 * (access.session_expiry(&claims) - claims.session_start)
        );
    }
}
