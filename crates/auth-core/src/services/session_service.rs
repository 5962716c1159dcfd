// ============================================================================
// Auth Core - Session Authenticator
// File: crates/auth-core/src/services/session_service.rs
// ============================================================================
//! Login, verification, and refresh on top of the token codec

use std::sync::Arc;
use tracing::{error, info, warn};

use auth_security::{Clock, SessionDescriptor, SessionWindow, SystemClock, TokenCodec};
use auth_shared::config::AppConfig;
use auth_shared::constants::TOKEN_TYPE_BEARER;
use auth_shared::utils::mask_email;

use crate::domain::{Credentials, UserInfo, UserRecord};
use crate::error::DomainError;
use crate::repositories::{CredentialVerifier, UserDirectory};

/// Immutable settings the authenticator is built from.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub base_lifetime_secs: i64,
}

impl From<&AppConfig> for AuthConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            secret: config.jwt.secret.clone(),
            base_lifetime_secs: config.session.lifetime_secs,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_lifetime_secs", &self.base_lifetime_secs)
            .finish_non_exhaustive()
    }
}

/// Stateless session lifecycle: every call is a function of the token,
/// the configuration, the clock, and one directory round trip.
pub struct SessionAuthenticator {
    directory: Arc<dyn UserDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
    codec: TokenCodec,
    access_window: SessionWindow,
    refresh_window: SessionWindow,
    clock: Arc<dyn Clock>,
}

impl SessionAuthenticator {
    /// Fails on a weak secret or a non-positive lifetime.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
        config: &AuthConfig,
    ) -> Result<Self, DomainError> {
        if config.base_lifetime_secs <= 0 {
            return Err(DomainError::Configuration(format!(
                "base session lifetime must be positive, got {}",
                config.base_lifetime_secs
            )));
        }
        let codec = TokenCodec::new(&config.secret)?;

        Ok(Self {
            directory,
            verifier,
            codec,
            access_window: SessionWindow::new(config.base_lifetime_secs),
            refresh_window: SessionWindow::refresh(config.base_lifetime_secs),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_lifetime_secs(&self) -> i64 {
        self.access_window.lifetime_secs()
    }

    /// Check credentials and issue an access/refresh pair anchored to one clock read.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, DomainError> {
        let identifier = credentials.identifier.trim();
        info!("Login attempt for email: {}", mask_email(identifier));

        if credentials.is_blank() {
            warn!("Login failed: blank identifier or password");
            return Err(DomainError::InvalidCredentials);
        }

        // 1. Verify password
        match self.verifier.check(identifier, &credentials.secret).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Login failed: invalid credentials for: {}", mask_email(identifier));
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => {
                warn!("Login failed: credential check errored for {}: {}", mask_email(identifier), e);
                return Err(DomainError::InvalidCredentials);
            }
        }

        // 2. Resolve the subject
        let user = self
            .directory
            .find_by_identifier(identifier)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| {
                warn!("Login failed: no directory entry for: {}", mask_email(identifier));
                DomainError::InvalidCredentials
            })?;

        // 3. Issue both tokens from the same instant
        let now = self.clock.now();
        let subject = user.subject();
        let access_token =
            self.codec.issue(&subject, &user.email, self.access_window.lifetime_secs(), now)?;
        let refresh_token =
            self.codec.issue(&subject, &user.email, self.refresh_window.lifetime_secs(), now)?;

        info!("Login successful for: {}", mask_email(&user.email));

        Ok(LoginResult {
            user: UserInfo::from(&user),
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER,
            expires_in: self.access_window.lifetime_secs(),
        })
    }

    /// Validate an access token and report how long its session has left.
    pub async fn verify(&self, access_token: Option<&str>) -> Result<VerifiedSession, DomainError> {
        let token = present(access_token)?;
        let now = self.clock.now();

        let claims = self.codec.decode(token, now).map_err(|e| {
            warn!("Verify failed: {}", e);
            DomainError::from(e)
        })?;

        let session = self.access_window.check(&claims, now).map_err(|e| {
            warn!("Verify failed: {}", e);
            DomainError::SessionExpired
        })?;

        let user = self.resolve_subject(&claims.sub, &claims.email).await?;

        Ok(VerifiedSession {
            user: UserInfo::from(&user),
            session,
        })
    }

    /// Trade a refresh token for a new access token whose session starts now.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshResult, DomainError> {
        let token = present(refresh_token)?;
        let now = self.clock.now();

        let claims = self.codec.decode(token, now).map_err(|e| {
            warn!("Refresh failed: {}", e);
            DomainError::from(e)
        })?;

        self.refresh_window.check(&claims, now).map_err(|e| {
            warn!("Refresh failed: {}", e);
            DomainError::SessionExpired
        })?;

        let user = self.resolve_subject(&claims.sub, &claims.email).await?;

        let access_token = self.codec.issue(
            &user.subject(),
            &user.email,
            self.access_window.lifetime_secs(),
            now,
        )?;

        info!("Token refreshed for: {}", mask_email(&user.email));

        Ok(RefreshResult {
            access_token,
            token_type: TOKEN_TYPE_BEARER,
            expires_in: self.access_window.lifetime_secs(),
        })
    }

    /// Nothing to invalidate server side; the transport drops the tokens.
    pub fn logout(&self) -> LogoutAck {
        LogoutAck {
            message: "Logout successful",
        }
    }

    async fn resolve_subject(&self, subject: &str, email: &str) -> Result<UserRecord, DomainError> {
        let user = self
            .directory
            .find_by_identifier(email)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| {
                warn!("User no longer exists: {}", mask_email(email));
                DomainError::UserNotFound
            })?;

        // Same email, different account: the token's user is gone.
        if user.subject() != subject {
            warn!("Subject mismatch for: {}", mask_email(email));
            return Err(DomainError::UserNotFound);
        }
        Ok(user)
    }
}

fn present(token: Option<&str>) -> Result<&str, DomainError> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(DomainError::TokenMissing),
    }
}

fn unavailable(e: DomainError) -> DomainError {
    error!("User directory failed: {}", e);
    match e {
        DomainError::CollaboratorUnavailable(_) => e,
        other => DomainError::CollaboratorUnavailable(other.to_string()),
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Result of successful refresh
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Result of successful verification
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub user: UserInfo,
    pub session: SessionDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutAck {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;
    use auth_security::{Claims, ManualClock};

    use crate::domain::Role;
    use crate::repositories::{MockCredentialVerifier, MockUserDirectory};

    const SECRET: &str = "session-service-test-secret-32-bytes!!";
    const BASE: i64 = 3600;

    /// Directory and verifier in one; passwords compared as-is, test only.
    #[derive(Default)]
    struct FakeUsers {
        users: RwLock<HashMap<String, (UserRecord, String)>>,
    }

    impl FakeUsers {
        fn with_user(email: &str, password: &str) -> Arc<Self> {
            let users = Arc::new(Self::default());
            users.add(email, password);
            users
        }

        fn add(&self, email: &str, password: &str) -> UserRecord {
            let user = UserRecord::new(email.to_string(), email.to_string(), Role::User);
            self.users
                .write()
                .unwrap()
                .insert(email.to_string(), (user.clone(), password.to_string()));
            user
        }

        fn remove(&self, email: &str) {
            self.users.write().unwrap().remove(email);
        }
    }

    #[async_trait]
    impl UserDirectory for FakeUsers {
        async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, DomainError> {
            Ok(self.users.read().unwrap().get(identifier).map(|(u, _)| u.clone()))
        }
    }

    #[async_trait]
    impl CredentialVerifier for FakeUsers {
        async fn check(&self, identifier: &str, secret: &str) -> Result<bool, DomainError> {
            Ok(self
                .users
                .read()
                .unwrap()
                .get(identifier)
                .map(|(_, password)| password == secret)
                .unwrap_or(false))
        }
    }

    fn config() -> AuthConfig {
        AuthConfig {
            secret: SECRET.to_string(),
            base_lifetime_secs: BASE,
        }
    }

    fn authenticator(users: Arc<FakeUsers>, clock: Arc<ManualClock>) -> SessionAuthenticator {
        SessionAuthenticator::new(users.clone(), users, &config())
            .unwrap()
            .with_clock(clock)
    }

    fn creds() -> Credentials {
        Credentials::new("user@example.com", "password123")
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET).unwrap()
    }

    #[test]
    fn test_new_rejects_weak_secret() {
        let users = Arc::new(FakeUsers::default());
        let config = AuthConfig {
            secret: "short".to_string(),
            base_lifetime_secs: BASE,
        };
        let result = SessionAuthenticator::new(users.clone(), users, &config);
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_non_positive_lifetime() {
        let users = Arc::new(FakeUsers::default());
        let config = AuthConfig {
            secret: SECRET.to_string(),
            base_lifetime_secs: 0,
        };
        let result = SessionAuthenticator::new(users.clone(), users, &config);
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_login_issues_pair_from_one_instant() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(FakeUsers::with_user("user@example.com", "password123"), clock);

        let result = auth.login(&creds()).await.unwrap();
        assert_eq!(result.token_type, "Bearer");
        assert_eq!(result.expires_in, BASE);
        assert_eq!(result.user.email, "user@example.com");

        let access = codec().decode(&result.access_token, 1000).unwrap();
        let refresh = codec().decode(&result.refresh_token, 1000).unwrap();

        assert_eq!(access.session_start, 1000);
        assert_eq!(access.exp, 4600);
        assert_eq!(refresh.session_start, access.session_start);
        assert_eq!(refresh.exp, 1000 + 7 * BASE);
        assert_eq!(access.sub, result.user.id.to_string());
        assert_eq!(refresh.sub, access.sub);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(FakeUsers::with_user("user@example.com", "password123"), clock);

        let err = auth
            .login(&Credentials::new("user@example.com", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);

        let err = auth
            .login(&Credentials::new("ghost@example.com", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_input_without_calling_collaborators() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_identifier().times(0);
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_check().times(0);

        let auth =
            SessionAuthenticator::new(Arc::new(directory), Arc::new(verifier), &config()).unwrap();

        for (id, pw) in [("", "password123"), ("   ", "password123"), ("user@example.com", "")] {
            let err = auth.login(&Credentials::new(id, pw)).await.unwrap_err();
            assert_eq!(err, DomainError::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn test_login_treats_verifier_failure_as_invalid_credentials() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_identifier().times(0);
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_check()
            .times(1)
            .returning(|_, _| Err(DomainError::CollaboratorUnavailable("hash store down".into())));

        let auth =
            SessionAuthenticator::new(Arc::new(directory), Arc::new(verifier), &config()).unwrap();
        let err = auth.login(&creds()).await.unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_surfaces_directory_failure() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Err(DomainError::CollaboratorUnavailable("timeout".into())));
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_check().times(1).returning(|_, _| Ok(true));

        let auth =
            SessionAuthenticator::new(Arc::new(directory), Arc::new(verifier), &config()).unwrap();
        let err = auth.login(&creds()).await.unwrap_err();
        assert_eq!(err, DomainError::CollaboratorUnavailable("timeout".into()));
    }

    #[tokio::test]
    async fn test_verify_window_boundary() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(
            FakeUsers::with_user("user@example.com", "password123"),
            clock.clone(),
        );
        let login = auth.login(&creds()).await.unwrap();

        clock.set(4599);
        let verified = auth.verify(Some(&login.access_token)).await.unwrap();
        assert_eq!(verified.session.time_remaining, 1);
        assert_eq!(verified.session.expires_at, 4600);
        assert_eq!(verified.user.email, "user@example.com");

        clock.set(4600);
        let err = auth.verify(Some(&login.access_token)).await.unwrap_err();
        assert_eq!(err, DomainError::SessionExpired);

        clock.set(4601);
        let err = auth.verify(Some(&login.access_token)).await.unwrap_err();
        assert_eq!(err, DomainError::Expired);
    }

    #[tokio::test]
    async fn test_verify_session_window_beats_far_future_exp() {
        let users = FakeUsers::with_user("user@example.com", "password123");
        let user = users.find_by_identifier("user@example.com").await.unwrap().unwrap();
        let clock = Arc::new(ManualClock::new(4600));
        let auth = authenticator(users, clock.clone());

        let token = codec()
            .encode(&Claims {
                sub: user.subject(),
                email: user.email.clone(),
                session_start: 1000,
                iat: 1000,
                exp: 1000 + 1_000_000,
            })
            .unwrap();

        let err = auth.verify(Some(&token)).await.unwrap_err();
        assert_eq!(err, DomainError::SessionExpired);

        clock.set(4599);
        assert!(auth.verify(Some(&token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_time_remaining_counts_down() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(
            FakeUsers::with_user("user@example.com", "password123"),
            clock.clone(),
        );
        let login = auth.login(&creds()).await.unwrap();

        let mut previous = i64::MAX;
        for now in (1000..4600).step_by(450) {
            clock.set(now);
            let remaining = auth
                .verify(Some(&login.access_token))
                .await
                .unwrap()
                .session
                .time_remaining;
            assert_eq!(remaining, 4600 - now);
            assert!(remaining <= previous);
            previous = remaining;
        }
    }

    #[tokio::test]
    async fn test_verify_missing_token() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(Arc::new(FakeUsers::default()), clock);

        assert_eq!(auth.verify(None).await.unwrap_err(), DomainError::TokenMissing);
        assert_eq!(auth.verify(Some("")).await.unwrap_err(), DomainError::TokenMissing);
        assert_eq!(auth.verify(Some("  ")).await.unwrap_err(), DomainError::TokenMissing);
        assert_eq!(auth.refresh(None).await.unwrap_err(), DomainError::TokenMissing);
    }

    #[tokio::test]
    async fn test_verify_distinguishes_bad_tokens() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(
            FakeUsers::with_user("user@example.com", "password123"),
            clock,
        );
        let login = auth.login(&creds()).await.unwrap();

        let err = auth.verify(Some("not-a-token")).await.unwrap_err();
        assert_eq!(err, DomainError::Malformed);

        let foreign = TokenCodec::new("a-completely-different-secret-of-32b")
            .unwrap()
            .issue(&login.user.id.to_string(), "user@example.com", BASE, 1000)
            .unwrap();
        let err = auth.verify(Some(&foreign)).await.unwrap_err();
        assert_eq!(err, DomainError::InvalidSignature);
    }

    #[tokio::test]
    async fn test_verify_after_user_deleted() {
        let clock = Arc::new(ManualClock::new(1000));
        let users = FakeUsers::with_user("user@example.com", "password123");
        let auth = authenticator(users.clone(), clock.clone());
        let login = auth.login(&creds()).await.unwrap();

        users.remove("user@example.com");
        clock.set(1500);
        let err = auth.verify(Some(&login.access_token)).await.unwrap_err();
        assert_eq!(err, DomainError::UserNotFound);
    }

    #[tokio::test]
    async fn test_verify_after_user_recreated_with_same_email() {
        let clock = Arc::new(ManualClock::new(1000));
        let users = FakeUsers::with_user("user@example.com", "password123");
        let auth = authenticator(users.clone(), clock);
        let login = auth.login(&creds()).await.unwrap();

        users.remove("user@example.com");
        users.add("user@example.com", "password123");

        let err = auth.verify(Some(&login.access_token)).await.unwrap_err();
        assert_eq!(err, DomainError::UserNotFound);
    }

    #[tokio::test]
    async fn test_verify_surfaces_directory_failure() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Err(DomainError::Configuration("pool exhausted".into())));
        let verifier = MockCredentialVerifier::new();

        let auth = SessionAuthenticator::new(Arc::new(directory), Arc::new(verifier), &config())
            .unwrap()
            .with_clock(Arc::new(ManualClock::new(1000)));
        let token = codec().issue("some-id", "user@example.com", BASE, 1000).unwrap();

        let err = auth.verify(Some(&token)).await.unwrap_err();
        assert!(matches!(err, DomainError::CollaboratorUnavailable(_)));
    }

    #[tokio::test]
    async fn test_refresh_resets_session_start() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(
            FakeUsers::with_user("user@example.com", "password123"),
            clock.clone(),
        );
        let login = auth.login(&creds()).await.unwrap();

        clock.set(2000);
        let refreshed = auth.refresh(Some(&login.refresh_token)).await.unwrap();
        assert_eq!(refreshed.expires_in, BASE);

        let claims = codec().decode(&refreshed.access_token, 2000).unwrap();
        assert_eq!(claims.session_start, 2000);
        assert_eq!(claims.exp, 2000 + BASE);

        // The new access token outlives the one from login.
        clock.set(4600);
        assert_eq!(
            auth.verify(Some(&login.access_token)).await.unwrap_err(),
            DomainError::SessionExpired
        );
        let verified = auth.verify(Some(&refreshed.access_token)).await.unwrap();
        assert_eq!(verified.session.expires_at, 5600);
        assert_eq!(verified.session.time_remaining, 1000);
    }

    #[tokio::test]
    async fn test_refresh_window_is_seven_base_lifetimes() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(
            FakeUsers::with_user("user@example.com", "password123"),
            clock.clone(),
        );
        let login = auth.login(&creds()).await.unwrap();

        clock.set(1000 + 7 * BASE - 1);
        assert!(auth.refresh(Some(&login.refresh_token)).await.is_ok());

        clock.set(1000 + 7 * BASE);
        assert_eq!(
            auth.refresh(Some(&login.refresh_token)).await.unwrap_err(),
            DomainError::SessionExpired
        );

        clock.set(1000 + 7 * BASE + 1);
        assert_eq!(
            auth.refresh(Some(&login.refresh_token)).await.unwrap_err(),
            DomainError::Expired
        );
    }

    #[tokio::test]
    async fn test_refresh_rejects_deleted_user() {
        let clock = Arc::new(ManualClock::new(1000));
        let users = FakeUsers::with_user("user@example.com", "password123");
        let auth = authenticator(users.clone(), clock);
        let login = auth.login(&creds()).await.unwrap();

        users.remove("user@example.com");
        assert_eq!(
            auth.refresh(Some(&login.refresh_token)).await.unwrap_err(),
            DomainError::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_logout_is_acknowledged() {
        let clock = Arc::new(ManualClock::new(1000));
        let auth = authenticator(Arc::new(FakeUsers::default()), clock);
        assert_eq!(auth.logout().message, "Logout successful");
    }
}
