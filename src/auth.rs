use crate::credentials::ServiceAccountKey;
use crate::error::{Error, ResourceError};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// OAuth2 scope required to manage wallet classes and objects.
pub const WALLET_ISSUER_SCOPE: &str = "https://www.googleapis.com/auth/wallet_object.issuer";

const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const GRANT_LIFETIME: Duration = Duration::from_secs(60 * 60);
const EXPIRATION_DRIFT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expiry_time: i64,
}

/// Exchanges a signed service-account grant for a bearer token.
///
/// The exchanged token is cached and reused until it gets close to expiry.
/// Each exchange is attempted exactly once; there is no retry.
pub struct AccessTokenSigner {
    credential: ServiceAccountKey,
    scope: String,
    encoding_key: EncodingKey,
    http: HttpClient,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for AccessTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenSigner")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl AccessTokenSigner {
    /// Creates a signer scoped to [`WALLET_ISSUER_SCOPE`].
    pub fn new(credential: ServiceAccountKey) -> Result<Self, Error> {
        Self::with_scope(credential, WALLET_ISSUER_SCOPE)
    }

    pub fn with_scope(
        credential: ServiceAccountKey,
        scope: impl Into<String>,
    ) -> Result<Self, Error> {
        let encoding_key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
            .map_err(|e| Error::Credential(format!("unusable private key: {e}")))?;
        Ok(Self {
            credential,
            scope: scope.into(),
            encoding_key,
            http: HttpClient::new(),
            cached: RwLock::new(None),
        })
    }

    /// Returns a cached bearer token when still valid, otherwise exchanges a
    /// fresh grant.
    pub fn token(&self) -> Result<String, Error> {
        if let Some(cached) = self
            .cached
            .read()
            .expect("token cache lock poisoned")
            .as_ref()
        {
            let now = unix_time_now();
            if now + EXPIRATION_DRIFT.as_secs() as i64 <= cached.expiry_time {
                return Ok(cached.token.clone());
            }
        }
        self.exchange_once()
    }

    /// Performs one grant exchange and updates the cache.
    pub fn exchange_once(&self) -> Result<String, Error> {
        let now = unix_time_now();
        let assertion = self.sign_grant(now)?;
        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params.append_pair("grant_type", GRANT_TYPE_JWT_BEARER);
        params.append_pair("assertion", &assertion);
        let body = params.finish();

        let resp = self
            .http
            .post(&self.credential.token_uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()?;
        let status = resp.status();
        if status != StatusCode::OK {
            let bytes = resp.bytes()?;
            return Err(Error::Api(ResourceError::from_body(status.as_u16(), &bytes)));
        }
        let token: TokenResponse = resp.json()?;
        let expiry_time = now + token.expires_in.unwrap_or(GRANT_LIFETIME.as_secs() as i64);
        *self.cached.write().expect("token cache lock poisoned") = Some(CachedToken {
            token: token.access_token.clone(),
            expiry_time,
        });
        Ok(token.access_token)
    }

    fn sign_grant(&self, now: i64) -> Result<String, Error> {
        let claims = GrantClaims {
            iss: &self.credential.client_email,
            scope: &self.scope,
            aud: &self.credential.token_uri,
            iat: now,
            exp: now + GRANT_LIFETIME.as_secs() as i64,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.credential.private_key_id.clone();
        Ok(encode(&header, &claims, &self.encoding_key)?)
    }
}

pub(crate) fn unix_time_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
