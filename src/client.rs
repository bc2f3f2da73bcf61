use crate::auth::AccessTokenSigner;
use crate::error::{Error, ResourceError};
use crate::models::{Issuer, ObjectOutcome, ObjectType, Permissions, RawResponse};
use crate::object_id::ObjectId;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Production endpoint for the Wallet Objects API.
pub const DEFAULT_BASE_URL: &str = "https://walletobjects.googleapis.com/walletobjects/v1";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct WalletClientBuilder {
    base_url: Url,
    timeout: Option<Duration>,
    auth: Option<AuthProvider>,
}

impl std::fmt::Debug for WalletClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WalletClientBuilder {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            base_url: Url::parse(base_url.as_ref())?,
            timeout: Some(DEFAULT_TIMEOUT),
            auth: None,
        })
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the request timeout. A hung transport then blocks the caller
    /// indefinitely.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Authenticates every request with a fixed bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthProvider::StaticToken(token.into()));
        self
    }

    /// Authenticates every request with tokens minted by the signer.
    pub fn service_account(mut self, signer: AccessTokenSigner) -> Self {
        self.auth = Some(AuthProvider::ServiceAccount(Box::new(signer)));
        self
    }

    pub fn build(self) -> Result<WalletClient, Error> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(WalletClient {
            base_url: self.base_url,
            http,
            auth: self.auth,
        })
    }
}

enum AuthProvider {
    StaticToken(String),
    ServiceAccount(Box<AccessTokenSigner>),
}

/// Blocking client for the Wallet Objects REST API.
///
/// Calls run strictly one at a time; each returns only after the server has
/// answered. There is no retry anywhere, every call is attempted exactly
/// once.
pub struct WalletClient {
    base_url: Url,
    http: HttpClient,
    auth: Option<AuthProvider>,
}

impl WalletClient {
    pub fn builder(base_url: impl AsRef<str>) -> Result<WalletClientBuilder, Error> {
        WalletClientBuilder::new(base_url)
    }

    /// Builder preset for [`DEFAULT_BASE_URL`].
    pub fn production() -> Result<WalletClientBuilder, Error> {
        WalletClientBuilder::new(DEFAULT_BASE_URL)
    }

    /// Creates a class resource via `POST /{type}Class/`.
    ///
    /// The server reply is returned verbatim whatever its status; repeated
    /// calls for the same class id typically come back as a 409 conflict, and
    /// interpreting that is the caller's business. Only transport and
    /// body-read failures are errors.
    pub fn insert_class(
        &self,
        object_type: ObjectType,
        payload: &Value,
    ) -> Result<RawResponse, Error> {
        let url = self.build_url(&[&object_type.class_resource(), ""])?;
        let mut req = self.http.post(url).json(payload);
        req = self.apply_auth(req)?;
        let resp = req.send()?;
        Self::raw_response(resp)
    }

    /// Fetches an object via `GET /{type}Object/{id}`.
    pub fn get_object(&self, object_type: ObjectType, id: &ObjectId) -> Result<Value, Error> {
        let url = self.build_url(&[&object_type.object_resource(), id.as_str()])?;
        let mut req = self.http.get(url);
        req = self.apply_auth(req)?;
        let resp = req.send()?;
        self.expect_ok_json(resp)
    }

    /// Creates an object via `POST /{type}Object/`.
    pub fn insert_object(&self, object_type: ObjectType, payload: &Value) -> Result<Value, Error> {
        let url = self.build_url(&[&object_type.object_resource(), ""])?;
        let mut req = self.http.post(url).json(payload);
        req = self.apply_auth(req)?;
        let resp = req.send()?;
        self.expect_ok_json(resp)
    }

    /// Fetches the object, creating it from `payload` only when the fetch
    /// reports 404.
    ///
    /// Any other fetch failure is returned as the error itself and no
    /// creation request is issued; authorization problems and malformed
    /// payloads stay visible instead of masquerading as a fetched object.
    pub fn ensure_object(
        &self,
        object_type: ObjectType,
        id: &ObjectId,
        payload: &Value,
    ) -> Result<ObjectOutcome, Error> {
        match self.get_object(object_type, id) {
            Ok(existing) => Ok(ObjectOutcome::Found(existing)),
            Err(Error::Api(err)) if err.code == StatusCode::NOT_FOUND.as_u16() as i32 => {
                let created = self.insert_object(object_type, payload)?;
                Ok(ObjectOutcome::Created(created))
            }
            Err(err) => Err(err),
        }
    }

    /// Creates an issuer account via `POST /issuer`.
    pub fn create_issuer(&self, issuer: &Issuer) -> Result<Issuer, Error> {
        let url = self.build_url(&["issuer"])?;
        let mut req = self.http.post(url).json(issuer);
        req = self.apply_auth(req)?;
        let resp = req.send()?;
        self.expect_ok_json(resp)
    }

    /// Replaces an issuer's entire permission list via
    /// `PUT /permissions/{issuerId}`.
    ///
    /// This is a replacement, not a merge: the API applies `permissions`
    /// wholesale, so the full desired set must be supplied on every call and
    /// any entry left out is revoked.
    pub fn replace_permissions(
        &self,
        issuer_id: &str,
        permissions: &Permissions,
    ) -> Result<Permissions, Error> {
        let url = self.build_url(&["permissions", issuer_id])?;
        let mut req = self.http.put(url).json(permissions);
        req = self.apply_auth(req)?;
        let resp = req.send()?;
        self.expect_ok_json(resp)
    }

    fn build_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path_segments = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            path_segments.pop_if_empty();
            for segment in segments {
                path_segments.push(segment);
            }
        }
        Ok(url)
    }

    fn apply_auth(&self, mut req: RequestBuilder) -> Result<RequestBuilder, Error> {
        if let Some(ref auth) = self.auth {
            let token = match auth {
                AuthProvider::StaticToken(token) => token.clone(),
                AuthProvider::ServiceAccount(signer) => signer.token()?,
            };
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    fn expect_ok_json<T: serde::de::DeserializeOwned>(&self, resp: Response) -> Result<T, Error> {
        if resp.status() == StatusCode::OK {
            resp.json::<T>().map_err(Error::from)
        } else {
            self.parse_error(resp)
        }
    }

    fn parse_error<T>(&self, resp: Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.bytes()?;
        Err(Error::Api(ResourceError::from_body(status.as_u16(), &body)))
    }

    fn raw_response(resp: Response) -> Result<RawResponse, Error> {
        let status = resp.status().as_u16();
        let bytes = resp.bytes()?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        Ok(RawResponse { status, body })
    }
}
