use crate::credentials::ServiceAccountKey;
use crate::error::Error;
use crate::models::ObjectType;
use crate::object_id::ObjectId;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Map, Value};

/// Base URL a signed save token is appended to.
pub const SAVE_URL_PREFIX: &str = "https://pay.google.com/gp/v/save/";

const SAVE_AUDIENCE: &str = "google";
const SAVE_TYPE: &str = "savetowallet";

#[derive(Debug, Serialize)]
struct SaveClaims<'a> {
    iss: &'a str,
    aud: &'static str,
    typ: &'static str,
    origins: &'a [String],
    payload: Value,
}

/// Builds and signs "save to wallet" links.
///
/// The claim set references objects by id only, carries the allowed web
/// origins, and sets no `exp`: expiry and revocation of minted tokens are the
/// wallet service's business, not this client's.
#[derive(Debug, Clone)]
pub struct SaveLinkBuilder {
    object_type: ObjectType,
    object_ids: Vec<ObjectId>,
    origins: Vec<String>,
}

impl SaveLinkBuilder {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            object_ids: Vec::new(),
            origins: Vec::new(),
        }
    }

    /// Adds an object the link offers to save.
    pub fn object_id(mut self, id: ObjectId) -> Self {
        self.object_ids.push(id);
        self
    }

    /// Adds a web origin allowed to embed the save button.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origins.push(origin.into());
        self
    }

    /// Signs the claim set with the credential's RS256 key and returns the
    /// compact token.
    pub fn sign(&self, credential: &ServiceAccountKey) -> Result<String, Error> {
        let entries: Vec<Value> = self
            .object_ids
            .iter()
            .map(|id| {
                let mut entry = Map::new();
                entry.insert("id".to_string(), Value::String(id.as_str().to_string()));
                Value::Object(entry)
            })
            .collect();
        let mut payload = Map::new();
        payload.insert(self.object_type.save_payload_key(), Value::Array(entries));

        let claims = SaveClaims {
            iss: &credential.client_email,
            aud: SAVE_AUDIENCE,
            typ: SAVE_TYPE,
            origins: &self.origins,
            payload: Value::Object(payload),
        };
        let key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
            .map_err(|e| Error::Credential(format!("unusable private key: {e}")))?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }

    /// Signs the claim set and embeds the token in the user-facing save URL.
    pub fn mint_url(&self, credential: &ServiceAccountKey) -> Result<String, Error> {
        Ok(format!("{SAVE_URL_PREFIX}{}", self.sign(credential)?))
    }
}
