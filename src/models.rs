use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wallet vertical. Selects the REST resource pair and the save-payload key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Generic,
    Loyalty,
    Offer,
    GiftCard,
    EventTicket,
    Flight,
    Transit,
}

impl ObjectType {
    fn stem(self) -> &'static str {
        match self {
            ObjectType::Generic => "generic",
            ObjectType::Loyalty => "loyalty",
            ObjectType::Offer => "offer",
            ObjectType::GiftCard => "giftCard",
            ObjectType::EventTicket => "eventTicket",
            ObjectType::Flight => "flight",
            ObjectType::Transit => "transit",
        }
    }

    /// REST resource name for class calls, e.g. `loyaltyClass`.
    pub fn class_resource(self) -> String {
        format!("{}Class", self.stem())
    }

    /// REST resource name for object calls, e.g. `loyaltyObject`.
    pub fn object_resource(self) -> String {
        format!("{}Object", self.stem())
    }

    /// Key under `payload` in a save token, e.g. `loyaltyObjects`.
    pub fn save_payload_key(self) -> String {
        format!("{}Objects", self.stem())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssuerContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    /// Assigned by the server on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<IssuerContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

impl Issuer {
    pub fn new(name: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self {
            issuer_id: None,
            name: name.into(),
            contact_info: Some(IssuerContactInfo {
                name: None,
                email: Some(contact_email.into()),
                phone: None,
            }),
            homepage_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionRole {
    Owner,
    Reader,
    Writer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub email_address: String,
    pub role: PermissionRole,
}

/// Full permission list for an issuer.
///
/// The API applies this wholesale on update: it is a replacement, not a
/// merge. See [`crate::WalletClient::replace_permissions`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Verbatim server reply: HTTP status plus the decoded body.
///
/// Used where the caller, not the client, decides what a given status means
/// (class insertion surfaces conflicts this way).
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outcome of the get-or-create object flow.
///
/// A fetch failure other than 404 is reported through [`crate::Error`] and is
/// never collapsed into this type.
#[derive(Debug, Clone)]
pub enum ObjectOutcome {
    /// The object already existed; carries the fetched resource.
    Found(Value),
    /// The fetch returned 404 and the follow-up insert succeeded; carries the
    /// insert response.
    Created(Value),
}

impl ObjectOutcome {
    pub fn resource(&self) -> &Value {
        match self {
            ObjectOutcome::Found(resource) | ObjectOutcome::Created(resource) => resource,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, ObjectOutcome::Created(_))
    }
}
