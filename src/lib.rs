#![forbid(unsafe_code)]

mod auth;
mod client;
mod credentials;
mod error;
mod models;
mod object_id;
mod save_link;
#[cfg(test)]
mod test_support;

pub use auth::{AccessTokenSigner, WALLET_ISSUER_SCOPE};

pub use client::{WalletClient, WalletClientBuilder, DEFAULT_BASE_URL};

pub use credentials::{ServiceAccountKey, CREDENTIALS_ENV_VAR};

pub use error::{Error, ResourceError};

pub use models::{
    Issuer, IssuerContactInfo, ObjectOutcome, ObjectType, Permission, PermissionRole, Permissions,
    RawResponse,
};

pub use object_id::ObjectId;

pub use save_link::{SaveLinkBuilder, SAVE_URL_PREFIX};
