use std::env;
use wallet_objects_client::{
    AccessTokenSigner, Issuer, Permission, PermissionRole, Permissions, ServiceAccountKey,
    WalletClient,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let credentials_path = env::var("GOOGLE_APPLICATION_CREDENTIALS")
        .unwrap_or_else(|_| "service-account.json".to_string());
    let issuer_name = env::var("WALLET_NEW_ISSUER_NAME").unwrap_or_else(|_| "Demo issuer".to_string());
    let contact_email =
        env::var("WALLET_NEW_ISSUER_EMAIL").unwrap_or_else(|_| "owner@example.com".to_string());

    let credential = ServiceAccountKey::from_file(&credentials_path)?;
    let client = WalletClient::production()?
        .service_account(AccessTokenSigner::new(credential)?)
        .build()?;

    let created = client.create_issuer(&Issuer::new(issuer_name, contact_email.clone()))?;
    println!("issuer: {}", serde_json::to_string(&created)?);

    let issuer_id = match created.issuer_id.or_else(|| env::var("WALLET_ISSUER_ID").ok()) {
        Some(value) => value,
        None => {
            eprintln!("no issuer id available; skipping permission update");
            return Ok(());
        }
    };

    // This PUT replaces the entire list; anyone left out loses access.
    let permissions = Permissions {
        issuer_id: Some(issuer_id.clone()),
        permissions: vec![Permission {
            email_address: contact_email,
            role: PermissionRole::Owner,
        }],
    };
    let updated = client.replace_permissions(&issuer_id, &permissions)?;
    println!("permissions: {}", serde_json::to_string(&updated)?);
    Ok(())
}
