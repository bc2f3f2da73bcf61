use serde_json::json;
use std::env;
use wallet_objects_client::{
    AccessTokenSigner, ObjectId, ObjectOutcome, ObjectType, SaveLinkBuilder, ServiceAccountKey,
    WalletClient,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let credentials_path = env::var("GOOGLE_APPLICATION_CREDENTIALS")
        .unwrap_or_else(|_| "service-account.json".to_string());
    let issuer_id =
        env::var("WALLET_ISSUER_ID").unwrap_or_else(|_| "3388000000022141777".to_string());
    let class_suffix =
        env::var("WALLET_CLASS_ID").unwrap_or_else(|_| "test-loyalty-class-id".to_string());
    let user_id = env::var("WALLET_USER_ID").unwrap_or_else(|_| "user-id".to_string());
    let origin =
        env::var("WALLET_SAVE_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let credential = ServiceAccountKey::from_file(&credentials_path)?;
    let signer = AccessTokenSigner::new(credential.clone())?;
    let client = WalletClient::production()?.service_account(signer).build()?;

    let class_id = format!("{issuer_id}.{class_suffix}");
    let class_payload = json!({
        "id": class_id,
        "issuerName": "Demo issuer",
        "programName": "Demo program",
        "programLogo": {
            "sourceUri": {
                "uri": "https://example.com/logo.png"
            }
        },
        "reviewStatus": "UNDER_REVIEW",
    });
    let class_response = client.insert_class(ObjectType::Loyalty, &class_payload)?;
    println!("class insert: {} {}", class_response.status, class_response.body);

    let object_id = ObjectId::new(&issuer_id, &user_id, &class_suffix);
    let object_payload = json!({
        "id": object_id.as_str(),
        "classId": class_id,
        "state": "ACTIVE",
    });
    match client.ensure_object(ObjectType::Loyalty, &object_id, &object_payload)? {
        ObjectOutcome::Found(resource) => println!("object exists: {resource}"),
        ObjectOutcome::Created(resource) => println!("object created: {resource}"),
    }

    let url = SaveLinkBuilder::new(ObjectType::Loyalty)
        .object_id(object_id)
        .origin(origin)
        .mint_url(&credential)?;
    println!("{url}");
    Ok(())
}
