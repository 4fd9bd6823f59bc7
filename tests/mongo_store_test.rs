use bson::oid::ObjectId;
use chrono::Utc;

use journeygo_api::db::mongo_store::MongoStore;
use journeygo_api::db::repository::{RepositoryError, UserRepository};
use journeygo_api::models::user::UserAccount;

fn account(email: &str) -> UserAccount {
    UserAccount {
        id: ObjectId::new().to_hex(),
        email: email.to_string(),
        password_hash: "$2b$04$hash".to_string(),
        last_signin: None,
        failed_signins: 0,
        created_at: Utc::now(),
    }
}

/// Runs against the database named by MONGODB_URI; without it there is
/// nothing to connect to and the test returns early.
#[tokio::test]
async fn test_concurrent_signups_with_same_email_store_one_account() {
    let Ok(uri) = std::env::var("MONGODB_URI") else {
        return;
    };
    let database = format!("journeygo_test_{}", ObjectId::new().to_hex());
    let store = MongoStore::connect(&uri, &database).await.unwrap();

    let (first, second) = tokio::join!(
        store.insert_user(account("sari@example.com")),
        store.insert_user(account("sari@example.com")),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RepositoryError::Duplicate(email)) if email == "sari@example.com")));

    let client = mongodb::Client::with_uri_str(&uri).await.unwrap();
    client.database(&database).drop().await.unwrap();
}
