use admix_admin::{AccessToken, Admin, AdminRecord, AdminRepo, TokenRepo};
use admix_data::repository::Repository;
use admix_data_sqlx::{DbConfig, SqlxRepository, SqlxStore};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

async fn setup() -> Arc<SqlxStore> {
    let store = SqlxStore::connect(&DbConfig::with_url("sqlite::memory:"))
        .await
        .expect("connect");
    let mut handle = store.handle().await;
    handle
        .execute(
            "CREATE TABLE admins (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                name TEXT NOT NULL, \
                email TEXT NOT NULL, \
                password TEXT NOT NULL, \
                last_login_at TEXT, \
                created_at TEXT, \
                updated_at TEXT)",
            &[],
        )
        .await
        .expect("create admins");
    handle
        .execute(
            "CREATE TABLE admin_access_tokens (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                token TEXT NOT NULL, \
                expired_at TEXT NOT NULL, \
                admin_id INTEGER NOT NULL, \
                created_at TEXT)",
            &[],
        )
        .await
        .expect("create tokens");
    drop(handle);
    Arc::new(store)
}

fn admin(email: &str) -> Admin {
    Admin {
        id: 0,
        name: "root".into(),
        email: email.into(),
        password: "argon2-hash".into(),
        last_login_at: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        updated_at: None,
    }
}

async fn seed_admin(store: &Arc<SqlxStore>, email: &str) -> Admin {
    let repo = SqlxRepository::<AdminRecord>::new(store.clone());
    repo.insert(&admin(email)).await.expect("seed admin")
}

#[tokio::test]
async fn test_lookup_by_email() {
    let store = setup().await;
    let created = seed_admin(&store, "root@example.com").await;
    assert_ne!(created.id, 0);

    let repo = AdminRepo::new(store);
    let found = repo.get_by_email("root@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.password, "argon2-hash");
    assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_last_login_touches_one_column() {
    let store = setup().await;
    let mut created = seed_admin(&store, "root@example.com").await;
    let repo = AdminRepo::new(store);

    let login_time = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
    created.last_login_at = Some(login_time);
    created.name = "should-not-change".into();
    repo.update_last_login(&created).await.unwrap();

    let found = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.last_login_at, Some(login_time));
    assert_eq!(found.name, "root");
}

#[tokio::test]
async fn test_token_lifecycle_with_eager_admin() {
    let store = setup().await;
    let owner = seed_admin(&store, "root@example.com").await;
    let tokens = TokenRepo::new(store);

    let issued = tokens
        .create(&AccessToken {
            id: 0,
            token: "opaque-token".into(),
            expired_at: Utc::now() + Duration::hours(2),
            expired_in: 7200.0,
            admin_id: owner.id,
            created_at: Some(Utc::now()),
            admin: None,
        })
        .await
        .unwrap();
    assert_ne!(issued.id, 0);
    assert!(!issued.is_expired());

    let found = tokens.get("opaque-token").await.unwrap().unwrap();
    let attached = found.admin.as_ref().expect("owning admin attached in the same read");
    assert_eq!(attached.id, owner.id);
    assert_eq!(attached.email, "root@example.com");

    tokens.invalidate(&found).await.unwrap();
    assert!(tokens.get("opaque-token").await.unwrap().is_none());
}
