use tests::*;

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test]
async fn save_then_find() {
    let (db, users) = Setup::users().await;

    let mut user = users
        .create()
        .with("email", "test@example.com")
        .unwrap()
        .with("passwd", "1234567890")
        .unwrap()
        .with("name", "Test")
        .unwrap()
        .with("admin", true)
        .unwrap();
    user.save(&db).await.unwrap();

    let id = user.primary_key().unwrap().clone();
    let found = users.find(&db, id.clone()).await.unwrap().unwrap();

    assert_eq!(found.get("id").unwrap(), Some(&id));
    assert_eq!(
        found.get("email").unwrap(),
        Some(&Value::from("test@example.com"))
    );
    assert_eq!(found.get("name").unwrap(), Some(&Value::from("Test")));
    assert_eq!(found.get("admin").unwrap(), Some(&Value::Bool(true)));
    assert_eq!(found, user);
}

#[tokio::test]
async fn save_writes_defaults_back() {
    let (db, users) = Setup::users().await;

    let mut user = users.create().with("name", "Test").unwrap();
    assert_eq!(user.get("id").unwrap(), None);

    user.save(&db).await.unwrap();

    let id = user.get("id").unwrap().unwrap().as_str().unwrap().to_string();
    assert_eq!(id.len(), 50);
    assert!(id.ends_with("000"));
    assert_eq!(user.get("admin").unwrap(), Some(&Value::Bool(false)));
    assert_eq!(user.get("image").unwrap(), Some(&Value::from("about:blank")));
    assert!(user.get("created_at").unwrap().unwrap().as_f64().is_some());

    // No default and never set
    assert_eq!(user.get("email").unwrap(), None);

    let found = users.find(&db, id).await.unwrap().unwrap();
    assert_eq!(found.get("admin").unwrap(), Some(&Value::Bool(false)));
    assert_eq!(found.get("email").unwrap(), Some(&Value::Null));
    assert_eq!(found.get("created_at").unwrap(), user.get("created_at").unwrap());
}

#[tokio::test]
async fn provider_default_runs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let setup = Setup::new([Entity::builder("Token")
        .table("tokens")
        .field(Field::integer("id").primary_key())
        .field(Field::string("secret").default_with(counting_provider(&calls, "s3cr3t")))])
    .await;
    let tokens = setup.entity("Token");

    let mut token = tokens.create().with("id", 1).unwrap();
    assert_eq!(
        token.get_or_default("secret").unwrap(),
        Some(Value::from("s3cr3t"))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    token.save(&setup.db).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let found = tokens.find(&setup.db, 1).await.unwrap().unwrap();
    assert_eq!(found.get("secret").unwrap(), Some(&Value::from("s3cr3t")));
}

#[tokio::test]
async fn explicit_value_skips_default() {
    let (db, users) = Setup::users().await;

    let mut user = users
        .create()
        .with("id", "fixed-id")
        .unwrap()
        .with("admin", true)
        .unwrap();
    user.save(&db).await.unwrap();

    assert_eq!(user.get("id").unwrap(), Some(&Value::from("fixed-id")));

    let found = users.find(&db, "fixed-id").await.unwrap().unwrap();
    assert_eq!(found.get("admin").unwrap(), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn find_missing_returns_none() {
    let (db, users) = Setup::users().await;

    assert!(users.find(&db, "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn update_persists_changes() {
    let (db, users) = Setup::users().await;

    let mut user = users.create().with("name", "Before").unwrap();
    user.save(&db).await.unwrap();
    let id = user.primary_key().unwrap().clone();

    user.set("name", "After").unwrap();
    user.update(&db).await.unwrap();

    let found = users.find(&db, id).await.unwrap().unwrap();
    assert_eq!(found.get("name").unwrap(), Some(&Value::from("After")));
    assert_eq!(found.get("image").unwrap(), Some(&Value::from("about:blank")));
}

#[tokio::test]
async fn update_does_not_apply_defaults() {
    let (db, users) = Setup::users().await;

    let mut user = users.create().with("name", "Test").unwrap();
    user.save(&db).await.unwrap();
    let id = user.primary_key().unwrap().clone();

    // A model built by hand with only the key and name set
    let partial = users
        .create()
        .with("id", id.clone())
        .unwrap()
        .with("name", "Renamed")
        .unwrap();
    partial.update(&db).await.unwrap();

    let found = users.find(&db, id).await.unwrap().unwrap();
    assert_eq!(found.get("name").unwrap(), Some(&Value::from("Renamed")));
    assert_eq!(found.get("image").unwrap(), Some(&Value::Null));
    assert_eq!(partial.get("image").unwrap(), None);
}

#[tokio::test]
async fn remove_deletes_row() {
    let (db, users) = Setup::users().await;

    let mut user = users.create().with("name", "Test").unwrap();
    user.save(&db).await.unwrap();
    let id = user.primary_key().unwrap().clone();

    user.remove(&db).await.unwrap();
    assert!(users.find(&db, id.clone()).await.unwrap().is_none());

    // The instance survives and can be stored again
    user.save(&db).await.unwrap();
    assert!(users.find(&db, id).await.unwrap().is_some());
}

#[tokio::test]
async fn missing_rows_are_not_errors() {
    let (db, users) = Setup::users().await;

    let ghost = users.create().with("id", "ghost").unwrap();
    ghost.update(&db).await.unwrap();
    ghost.remove(&db).await.unwrap();

    assert!(users.find(&db, "ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_primary_key_fails() {
    let (db, users) = Setup::users().await;

    let mut first = users.create().with("id", "same").unwrap();
    first.save(&db).await.unwrap();

    let mut second = users.create().with("id", "same").unwrap();
    let err = second.save(&db).await.unwrap_err();
    assert!(err.is_driver_operation_failed());

    // The connection went back to the pool
    assert!(users.find(&db, "same").await.unwrap().is_some());
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let (_db, users) = Setup::users().await;
    let mut user = users.create();

    let err = user.set("nickname", "x").unwrap_err();
    assert!(err.is_unknown_field());
    assert_eq!(err.to_string(), "`User` has no field named `nickname`");

    assert!(user.get("nickname").unwrap_err().is_unknown_field());
    assert!(user.get_or_default("nickname").unwrap_err().is_unknown_field());
}

#[tokio::test]
async fn get_or_default_without_default() {
    let (_db, users) = Setup::users().await;
    let mut user = users.create();

    assert_eq!(user.get_or_default("email").unwrap(), None);
    assert_eq!(user.get("email").unwrap(), None);

    user.set("email", Value::Null).unwrap();
    assert_eq!(user.get_or_default("email").unwrap(), Some(Value::Null));
}

#[tokio::test]
async fn null_value_takes_default() {
    let (_db, users) = Setup::users().await;
    let mut user = users.create().with("image", Value::Null).unwrap();

    assert_eq!(
        user.get_or_default("image").unwrap(),
        Some(Value::from("about:blank"))
    );
    assert_eq!(user.get("image").unwrap(), Some(&Value::from("about:blank")));
}

#[tokio::test]
async fn column_override_round_trips() {
    let setup = Setup::new([Entity::builder("Comment")
        .table("comments")
        .field(Field::integer("id").primary_key())
        .field(Field::text("content").column("body"))])
    .await;
    let comments = setup.entity("Comment");

    let mut comment = comments
        .create()
        .with("id", 7)
        .unwrap()
        .with("content", "hello")
        .unwrap();
    comment.save(&setup.db).await.unwrap();

    let rows = setup
        .db
        .select("SELECT `body` FROM `comments`", &[], None)
        .await
        .unwrap();
    assert_eq!(rows[0]["body"], Value::from("hello"));

    let found = comments.find(&setup.db, 7).await.unwrap().unwrap();
    assert_eq!(found.get("content").unwrap(), Some(&Value::from("hello")));
    assert_eq!(found.get("id").unwrap(), Some(&Value::I64(7)));
}
