mod common;

use std::sync::Arc;

use common::*;
use tether::{Database, TetherError};

#[tokio::test]
async fn every_entity_is_migrated_once() {
    init_tracing();
    let executor = ScriptedExecutor::new();
    let db = Database::new(Arc::clone(&executor), staff());

    db.ready().await.unwrap();
    db.ready().await.unwrap();
    db.repository("person").unwrap().ready().await.unwrap();

    for entity in ["person", "shift", "review"] {
        let table = format!(r#"CREATE TABLE IF NOT EXISTS "{entity}" (id SERIAL PRIMARY KEY);"#);
        assert_eq!(executor.count(&table), 1, "{entity}");
    }
    let shift = executor.last(r#"CREATE TABLE IF NOT EXISTS "shift""#).unwrap();
    assert!(shift.contains(
        r#"CREATE TABLE IF NOT EXISTS "shift_workers_join" ("shift_id" integer, "workers_id" integer);"#
    ));
    let person = executor.last(r#"CREATE TABLE IF NOT EXISTS "person""#).unwrap();
    assert!(person.contains(r#"CREATE TYPE "person_gender_enum" AS ENUM ('male', 'female');"#));
    assert!(person.contains(r#"ALTER TABLE "person" ADD COLUMN "boss" INTEGER;"#));
    assert!(!person.contains("reports"));
}

#[tokio::test]
async fn queries_wait_for_the_migration() {
    let executor = ScriptedExecutor::new();
    script_jake_and_al(&executor);
    let db = Database::new(Arc::clone(&executor), staff());

    db.repository("person").unwrap().get(AL).await.unwrap();

    let log = executor.log();
    let migrated = log
        .iter()
        .position(|sql| sql.contains(r#"CREATE TABLE IF NOT EXISTS "person""#))
        .unwrap();
    let queried = log
        .iter()
        .position(|sql| sql.contains(r#"SELECT * FROM "person" WHERE "id" = 1"#))
        .unwrap();
    assert!(migrated < queried);
}

#[tokio::test]
async fn failed_migrations_poison_their_entity_only() {
    init_tracing();
    let executor = ScriptedExecutor::new();
    executor.fail_on(
        r#"CREATE TABLE IF NOT EXISTS "review""#,
        "permission denied for schema public",
    );
    script_jake_and_al(&executor);
    let db = Database::new(Arc::clone(&executor), staff());
    let reviews = db.repository("review").unwrap();

    for _ in 0..2 {
        let err = reviews.all().await.unwrap_err();
        let TetherError::SchemaNotReady { entity, source } = &err else {
            panic!("expected SchemaNotReady, got {err:?}");
        };
        assert_eq!(entity, "review");
        assert!(source.to_string().contains("permission denied"));
    }
    assert_eq!(executor.count(r#"CREATE TABLE IF NOT EXISTS "review""#), 1);
    assert_eq!(executor.count(r#"SELECT * FROM "review""#), 0);
    assert!(db.ready().await.is_err());

    let al = db.repository("person").unwrap().get(AL).await.unwrap();
    assert!(al.is_some());
}

#[test]
fn databases_opened_outside_a_runtime_migrate_lazily() {
    let executor = ScriptedExecutor::new();
    script_jake_and_al(&executor);
    let db = Database::new(Arc::clone(&executor), staff());
    assert!(executor.log().is_empty());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let jake = runtime
        .block_on(db.repository("person").unwrap().get(JAKE))
        .unwrap()
        .unwrap();
    assert_eq!(jake.id(), JAKE);
    assert_eq!(executor.count(r#"CREATE TABLE IF NOT EXISTS "person""#), 1);
    assert_eq!(executor.count(r#"CREATE TABLE IF NOT EXISTS "shift""#), 0);
}

#[tokio::test]
async fn unknown_entities_have_no_repository() {
    let db = Database::new(ScriptedExecutor::new(), staff());
    assert!(matches!(
        db.repository("invoice"),
        Err(TetherError::UnknownEntity(ref name)) if name == "invoice"
    ));
}
