mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::*;
use rust_decimal::Decimal;
use tether::{Database, FieldValue, ResolutionCache, TetherError, Value};

fn open() -> (Arc<ScriptedExecutor>, Database) {
    init_tracing();
    let executor = ScriptedExecutor::new();
    script_jake_and_al(&executor);
    let db = Database::new(Arc::clone(&executor), staff());
    (executor, db)
}

#[tokio::test]
async fn absent_ids_resolve_to_none() {
    let (_, db) = open();
    let people = db.repository("person").unwrap();
    assert!(people.get(99).await.unwrap().is_none());
}

#[tokio::test]
async fn scalars_are_decoded_by_declared_kind() {
    let (_, db) = open();
    let jake = db.repository("person").unwrap().get(JAKE).await.unwrap().unwrap();

    assert_eq!(jake.entity(), "person");
    assert_eq!(jake.id(), JAKE);
    assert_eq!(jake.get("first_name").unwrap().as_str(), Some("Jake"));
    assert_eq!(jake.get("gender").unwrap().as_str(), Some("male"));
    assert_eq!(jake.get("home").unwrap().as_point(), Some((1.5, -2.25)));
    assert_eq!(
        jake.get("pay_rate").unwrap().as_decimal(),
        Some(Decimal::new(2000, 2))
    );
    assert_eq!(
        jake.get("birth").unwrap().as_timestamp(),
        NaiveDate::from_ymd_opt(1991, 5, 29).unwrap().and_hms_opt(0, 0, 0)
    );
}

#[tokio::test]
async fn relation_fields_are_deferred_handles() {
    let (executor, db) = open();
    let jake = db.repository("person").unwrap().get(JAKE).await.unwrap().unwrap();

    assert!(matches!(jake.field("boss"), Some(FieldValue::One(_))));
    assert!(matches!(jake.field("reports"), Some(FieldValue::Many(_))));
    assert!(matches!(jake.field("shifts_worked"), Some(FieldValue::Many(_))));
    assert_eq!(jake.one("boss").unwrap().id(), Some(AL));
    assert_eq!(executor.count(r#"WHERE "id" = 1"#), 0);

    assert!(matches!(
        jake.get("boss"),
        Err(TetherError::RelationKind { expected: "scalar", .. })
    ));
    assert!(matches!(jake.many("nickname"), Err(TetherError::UnknownField { .. })));
}

#[tokio::test]
async fn cycles_return_the_same_record() {
    let (executor, db) = open();
    let jake = db.repository("person").unwrap().get(JAKE).await.unwrap().unwrap();

    let al = jake.related("boss").await.unwrap().unwrap();
    assert_eq!(al.get("first_name").unwrap().as_str(), Some("Al"));
    assert!(al.related("boss").await.unwrap().is_none());

    let reports = al.related_all("reports").await.unwrap();
    assert_eq!(reports.len(), 1);
    assert!(Arc::ptr_eq(&reports[0], &jake));

    let again = reports[0].related("boss").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&again, &al));
    assert_eq!(executor.count(r#"SELECT * FROM "person" WHERE "id" = 1"#), 1);
}

#[tokio::test]
async fn reverse_results_point_back_at_their_owner() {
    let (executor, db) = open();
    let al = db.repository("person").unwrap().get(AL).await.unwrap().unwrap();

    let jobs = al.related_all("jobs").await.unwrap();
    assert_eq!(jobs.len(), 1);
    let employer = jobs[0].related("employer").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&employer, &al));

    let reports = al.related_all("reports").await.unwrap();
    let boss = reports[0].related("boss").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&boss, &al));
    assert_eq!(executor.count(r#"SELECT * FROM "person" WHERE "id" = 1"#), 1);
}

#[tokio::test]
async fn collections_are_symmetric() {
    let (_, db) = open();
    let shift = db.repository("shift").unwrap().get(GOAT_SHED).await.unwrap().unwrap();

    let workers = shift.related_all("workers").await.unwrap();
    let names: Vec<_> = workers
        .iter()
        .map(|p| p.get("first_name").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Al", "Jake"]);

    for worker in &workers {
        let shifts = worker.related_all("shifts_worked").await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert!(Arc::ptr_eq(&shifts[0], &shift));
    }

    // Al is both a worker and the employer: one record.
    let employer = shift.related("employer").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&employer, &workers[0]));
}

#[tokio::test]
async fn join_rows_are_a_multiset() {
    let (executor, db) = open();
    executor.on(
        r#""shift_workers_join"."shift_id" = 7 ORDER BY"#,
        vec![person(JAKE, "Jake", Some(AL)), person(JAKE, "Jake", Some(AL))],
    );
    executor.on(
        r#"SELECT * FROM "shift" WHERE "id" = 7"#,
        vec![shift(7, "Double booked", None)],
    );
    let shift = db.repository("shift").unwrap().get(7).await.unwrap().unwrap();
    assert!(shift.one("employer").unwrap().is_null());

    let workers = shift.related_all("workers").await.unwrap();
    assert_eq!(workers.len(), 2);
    assert!(Arc::ptr_eq(&workers[0], &workers[1]));
}

#[tokio::test]
async fn caches_are_scoped_to_a_call_unless_shared() {
    let (executor, db) = open();
    let people = db.repository("person").unwrap();

    let first = people.get(JAKE).await.unwrap().unwrap();
    let second = people.get(JAKE).await.unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    let cache = ResolutionCache::new();
    let first = people.get_with(JAKE, &cache).await.unwrap().unwrap();
    let before = executor.count(r#"SELECT * FROM "person" WHERE "id" = 2"#);
    let second = people.get_with(JAKE, &cache).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(executor.count(r#"SELECT * FROM "person" WHERE "id" = 2"#), before);

    let everyone = people.all_with(&cache).await;
    assert!(everyone.unwrap().is_empty());
}

#[tokio::test]
async fn find_builds_an_equality_conjunction() {
    let (executor, db) = open();
    executor.on(
        r#"WHERE "first_name" = 'Jake' AND "boss" = 1"#,
        vec![person(JAKE, "Jake", Some(AL))],
    );
    let people = db.repository("person").unwrap();

    let al = people.get(AL).await.unwrap().unwrap();
    let found = people
        .find([("first_name", Value::from("Jake")), ("boss", al.reference())])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), JAKE);

    people.find([("boss", Value::Null)]).await.unwrap();
    assert_eq!(
        executor.last(r#"IS NULL"#).unwrap(),
        r#"SELECT * FROM "person" WHERE "boss" IS NULL"#
    );

    assert!(matches!(
        people.find([("nickname", Value::from("J"))]).await,
        Err(TetherError::UnknownField { .. })
    ));
    assert!(matches!(
        people.find([("reports", Value::Null)]).await,
        Err(TetherError::RelationKind { .. })
    ));
}

#[tokio::test]
async fn where_and_all_hydrate_every_row() {
    let (executor, db) = open();
    executor.on(
        r#"SELECT * FROM "person" WHERE first_name LIKE 'J%'"#,
        vec![person(JAKE, "Jake", Some(AL))],
    );
    executor.on(
        r#"SELECT * FROM "person""#,
        vec![person(AL, "Al", None), person(JAKE, "Jake", Some(AL))],
    );
    let people = db.repository("person").unwrap();

    let js = people.r#where("first_name LIKE 'J%'").await.unwrap();
    assert_eq!(js.len(), 1);

    let everyone = people.all().await.unwrap();
    assert_eq!(everyone.len(), 2);
    let boss = everyone[1].related("boss").await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&boss, &everyone[0]));
}

#[tokio::test]
async fn undecodable_columns_are_errors() {
    let (executor, db) = open();
    executor.on(
        r#"SELECT * FROM "person" WHERE "id" = 5"#,
        vec![person(5, "Broken", None).with("home", "not a point")],
    );
    let err = db.repository("person").unwrap().get(5).await.unwrap_err();
    assert!(matches!(err, TetherError::Decode { ref column, .. } if column == "home"));
}
