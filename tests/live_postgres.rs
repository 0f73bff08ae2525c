//! End-to-end checks against a real PostgreSQL server.
//!
//! Runs only when `TETHER_TEST_DATABASE_URL` is set, for example
//! `TETHER_TEST_DATABASE_URL="host=localhost user=postgres" cargo test`.

#![cfg(feature = "tokio-postgres")]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tether::driver::tokio_postgres::PgExecutor;
use tether::{Database, Entity, Executor, Registry, ScalarKind, Schema, Value};

fn database_url() -> Option<String> {
    std::env::var("TETHER_TEST_DATABASE_URL").ok()
}

/// Entity names unique to this run, so reruns never collide.
fn names() -> (String, String) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let suffix = format!("{}_{nanos}", std::process::id());
    (format!("person_{suffix}"), format!("shift_{suffix}"))
}

fn registry(person: &str, shift: &str) -> Registry {
    Schema::new()
        .entity(
            Entity::new(person)
                .scalar("first_name", ScalarKind::varchar(50))
                .scalar(
                    "gender",
                    ScalarKind::Enum(vec!["male".into(), "female".into()]),
                )
                .scalar("pay_rate", ScalarKind::Money)
                .scalar("home", ScalarKind::Point)
                .reference_as("boss", person, "reports"),
        )
        .entity(
            Entity::new(shift)
                .scalar("title", ScalarKind::text())
                .collection_as("workers", person, "shifts_worked"),
        )
        .build()
        .unwrap()
}

async fn cleanup(executor: &PgExecutor, person: &str, shift: &str) {
    let sql = format!(
        r#"DROP TABLE IF EXISTS "{shift}_workers_join", "{shift}", "{person}"; DROP TYPE IF EXISTS "{person}_gender_enum";"#
    );
    let _ = executor.execute(&sql).await;
}

#[tokio::test]
async fn jake_al_and_the_goat_shed() {
    let Some(url) = database_url() else {
        return;
    };
    let (person, shift) = names();
    let executor = Arc::new(PgExecutor::connect(&url).await.unwrap());
    let db = Database::new(Arc::clone(&executor), registry(&person, &shift));
    db.ready().await.unwrap();

    let people = db.repository(&person).unwrap();
    let shifts = db.repository(&shift).unwrap();

    let al = people
        .create([
            ("first_name", Value::from("Al")),
            ("gender", Value::from("male")),
            ("pay_rate", Value::from(20)),
        ])
        .await
        .unwrap();
    let jake = people
        .create([
            ("first_name", Value::from(r"It's a \test")),
            ("home", Value::from([1.5, -2.25])),
            ("boss", al.reference()),
        ])
        .await
        .unwrap();
    let goat_shed = shifts
        .create([
            ("title", Value::from("Goat shed")),
            ("workers", Value::List(vec![jake.reference(), al.reference()])),
        ])
        .await
        .unwrap();

    assert_eq!(jake.get("first_name").unwrap().as_str(), Some(r"It's a \test"));
    assert_eq!(jake.get("home").unwrap().as_point(), Some((1.5, -2.25)));
    assert!(al.get("pay_rate").unwrap().as_decimal().is_some());

    let jake = people.get(jake.id()).await.unwrap().unwrap();
    let boss = jake.related("boss").await.unwrap().unwrap();
    assert_eq!(boss.id(), al.id());
    let reports = boss.related_all("reports").await.unwrap();
    assert!(Arc::ptr_eq(&reports[0], &jake));

    let workers = goat_shed.related_all("workers").await.unwrap();
    let mut ids: Vec<_> = workers.iter().map(|w| w.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, [al.id(), jake.id()]);
    let worked = workers[0].related_all("shifts_worked").await.unwrap();
    assert!(Arc::ptr_eq(&worked[0], &goat_shed));

    let found = people
        .find([("first_name", Value::from("Al")), ("boss", Value::Null)])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    cleanup(&executor, &person, &shift).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let Some(url) = database_url() else {
        return;
    };
    let (person, shift) = names();
    let executor = Arc::new(PgExecutor::connect(&url).await.unwrap());

    for _ in 0..2 {
        let db = Database::new(Arc::clone(&executor), registry(&person, &shift));
        db.ready().await.unwrap();
    }
    let columns = executor
        .execute(&format!(
            "SELECT column_name FROM information_schema.columns WHERE table_schema = current_schema() AND table_name = '{person}' ORDER BY column_name"
        ))
        .await
        .unwrap();
    let names: Vec<_> = columns
        .iter()
        .filter_map(|row| row.get("column_name"))
        .collect();
    assert_eq!(names, ["boss", "first_name", "gender", "home", "id", "pay_rate"]);

    cleanup(&executor, &person, &shift).await;
}
