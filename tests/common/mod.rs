//! Shared fixtures: a scripted executor and the staff schema.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tether::{Entity, Executor, Registry, Result, Row, ScalarKind, Schema, TetherError};

enum Reply {
    Rows(Vec<Row>),
    Fail(String),
}

/// Executor answering statements from a script.
///
/// Each statement is logged, then answered by the first rule whose needle it
/// contains. Statements matching no rule (migrations, usually) return no rows.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Mutex<Vec<(String, Reply)>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, needle: impl Into<String>, rows: Vec<Row>) -> &Self {
        self.rules.lock().unwrap().push((needle.into(), Reply::Rows(rows)));
        self
    }

    pub fn fail_on(&self, needle: impl Into<String>, message: impl Into<String>) -> &Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.into(), Reply::Fail(message.into())));
        self
    }

    /// Every statement executed so far, in order
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// How many executed statements contain `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|sql| sql.contains(needle)).count()
    }

    /// The last executed statement containing `needle`
    pub fn last(&self, needle: &str) -> Option<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|sql| sql.contains(needle))
            .cloned()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        self.log.lock().unwrap().push(sql.to_string());
        let rules = self.rules.lock().unwrap();
        match rules.iter().find(|(needle, _)| sql.contains(needle.as_str())) {
            Some((_, Reply::Rows(rows))) => Ok(rows.clone()),
            Some((_, Reply::Fail(message))) => Err(TetherError::ExecutionError(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// People, the shifts they work and the reviews they get.
pub fn staff() -> Registry {
    Schema::new()
        .entity(
            Entity::new("shift")
                .scalar("title", ScalarKind::text())
                .reference_as("employer", "person", "jobs")
                .collection_as("workers", "person", "shifts_worked"),
        )
        .entity(
            Entity::new("person")
                .scalar("first_name", ScalarKind::varchar(50))
                .scalar("last_name", ScalarKind::varchar(50))
                .scalar(
                    "gender",
                    ScalarKind::Enum(vec!["male".into(), "female".into()]),
                )
                .scalar("birth", ScalarKind::Timestamp)
                .scalar("pay_rate", ScalarKind::Money)
                .scalar("home", ScalarKind::Point)
                .reference_as("boss", "person", "reports"),
        )
        .entity(
            Entity::new("review")
                .scalar("body", ScalarKind::text())
                .reference_as("to", "person", "reviews"),
        )
        .build()
        .expect("staff schema is valid")
}

pub fn person(id: i64, first_name: &str, boss: Option<i64>) -> Row {
    let row = Row::new()
        .with("id", id.to_string())
        .with("first_name", first_name)
        .with("last_name", "Smith")
        .with("gender", "male")
        .with("birth", "1991-05-29 00:00:00")
        .with("pay_rate", "$20.00")
        .with("home", "(1.5,-2.25)");
    match boss {
        Some(boss) => row.with("boss", boss.to_string()),
        None => row.with_null("boss"),
    }
}

pub fn shift(id: i64, title: &str, employer: Option<i64>) -> Row {
    let row = Row::new().with("id", id.to_string()).with("title", title);
    match employer {
        Some(employer) => row.with("employer", employer.to_string()),
        None => row.with_null("employer"),
    }
}

pub const AL: i64 = 1;
pub const JAKE: i64 = 2;
pub const GOAT_SHED: i64 = 1;

/// Al (no boss) employs Jake; both work the goat shed, which Al runs.
pub fn script_jake_and_al(db: &ScriptedExecutor) {
    db.on(r#"SELECT * FROM "person" WHERE "id" = 1"#, vec![person(AL, "Al", None)])
        .on(
            r#"SELECT * FROM "person" WHERE "id" = 2"#,
            vec![person(JAKE, "Jake", Some(AL))],
        )
        .on(
            r#"SELECT * FROM "shift" WHERE "id" = 1"#,
            vec![shift(GOAT_SHED, "Goat shed", Some(AL))],
        )
        .on(
            r#""shift_workers_join"."shift_id" = 1 ORDER BY"#,
            vec![person(AL, "Al", None), person(JAKE, "Jake", Some(AL))],
        )
        .on(
            r#""shift_workers_join"."workers_id" = 1 ORDER BY"#,
            vec![shift(GOAT_SHED, "Goat shed", Some(AL))],
        )
        .on(
            r#""shift_workers_join"."workers_id" = 2 ORDER BY"#,
            vec![shift(GOAT_SHED, "Goat shed", Some(AL))],
        )
        .on(
            r#"SELECT * FROM "person" WHERE "boss" = 1 ORDER BY "id""#,
            vec![person(JAKE, "Jake", Some(AL))],
        )
        .on(
            r#"SELECT * FROM "shift" WHERE "employer" = 1 ORDER BY "id""#,
            vec![shift(GOAT_SHED, "Goat shed", Some(AL))],
        );
}
