//! Statement shapes issued by the repository and the hydrator.
//!
//! Every function takes identifiers that were validated when the schema was
//! built and literals that came out of [`crate::values::encode`].

use tether_core::{Sql, dollar_quote};

/// Session setting used to hand the id of a freshly inserted row from the
/// `DO` block to the statement that reads it back.
pub const LAST_INSERT_ID: &str = "tether.last_insert_id";

/// `SELECT * FROM "table"`
pub fn select_all(table: &str) -> Sql<'_> {
    Sql::raw("SELECT * FROM ").push_ident(table)
}

/// `SELECT * FROM "table" WHERE predicate`
///
/// The predicate is written verbatim.
pub fn select_where<'a>(table: &'a str, predicate: &'a str) -> Sql<'a> {
    select_all(table).push_raw(" WHERE ").push_raw(predicate)
}

/// `SELECT * FROM "table" WHERE "id" = id`
pub fn select_by_id(table: &str, id: i64) -> Sql<'_> {
    select_all(table)
        .push_raw(" WHERE ")
        .push_ident("id")
        .push_raw(" = ")
        .push_literal(id.to_string())
}

/// `"column" = literal`, or `"column" IS NULL` for a `NULL` literal.
pub fn equality(column: &str, literal: String) -> Sql<'_> {
    let sql = Sql::ident(column);
    if literal == "NULL" {
        sql.push_raw(" IS NULL")
    } else {
        sql.push_raw(" = ").push_literal(literal)
    }
}

/// Joins predicates with `AND`. An empty conjunction is `TRUE`.
pub fn conjunction<'a>(predicates: impl IntoIterator<Item = Sql<'a>>) -> Sql<'a> {
    let sql = Sql::join(predicates, " AND ");
    if sql.is_empty() { Sql::raw("TRUE") } else { sql }
}

/// Rows of `table` linked through `join_table` to the record `id`.
///
/// `table_column` holds the ids of `table` in the join table and
/// `match_column` holds `id`. Duplicate join rows yield duplicate results.
///
/// ```
/// use tether_postgres::builder::select_joined;
///
/// let sql = select_joined("person", "shift_workers_join", "workers_id", "shift_id", 1);
/// assert_eq!(
///     sql.sql(),
///     r#"SELECT "person".* FROM "person", "shift_workers_join" WHERE "person"."id" = "shift_workers_join"."workers_id" AND "shift_workers_join"."shift_id" = 1 ORDER BY "person"."id""#
/// );
/// ```
pub fn select_joined<'a>(
    table: &'a str,
    join_table: &'a str,
    table_column: &'a str,
    match_column: &'a str,
    id: i64,
) -> Sql<'a> {
    Sql::raw("SELECT ")
        .push_ident(table)
        .push_raw(".* FROM ")
        .push_ident(table)
        .push_raw(", ")
        .push_ident(join_table)
        .push_raw(" WHERE ")
        .push_qualified(table, "id")
        .push_raw(" = ")
        .push_qualified(join_table, table_column)
        .push_raw(" AND ")
        .push_qualified(join_table, match_column)
        .push_raw(" = ")
        .push_literal(id.to_string())
        .push_raw(" ORDER BY ")
        .push_qualified(table, "id")
}

/// Rows of `source` whose reference `field` points at `id`, in id order.
pub fn select_referencing<'a>(source: &'a str, field: &'a str, id: i64) -> Sql<'a> {
    select_all(source)
        .push_raw(" WHERE ")
        .push_ident(field)
        .push_raw(" = ")
        .push_literal(id.to_string())
        .push_raw(" ORDER BY ")
        .push_ident("id")
}

/// One row for a collection's join table, owned by the row being inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInsert {
    pub table: String,
    pub owner_column: String,
    pub target_column: String,
    pub target_id: i64,
}

impl JoinInsert {
    fn to_sql(&self) -> Sql<'_> {
        Sql::raw("INSERT INTO ")
            .push_ident(self.table.as_str())
            .push_raw(" (")
            .push_ident(self.owner_column.as_str())
            .push_raw(", ")
            .push_ident(self.target_column.as_str())
            .push_raw(") VALUES (this_id, ")
            .push_literal(self.target_id.to_string())
            .push_raw(");")
    }
}

/// Insert of one row plus its join rows, run as a single round trip.
///
/// The row is inserted inside a `DO` block that captures the new id, writes
/// the join rows against it and publishes it in [`LAST_INSERT_ID`]. A trailing
/// `SELECT` returns the inserted row, so the executor sees exactly one result
/// row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: String,
    /// Column name and encoded literal pairs, in declaration order
    pub columns: Vec<(String, String)>,
    pub joins: Vec<JoinInsert>,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn column(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.columns.push((name.into(), literal.into()));
        self
    }

    pub fn join(mut self, join: JoinInsert) -> Self {
        self.joins.push(join);
        self
    }

    /// Renders the compound statement.
    ///
    /// ```
    /// use tether_postgres::InsertStatement;
    ///
    /// let sql = InsertStatement::new("person").column("first_name", "'Jake'").to_sql();
    /// assert!(sql.contains(r#"INSERT INTO "person" ("id", "first_name") VALUES (DEFAULT, 'Jake') RETURNING "id" INTO this_id;"#));
    /// assert!(sql.ends_with(r#"SELECT * FROM "person" WHERE "id" = current_setting('tether.last_insert_id')::bigint"#));
    /// ```
    pub fn to_sql(&self) -> String {
        let names = std::iter::once(Sql::ident("id"))
            .chain(self.columns.iter().map(|(name, _)| Sql::ident(name.as_str())));
        let values = std::iter::once(Sql::raw("DEFAULT"))
            .chain(self.columns.iter().map(|(_, lit)| Sql::empty().push_literal(lit.as_str())));

        let insert = Sql::raw("INSERT INTO ")
            .push_ident(self.table.as_str())
            .push_raw(" (")
            .append(Sql::join(names, ", "))
            .push_raw(") VALUES (")
            .append(Sql::join(values, ", "))
            .push_raw(") RETURNING ")
            .push_ident("id")
            .push_raw(" INTO this_id;");

        let mut body = vec![
            "DECLARE this_id bigint;".to_string(),
            "BEGIN".to_string(),
            insert.sql(),
        ];
        body.extend(self.joins.iter().map(|join| join.to_sql().sql()));
        body.push(format!(
            "PERFORM set_config('{LAST_INSERT_ID}', this_id::text, false);"
        ));
        body.push("END".to_string());

        let read_back = Sql::raw("SELECT * FROM ")
            .push_ident(self.table.as_str())
            .push_raw(" WHERE ")
            .push_ident("id")
            .push_raw(format!(" = current_setting('{LAST_INSERT_ID}')::bigint"));

        format!("DO {};\n{}", dollar_quote(&body.join("\n")), read_back)
    }
}
