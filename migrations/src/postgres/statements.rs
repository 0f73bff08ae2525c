//! PostgreSQL SQL generation from entity descriptions
//!
//! Every statement is guarded (`IF NOT EXISTS` or a catalog lookup) so that it
//! can be replayed against an already migrated database.

use tether_core::{Sql, dollar_quote};
use tether_postgres::values::encode_text;
use tether_types::{ColumnType, EntityDescription, FieldDescriptor, declare_column, naming};

/// `CREATE TABLE IF NOT EXISTS "entity" (id SERIAL PRIMARY KEY);`
pub fn create_table(entity: &str) -> String {
    Sql::raw("CREATE TABLE IF NOT EXISTS ")
        .push_ident(entity)
        .push_raw(" (id SERIAL PRIMARY KEY);")
        .sql()
}

/// Join table for collection `field` on `owner`.
///
/// No uniqueness constraint: the same pair may be linked more than once.
pub fn create_join_table(owner: &str, field: &str) -> String {
    Sql::raw("CREATE TABLE IF NOT EXISTS ")
        .push_ident(naming::join_table(owner, field))
        .push_raw(" (")
        .push_ident(naming::join_owner_column(owner))
        .push_raw(" integer, ")
        .push_ident(naming::join_target_column(field))
        .push_raw(" integer);")
        .sql()
}

/// Creates an enum type unless a visible type of that name already exists.
///
/// Meant to run inside a procedural block.
pub fn create_enum_type(type_name: &str, values: &[String]) -> String {
    let labels: Vec<String> = values.iter().map(|v| encode_text(v)).collect();
    format!(
        "IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = {} AND pg_type_is_visible(oid)) THEN\n{}\nEND IF;",
        encode_text(type_name),
        Sql::raw("CREATE TYPE ")
            .push_ident(type_name)
            .push_raw(" AS ENUM (")
            .push_raw(labels.join(", "))
            .push_raw(");"),
    )
}

fn add_column(entity: &str, field: &str, column: &ColumnType) -> String {
    let alter = Sql::raw("ALTER TABLE ")
        .push_ident(entity)
        .push_raw(" ADD COLUMN ")
        .push_ident(field)
        .push_raw(" ");
    let alter = match column {
        ColumnType::Primitive(sql) => alter.push_raw(sql.as_str()),
        ColumnType::Enum { type_name, .. } => alter.push_ident(type_name.as_str()),
    };
    format!(
        "IF NOT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_schema = current_schema() AND table_name = {} AND column_name = {}) THEN\n{};\nEND IF;",
        encode_text(entity),
        encode_text(field),
        alter,
    )
}

/// Procedural block adding every stored column the entity's table lacks.
///
/// Returns `None` when the entity has no stored columns.
pub fn add_columns(desc: &EntityDescription) -> Option<String> {
    let mut steps = Vec::new();
    for (field, descriptor) in desc.fields() {
        let Some(column) = declare_column(desc.name(), field, descriptor) else {
            continue;
        };
        if let ColumnType::Enum { type_name, values } = &column {
            steps.push(create_enum_type(type_name, values));
        }
        steps.push(add_column(desc.name(), field, &column));
    }
    if steps.is_empty() {
        return None;
    }
    let body = format!("BEGIN\n{}\nEND", steps.join("\n"));
    Some(format!("DO {};", dollar_quote(&body)))
}

/// Every statement needed to register `desc`, in execution order.
pub fn entity_statements(desc: &EntityDescription) -> Vec<String> {
    let mut statements = vec![create_table(desc.name())];
    statements.extend(desc.fields().filter_map(|(field, descriptor)| {
        matches!(descriptor, FieldDescriptor::Collection { .. })
            .then(|| create_join_table(desc.name(), field))
    }));
    statements.extend(add_columns(desc));
    statements
}
