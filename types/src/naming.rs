//! Names derived from entity and field names.
//!
//! These are part of the persisted layout, so they must stay stable.

/// Join table backing collection `field` on `owner`
pub fn join_table(owner: &str, field: &str) -> String {
    format!("{owner}_{field}_join")
}

/// Join table column holding the owner's id
pub fn join_owner_column(owner: &str) -> String {
    format!("{owner}_id")
}

/// Join table column holding the collected record's id
pub fn join_target_column(field: &str) -> String {
    format!("{field}_id")
}

/// Enum type declared for enum field `field` on `entity`
pub fn enum_type_name(entity: &str, field: &str) -> String {
    format!("{entity}_{field}_enum")
}
