//! PostgreSQL DDL for entity registration.

pub mod statements;

pub use statements::{
    add_columns, create_enum_type, create_join_table, create_table, entity_statements,
};
