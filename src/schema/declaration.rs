//! Serializable entity declarations.
//!
//! The same shape is read from configuration files and JSON documents:
//!
//! ```toml
//! [person]
//! first_name = { type = "text", limit = 50 }
//! gender = { type = "enum", values = ["male", "female"] }
//! boss = { type = "person", reverse = "reports" }
//!
//! [shift]
//! workers = { type = ["person"], reverse = "shifts_worked" }
//! ```
//!
//! A `type` naming a declared entity is a reference and a one-element list is
//! a collection. Known kind names are scalars; any other name is passed
//! through as a custom column type.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tether_core::{Result, TetherError};
use tether_types::{FieldDescriptor, ScalarKind};

use super::{Entity, Registry, Schema};

/// The `type` of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// A kind name, an entity name or a custom type name
    Name(String),
    /// `[target]`
    Collection(Vec<String>),
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: TypeSpec,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub reverse: Option<String>,
}

/// Entity name to field name to field declaration.
///
/// Entities and fields are laid out in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Declarations(pub BTreeMap<String, BTreeMap<String, FieldSpec>>);

impl Declarations {
    /// Converts the declarations into a schema ready to build.
    pub fn to_schema(&self) -> Result<Schema> {
        let entities: BTreeSet<&str> = self.0.keys().map(String::as_str).collect();
        if let Some(shadowing) = entities.iter().find(|name| ScalarKind::from_name(name).is_some()) {
            return Err(TetherError::InvalidSchema(format!(
                "entity `{shadowing}` shadows a built-in type name"
            )));
        }
        self.0
            .iter()
            .map(|(name, fields)| {
                fields
                    .iter()
                    .try_fold(Entity::new(name), |entity, (field, spec)| {
                        Ok::<_, TetherError>(entity.field(field, spec.descriptor(name, field, &entities)?))
                    })
            })
            .collect()
    }

    /// Builds the declarations into a registry.
    pub fn build(&self) -> Result<Registry> {
        self.to_schema()?.build()
    }
}

impl FieldSpec {
    fn descriptor(&self, entity: &str, field: &str, entities: &BTreeSet<&str>) -> Result<FieldDescriptor> {
        let invalid = |what: &str| {
            Err(TetherError::InvalidSchema(format!(
                "`{entity}.{field}`: {what}"
            )))
        };

        let relation = match &self.kind {
            TypeSpec::Collection(targets) => match targets.as_slice() {
                [target] => Some(FieldDescriptor::Collection {
                    target: target.clone(),
                    reverse: self.reverse.clone(),
                }),
                _ => return invalid("a collection type names exactly one entity"),
            },
            TypeSpec::Name(name) if entities.contains(name.as_str()) => {
                Some(FieldDescriptor::Reference {
                    target: name.clone(),
                    reverse: self.reverse.clone(),
                })
            }
            TypeSpec::Name(_) => None,
        };
        if let Some(relation) = relation {
            if self.limit.is_some() || self.size.is_some() || self.values.is_some() {
                return invalid("relations take no `limit`, `size` or `values`");
            }
            return Ok(relation);
        }

        if self.reverse.is_some() {
            return invalid("only relations take a `reverse` name");
        }
        let TypeSpec::Name(name) = &self.kind else {
            return invalid("unexpected type");
        };
        let kind = match (ScalarKind::from_name(name), &self.values) {
            (Some(ScalarKind::Text { .. }), None) => ScalarKind::Text {
                limit: self.limit,
                size: self.size,
            },
            (Some(ScalarKind::Enum(_)), Some(values)) => ScalarKind::Enum(values.clone()),
            (Some(ScalarKind::Enum(_)), None) => return invalid("enum fields need `values`"),
            (_, Some(_)) => return invalid("only enum fields take `values`"),
            (Some(kind), None) => kind,
            (None, None) => ScalarKind::Custom(name.clone()),
        };
        if !matches!(kind, ScalarKind::Text { .. }) && (self.limit.is_some() || self.size.is_some()) {
            return invalid("only text fields take `limit` or `size`");
        }
        Ok(FieldDescriptor::Scalar(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAFF: &str = r#"
        [person]
        first_name = { type = "text", limit = 50 }
        last_name = { type = "varchar", limit = 50 }
        initials = { type = "text", size = 2 }
        gender = { type = "enum", values = ["male", "female"] }
        birth = { type = "timestamp" }
        pay_rate = { type = "smallint" }
        home = { type = "point" }
        address = { type = "inet" }
        boss = { type = "person", reverse = "reports" }

        [shift]
        title = { type = "text" }
        employer = { type = "person", reverse = "jobs" }
        workers = { type = ["person"], reverse = "shifts_worked" }
    "#;

    #[test]
    fn toml_declarations_build_a_registry() {
        let decls: Declarations = toml::from_str(STAFF).unwrap();
        let registry = decls.build().unwrap();
        let person = registry.get("person").unwrap();

        assert_eq!(
            person.field("first_name"),
            Some(&FieldDescriptor::Scalar(ScalarKind::varchar(50)))
        );
        assert_eq!(person.field("initials"), Some(&FieldDescriptor::Scalar(ScalarKind::char(2))));
        assert_eq!(
            person.field("address"),
            Some(&FieldDescriptor::Scalar(ScalarKind::Custom("inet".into())))
        );
        assert!(matches!(person.field("boss"), Some(FieldDescriptor::Reference { .. })));
        assert!(matches!(person.field("shifts_worked"), Some(FieldDescriptor::ReverseJoinOf { .. })));
        assert!(matches!(person.field("jobs"), Some(FieldDescriptor::ReverseOf { .. })));
        assert!(matches!(
            registry.get("shift").unwrap().field("workers"),
            Some(FieldDescriptor::Collection { target, .. }) if target == "person"
        ));
    }

    #[test]
    fn json_declarations_share_the_shape() {
        let decls: Declarations = serde_json::from_str(
            r#"{ "review": { "to": { "type": "person", "reverse": "reviews" }, "stars": { "type": "integer" } },
                 "person": { "name": { "type": "text" } } }"#,
        )
        .unwrap();
        let registry = decls.build().unwrap();
        assert!(registry.get("person").unwrap().field("reviews").is_some());
    }

    #[test]
    fn misplaced_parameters_are_rejected() {
        for body in [
            r#"[note]
               body = { type = "integer", limit = 3 }"#,
            r#"[note]
               body = { type = "text", values = ["a"] }"#,
            r#"[note]
               body = { type = "enum" }"#,
            r#"[note]
               body = { type = "text", reverse = "notes" }"#,
            r#"[note]
               body = { type = ["note", "note"] }"#,
        ] {
            let decls: Declarations = toml::from_str(body).unwrap();
            assert!(
                matches!(decls.build(), Err(TetherError::InvalidSchema(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn entities_cannot_shadow_kind_names() {
        let decls: Declarations = toml::from_str(
            r#"[point]
               x = { type = "real" }"#,
        )
        .unwrap();
        assert!(matches!(decls.build(), Err(TetherError::InvalidSchema(_))));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        let parsed: std::result::Result<Declarations, _> = toml::from_str(
            r#"[note]
               body = { type = "text", lenght = 3 }"#,
        );
        assert!(parsed.is_err());
    }
}
