//! Second build phase: validation and reverse-field binding.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tether_core::{Result, TetherError, validate_identifier};
use tether_types::{EntityDescription, FieldDescriptor, ScalarKind, naming};

use super::Registry;
use super::builder::Entity;

/// Custom type names are declared verbatim, so only plain type syntax is
/// accepted: words, optional numeric modifiers and an optional array suffix.
static CUSTOM_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_ ]*(\(\s*\d+(\s*,\s*\d+)*\s*\))?(\[\])?$")
        .expect("custom type pattern is valid")
});

pub(super) fn bind(entities: Vec<Entity>) -> Result<Registry> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(entities.len());
    let mut descriptions = Vec::with_capacity(entities.len());

    for entity in &entities {
        validate_identifier(&entity.name)?;
        if index.insert(&entity.name, descriptions.len()).is_some() {
            return Err(TetherError::DuplicateEntity(entity.name.clone()));
        }
        let mut desc = EntityDescription::new(&entity.name);
        for (name, field) in &entity.fields {
            validate_declared_field(&entity.name, name, field)?;
            if !desc.insert(name, field.clone()) {
                return Err(TetherError::DuplicateField {
                    entity: entity.name.clone(),
                    field: name.clone(),
                });
            }
        }
        descriptions.push(desc);
    }

    for entity in &entities {
        for (name, field) in &entity.fields {
            let (target, reverse, back) = match field {
                FieldDescriptor::Reference { target, reverse } => (
                    target,
                    reverse,
                    FieldDescriptor::ReverseOf {
                        source: entity.name.clone(),
                        source_field: name.clone(),
                    },
                ),
                FieldDescriptor::Collection { target, reverse } => {
                    let join = naming::join_table(&entity.name, name);
                    if index.contains_key(join.as_str()) {
                        return Err(TetherError::InvalidSchema(format!(
                            "join table of `{}.{name}` collides with entity `{join}`",
                            entity.name
                        )));
                    }
                    (
                        target,
                        reverse,
                        FieldDescriptor::ReverseJoinOf {
                            owner: entity.name.clone(),
                            owner_field: name.clone(),
                        },
                    )
                }
                _ => continue,
            };
            let &target_index = index
                .get(target.as_str())
                .ok_or_else(|| TetherError::UnknownEntity(target.clone()))?;
            let Some(reverse) = reverse else {
                continue;
            };
            validate_identifier(reverse)?;
            reject_reserved(target, reverse)?;
            if !descriptions[target_index].insert(reverse, back) {
                return Err(TetherError::DuplicateField {
                    entity: target.clone(),
                    field: reverse.clone(),
                });
            }
        }
    }

    Ok(Registry::from_descriptions(descriptions))
}

fn reject_reserved(entity: &str, field: &str) -> Result<()> {
    if field == "id" {
        return Err(TetherError::InvalidSchema(format!(
            "`id` is reserved for the storage identity of `{entity}`"
        )));
    }
    Ok(())
}

fn validate_declared_field(entity: &str, name: &str, field: &FieldDescriptor) -> Result<()> {
    validate_identifier(name)?;
    reject_reserved(entity, name)?;
    match field {
        FieldDescriptor::Scalar(ScalarKind::Enum(values)) => {
            if values.is_empty() {
                return Err(TetherError::InvalidSchema(format!(
                    "enum field `{entity}.{name}` declares no values"
                )));
            }
            validate_identifier(&naming::enum_type_name(entity, name))?;
        }
        FieldDescriptor::Scalar(ScalarKind::Custom(type_name)) => {
            if !CUSTOM_TYPE.is_match(type_name) {
                return Err(TetherError::InvalidSchema(format!(
                    "`{type_name}` is not a usable type for `{entity}.{name}`"
                )));
            }
        }
        FieldDescriptor::Scalar(_) | FieldDescriptor::Reference { .. } => {}
        FieldDescriptor::Collection { .. } => {
            // The join table's two id columns would share a name.
            if name == entity {
                return Err(TetherError::InvalidSchema(format!(
                    "collection `{entity}.{name}` cannot be named after its owner"
                )));
            }
            validate_identifier(&naming::join_table(entity, name))?;
            validate_identifier(&naming::join_owner_column(entity))?;
            validate_identifier(&naming::join_target_column(name))?;
        }
        FieldDescriptor::ReverseOf { .. } | FieldDescriptor::ReverseJoinOf { .. } => {
            return Err(TetherError::InvalidSchema(format!(
                "`{entity}.{name}` is a reverse field; declare `reverse` on its source instead"
            )));
        }
    }
    Ok(())
}
