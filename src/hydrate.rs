//! Row hydration.
//!
//! A row becomes a [`Record`] whose scalar fields are decoded and whose
//! relation fields are deferred handles. The record is registered in the
//! resolution cache in the same critical section that builds it, before any
//! handle can run.

use std::sync::{Arc, Weak};

use tether_core::{RecordKey, Result, Row, TetherError, Value};
use tether_postgres::builder::{select_joined, select_referencing};
use tether_postgres::decode;
use tether_types::{EntityDescription, FieldDescriptor, naming};

use crate::cache::ResolutionCache;
use crate::database::Inner;
use crate::record::{FieldValue, Record};
use crate::relation::{Many, One, OneState};

/// A reference field on the hydrated record that must point at an already
/// loaded record instead of being resolved.
pub(crate) type Preset<'a> = Option<(&'a str, Arc<Record>)>;

enum Draft {
    Scalar(Value),
    One {
        target: String,
        state: OneState,
    },
    Many {
        target: String,
        sql: String,
        back_reference: Option<String>,
    },
}

/// Hydrates `row` as a record of `desc`, or returns the record already
/// registered for it.
pub(crate) fn hydrate(
    inner: &Arc<Inner>,
    desc: &EntityDescription,
    row: &Row,
    cache: &ResolutionCache,
    preset: &Preset<'_>,
) -> Result<Arc<Record>> {
    let id = row.id()?;
    cache.get_or_try_insert_with(desc.name(), id, || {
        let drafts = desc
            .fields()
            .map(|(name, field)| Ok((name.to_string(), draft(desc.name(), id, name, field, row, preset)?)))
            .collect::<Result<Vec<_>>>()?;
        let key = RecordKey::new(desc.name(), id);
        Ok(Arc::new_cyclic(|this: &Weak<Record>| {
            let fields = drafts
                .into_iter()
                .map(|(name, draft)| (name, finish(draft, this, inner, cache)))
                .collect();
            Record::new(key, fields)
        }))
    })
}

fn draft(
    entity: &str,
    id: i64,
    name: &str,
    field: &FieldDescriptor,
    row: &Row,
    preset: &Preset<'_>,
) -> Result<Draft> {
    let draft = match field {
        FieldDescriptor::Scalar(kind) => Draft::Scalar(decode(kind, name, row.get(name))?),
        FieldDescriptor::Reference { target, .. } => {
            let state = match (preset, row.get(name)) {
                (Some((field, record)), _) if *field == name => OneState::Preset(Arc::clone(record)),
                (_, None) => OneState::Null,
                (_, Some(raw)) => OneState::Pending(
                    raw.parse()
                        .map_err(|e| TetherError::decode(name, raw, e))?,
                ),
            };
            Draft::One {
                target: target.clone(),
                state,
            }
        }
        FieldDescriptor::Collection { target, .. } => {
            let join = naming::join_table(entity, name);
            let target_column = naming::join_target_column(name);
            let owner_column = naming::join_owner_column(entity);
            Draft::Many {
                target: target.clone(),
                sql: select_joined(target, &join, &target_column, &owner_column, id).sql(),
                back_reference: None,
            }
        }
        FieldDescriptor::ReverseOf {
            source,
            source_field,
        } => Draft::Many {
            target: source.clone(),
            sql: select_referencing(source, source_field, id).sql(),
            back_reference: Some(source_field.clone()),
        },
        FieldDescriptor::ReverseJoinOf { owner, owner_field } => {
            let join = naming::join_table(owner, owner_field);
            let owner_column = naming::join_owner_column(owner);
            let target_column = naming::join_target_column(owner_field);
            Draft::Many {
                target: owner.clone(),
                sql: select_joined(owner, &join, &owner_column, &target_column, id).sql(),
                back_reference: None,
            }
        }
    };
    Ok(draft)
}

fn finish(
    draft: Draft,
    this: &Weak<Record>,
    inner: &Arc<Inner>,
    cache: &ResolutionCache,
) -> FieldValue {
    match draft {
        Draft::Scalar(value) => FieldValue::Scalar(value),
        Draft::One { target, state } => FieldValue::One(One {
            target: Arc::from(target),
            state,
            inner: Arc::clone(inner),
            cache: cache.clone(),
        }),
        Draft::Many {
            target,
            sql,
            back_reference,
        } => FieldValue::Many(Many {
            target: Arc::from(target),
            sql,
            back_reference: back_reference.map(|field| (field, this.clone())),
            inner: Arc::clone(inner),
            cache: cache.clone(),
        }),
    }
}
