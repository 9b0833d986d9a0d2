//! Conversion between entity structs and Kelvin wire JSON
//!
//! Encoding serializes the struct, drops absent optionals and turns relation
//! names into resource URLs. Decoding strips the server-assigned `dn` and
//! `url`, turns relation URLs back into names and deserializes the rest.
//! Unknown response fields are ignored.

use serde_json::{Map, Value};

use crate::entity::{Entity, Relation};
use crate::errors::{KelvinError, Result};
use crate::urls::{name_from_url, ResourceUrls};

/// Entity decoded from a response together with its server-assigned fields
#[derive(Debug, Clone)]
pub struct Decoded<E> {
    pub entity: E,
    pub dn: Option<String>,
    pub url: Option<String>,
}

/// Build the request body for creating or modifying `entity`.
pub fn encode<E: Entity>(entity: &E, urls: &ResourceUrls) -> Result<Map<String, Value>> {
    let Value::Object(mut body) = serde_json::to_value(entity)? else {
        return Err(KelvinError::Decode(format!(
            "{} did not serialize to a JSON object",
            E::SPEC.display_name
        )));
    };
    body.retain(|_, value| !value.is_null());
    body.remove("dn");
    body.remove("url");
    for relation in E::SPEC.relations {
        if let Some(value) = body.get_mut(relation.field) {
            *value = names_to_urls(value, relation, urls)?;
        }
    }
    Ok(body)
}

/// Decode one response object.
pub fn decode<E: Entity>(response: Value) -> Result<Decoded<E>> {
    E::check_response(&response);
    let Value::Object(mut body) = response else {
        return Err(KelvinError::Decode(format!(
            "expected a JSON object for {}, got {}",
            E::SPEC.display_name,
            kind_of(&response)
        )));
    };
    let dn = take_string(&mut body, "dn");
    let url = take_string(&mut body, "url");
    body.retain(|_, value| !value.is_null());
    for relation in E::SPEC.relations {
        if let Some(value) = body.get_mut(relation.field) {
            *value = urls_to_names(value, relation)?;
        }
    }
    let entity = serde_json::from_value(Value::Object(body)).map_err(|err| {
        KelvinError::Decode(format!("invalid {} object: {err}", E::SPEC.display_name))
    })?;
    Ok(Decoded { entity, dn, url })
}

/// Decode a search response (a JSON array of objects).
pub fn decode_list<E: Entity>(response: Value) -> Result<Vec<Value>> {
    match response {
        Value::Array(items) => Ok(items),
        other => Err(KelvinError::Decode(format!(
            "expected a JSON array of {} objects, got {}",
            E::SPEC.display_name,
            kind_of(&other)
        ))),
    }
}

fn take_string(body: &mut Map<String, Value>, key: &str) -> Option<String> {
    match body.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

// An unset relation ("") stays empty in both directions.
fn names_to_urls(value: &Value, relation: &Relation, urls: &ResourceUrls) -> Result<Value> {
    convert(value, relation, |name| match name {
        "" => Ok(String::new()),
        name => Ok(urls.relation_url(relation.target, name)),
    })
}

fn urls_to_names(value: &Value, relation: &Relation) -> Result<Value> {
    convert(value, relation, |url| match url {
        "" => Ok(String::new()),
        url => name_from_url(url),
    })
}

fn convert(
    value: &Value,
    relation: &Relation,
    map: impl Fn(&str) -> Result<String>,
) -> Result<Value> {
    match (relation.many, value) {
        (false, Value::String(item)) => Ok(Value::String(map(item)?)),
        (true, Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(item) => map(item).map(Value::String),
                other => Err(relation_error(relation, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        (_, other) => Err(relation_error(relation, other)),
    }
}

fn relation_error(relation: &Relation, value: &Value) -> KelvinError {
    KelvinError::Decode(format!(
        "relation field '{}' must hold {}, got {}",
        relation.field,
        if relation.many { "a list of strings" } else { "a string" },
        kind_of(value)
    ))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
