//! Identifier and status resolution.
//!
//! Both lookups are ordered rule lists: the first rule that matches any
//! property at a level wins, regardless of where that property sits in the
//! definition.

use crate::error::SchemaError;
use crate::types::{SchemaDefinition, SchemaProperty, MAX_NESTING_DEPTH};

/// Predicate selecting a candidate property at one level.
type Rule = fn(&SchemaProperty) -> bool;

/// Identifier rules, highest precedence first.
const IDENTIFIER_RULES: &[Rule] = &[is_named_id, is_flagged_identifier];

/// Status rules, highest precedence first. An explicit flag beats the
/// conventional `status` name.
const STATUS_RULES: &[Rule] = &[is_flagged_status, is_named_status];

fn is_named_id(p: &SchemaProperty) -> bool {
    p.is_named_id()
}

fn is_flagged_identifier(p: &SchemaProperty) -> bool {
    p.is_identifier
}

fn is_flagged_status(p: &SchemaProperty) -> bool {
    p.is_status_identifier
}

fn is_named_status(p: &SchemaProperty) -> bool {
    p.is_named_status()
}

fn first_match<'a>(
    rules: &[Rule],
    candidates: impl Iterator<Item = &'a SchemaProperty> + Clone,
) -> Option<&'a SchemaProperty> {
    rules
        .iter()
        .find_map(|rule| candidates.clone().find(|p| rule(p)))
}

/// Resolve the name of the property identifying a resource instance.
///
/// Only root-level properties are candidates: a property named `id` first,
/// then one flagged as identifier.
///
/// # Errors
///
/// Returns `SchemaError::NoIdentifierFound` if neither exists.
pub fn resolve_identifier(definition: &SchemaDefinition) -> Result<&str, SchemaError> {
    first_match(IDENTIFIER_RULES, definition.properties.iter())
        .map(|p| p.name.as_str())
        .ok_or(SchemaError::NoIdentifierFound)
}

/// Resolve the path of property names leading to a resource's status.
///
/// The root-level candidate must be read-only; nested levels inherit that
/// from their parent and are not checked. The root property named `id` is
/// never a status candidate.
///
/// # Errors
///
/// Returns `SchemaError::NoStatusFound` if no candidate exists at some level
/// or the root candidate is not read-only.
pub fn resolve_status(definition: &SchemaDefinition) -> Result<Vec<String>, SchemaError> {
    let mut path = Vec::new();
    status_path(definition, true, &mut path)?;
    Ok(path)
}

fn status_path(
    definition: &SchemaDefinition,
    root: bool,
    path: &mut Vec<String>,
) -> Result<(), SchemaError> {
    if path.len() >= MAX_NESTING_DEPTH {
        return Err(SchemaError::CyclicSchema {
            path: path.join("."),
            depth: MAX_NESTING_DEPTH,
        });
    }

    let candidates = definition
        .properties
        .iter()
        .filter(move |p| !(root && p.is_named_id()));

    let status =
        first_match(STATUS_RULES, candidates).ok_or(SchemaError::NoStatusFound { property: None })?;

    if root && !status.read_only {
        return Err(SchemaError::NoStatusFound {
            property: Some(status.name.clone()),
        });
    }

    path.push(status.name.clone());

    match status.nested() {
        Some(nested) if status.is_object() => status_path(nested, false, path),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaProperty;

    #[test]
    fn identifier_named_id() {
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("name"),
            SchemaProperty::string("id"),
        ]);
        assert_eq!(resolve_identifier(&def).unwrap(), "id");
    }

    #[test]
    fn identifier_name_is_normalized() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("ID")]);
        assert_eq!(resolve_identifier(&def).unwrap(), "ID");
    }

    #[test]
    fn identifier_flag_used_without_id() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("someOtherID")
            .read_only()
            .identifier()]);
        assert_eq!(resolve_identifier(&def).unwrap(), "someOtherID");
    }

    #[test]
    fn identifier_named_id_beats_flag() {
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("uuid").identifier(),
            SchemaProperty::string("id"),
        ]);
        assert_eq!(resolve_identifier(&def).unwrap(), "id");
    }

    #[test]
    fn identifier_ignores_nested_id() {
        let nested = SchemaDefinition::new(vec![SchemaProperty::string("id")]);
        let def = SchemaDefinition::new(vec![SchemaProperty::object("inner", nested)]);
        assert!(matches!(
            resolve_identifier(&def),
            Err(SchemaError::NoIdentifierFound)
        ));
    }

    #[test]
    fn status_flag_takes_precedence() {
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("status").read_only(),
            SchemaProperty::string("some-other-property-holding-status")
                .read_only()
                .status_identifier(),
        ]);
        assert_eq!(
            resolve_status(&def).unwrap(),
            vec!["some-other-property-holding-status"]
        );
    }

    #[test]
    fn status_nested_object() {
        let nested = SchemaDefinition::new(vec![SchemaProperty::string("actualStatus")
            .read_only()
            .status_identifier()]);
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("id").read_only(),
            SchemaProperty::object("status", nested).read_only(),
        ]);
        assert_eq!(resolve_status(&def).unwrap(), vec!["status", "actualStatus"]);
    }

    #[test]
    fn status_nested_level_skips_read_only_check() {
        let nested = SchemaDefinition::new(vec![SchemaProperty::string("state")
            .status_identifier()]);
        let def = SchemaDefinition::new(vec![SchemaProperty::object("status", nested).read_only()]);
        assert_eq!(resolve_status(&def).unwrap(), vec!["status", "state"]);
    }

    #[test]
    fn status_root_must_be_read_only() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("status")]);
        assert!(matches!(
            resolve_status(&def),
            Err(SchemaError::NoStatusFound { property: Some(name) }) if name == "status"
        ));
    }

    #[test]
    fn status_missing() {
        let def = SchemaDefinition::new(vec![
            SchemaProperty::string("prop-that-is-not-status").read_only(),
        ]);
        assert!(matches!(
            resolve_status(&def),
            Err(SchemaError::NoStatusFound { property: None })
        ));
    }

    #[test]
    fn status_root_id_is_never_a_candidate() {
        let def = SchemaDefinition::new(vec![SchemaProperty::string("id")
            .read_only()
            .status_identifier()]);
        assert!(resolve_status(&def).is_err());
    }

    #[test]
    fn status_nested_id_is_a_candidate() {
        let nested = SchemaDefinition::new(vec![SchemaProperty::string("id")
            .read_only()
            .status_identifier()]);
        let def = SchemaDefinition::new(vec![SchemaProperty::object("status", nested).read_only()]);
        assert_eq!(resolve_status(&def).unwrap(), vec!["status", "id"]);
    }

    #[test]
    fn status_inner_level_without_candidate_fails() {
        let nested = SchemaDefinition::new(vec![SchemaProperty::string("message")]);
        let def = SchemaDefinition::new(vec![SchemaProperty::object("status", nested).read_only()]);
        assert!(matches!(
            resolve_status(&def),
            Err(SchemaError::NoStatusFound { property: None })
        ));
    }

    #[test]
    fn status_deep_nesting_is_reported_as_cycle() {
        let mut def = SchemaDefinition::new(vec![SchemaProperty::string("status").read_only()]);
        for _ in 0..MAX_NESTING_DEPTH + 1 {
            def = SchemaDefinition::new(vec![SchemaProperty::object("status", def).read_only()]);
        }
        assert!(matches!(
            resolve_status(&def),
            Err(SchemaError::CyclicSchema { .. })
        ));
    }
}
