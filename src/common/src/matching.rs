//! Criteria evaluation for hooks.
//!
//! A hook matches a container when any of its field conditions holds, or,
//! failing that, when any of its label pairs is present on the container.
//! Note this is OR across everything: a hook carrying both a name and an
//! image condition fires when either one is satisfied.

use regex::Regex;

use crate::types::container::ContainerInfo;
use crate::types::hook::{Condition, Criteria, CriteriaField, Hook, Operand};

pub fn hook_matches(hook: &Hook, container: &ContainerInfo) -> bool {
    criteria_match(&hook.criteria, container)
}

pub fn criteria_match(criteria: &Criteria, container: &ContainerInfo) -> bool {
    for (field, condition) in &criteria.fields {
        let value = match field {
            CriteriaField::Name => &container.name,
            CriteriaField::ImageName => &container.image_name,
        };

        if condition_holds(condition, value) {
            return true;
        }
    }

    for (key, expected) in &criteria.labels {
        if container.labels.get(key).is_some_and(|v| v == expected) {
            return true;
        }
    }

    false
}

pub fn condition_holds(condition: &Condition, value: &str) -> bool {
    match condition.op {
        Operand::Equal => condition.value == value,
        Operand::NotEqual => condition.value != value,
        // An invalid pattern never matches; it must not fail the pipeline.
        Operand::Match => Regex::new(&condition.value)
            .map(|re| re.is_match(value))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn container(name: &str, image: &str) -> ContainerInfo {
        ContainerInfo {
            name: name.to_string(),
            image_name: image.to_string(),
            ..Default::default()
        }
    }

    fn hook_with_field(field: CriteriaField, op: Operand, value: &str) -> Hook {
        let mut criteria = Criteria::default();
        criteria.fields.insert(
            field,
            Condition {
                op,
                value: value.to_string(),
            },
        );

        Hook {
            id: "h1".to_string(),
            name: "test".to_string(),
            url: "http://example.net/hook".to_string(),
            events: Default::default(),
            criteria,
            ttl: -1,
            created: 0,
            format: Default::default(),
        }
    }

    #[test]
    fn equal_condition_on_name() {
        let hook = hook_with_field(CriteriaField::Name, Operand::Equal, "foo");
        assert!(hook_matches(&hook, &container("foo", "img")));
        assert!(!hook_matches(&hook, &container("bar", "img")));
    }

    #[test]
    fn not_equal_condition_on_image() {
        let hook = hook_with_field(CriteriaField::ImageName, Operand::NotEqual, "nginx");
        assert!(hook_matches(&hook, &container("web", "redis")));
        assert!(!hook_matches(&hook, &container("web", "nginx")));
    }

    #[test]
    fn regex_condition() {
        let hook = hook_with_field(CriteriaField::ImageName, Operand::Match, "^nginx(:.+)?$");
        assert!(hook_matches(&hook, &container("web", "nginx")));
        assert!(!hook_matches(&hook, &container("web", "postgres")));
    }

    #[test]
    fn invalid_regex_never_matches_and_never_panics() {
        let hook = hook_with_field(CriteriaField::Name, Operand::Match, "(unterminated");
        assert!(!hook_matches(&hook, &container("(unterminated", "img")));
        assert!(!hook_matches(&hook, &container("anything", "img")));
    }

    #[test]
    fn empty_criteria_never_match() {
        let mut hook = hook_with_field(CriteriaField::Name, Operand::Equal, "foo");
        hook.criteria = Criteria::default();
        assert!(!hook_matches(&hook, &container("foo", "img")));
    }

    #[test]
    fn label_match_is_exact_on_key_and_value() {
        let mut hook = hook_with_field(CriteriaField::Name, Operand::Equal, "nope");
        hook.criteria.labels =
            HashMap::from([("env".to_string(), "prod".to_string())]);

        let mut c = container("web", "nginx");
        c.labels.insert("env".to_string(), "prod".to_string());
        assert!(hook_matches(&hook, &c));

        c.labels.insert("env".to_string(), "staging".to_string());
        assert!(!hook_matches(&hook, &c));
    }

    #[test]
    fn any_satisfied_field_is_enough() {
        let mut hook = hook_with_field(CriteriaField::Name, Operand::Equal, "other");
        hook.criteria.fields.insert(
            CriteriaField::ImageName,
            Condition {
                op: Operand::Equal,
                value: "nginx".to_string(),
            },
        );

        // Name does not match but the image does; OR semantics fire the hook.
        assert!(hook_matches(&hook, &container("web", "nginx")));
    }
}
