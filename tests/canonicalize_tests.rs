//! Canonicalization properties: idempotence, className scrubbing, and the
//! handling of functions, absent values, and empty keys.

use serde_json::json;
use snapkeep::{canonicalize, canonicalize_with, Canonical, CanonicalizeOptions, RenderTree, Value};

struct FakeWrapper(serde_json::Value);

impl RenderTree for FakeWrapper {
    fn render_tree(&self) -> serde_json::Value {
        self.0.clone()
    }
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::Absent,
        Value::Null,
        Value::from(true),
        Value::from(-3),
        Value::from(2.5),
        Value::from("text"),
        Value::from(vec![Value::Null, Value::Absent, Value::from(1)]),
        Value::map([
            ("name", Value::from("card")),
            ("", Value::from("dropped")),
            ("onClick", Value::function("handleClick")),
            ("render", Value::anonymous_function()),
            ("missing", Value::Absent),
        ]),
        Value::tree(FakeWrapper(json!({
            "type": "div",
            "props": {"className": "card-123", "title": "v2"},
            "children": [{"type": "span", "props": {"innerClassName": "x9"}}]
        }))),
    ]
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    #[test]
    fn canonicalizing_twice_equals_once() {
        for value in sample_values() {
            let once = canonicalize(&value);
            let twice = canonicalize(&Value::from(once.clone()));
            assert_eq!(once, twice, "not idempotent for {:?}", value);
            assert_eq!(once.render().unwrap(), twice.render().unwrap());
        }
    }

    #[test]
    fn idempotent_without_optional_passes() {
        let options = CanonicalizeOptions {
            scrub_class_names: false,
            collapse_functions: false,
        };
        for value in sample_values() {
            let once = canonicalize_with(&value, options);
            let twice = canonicalize_with(&Value::from(once.clone()), options);
            assert_eq!(once, twice);
        }
    }
}

#[cfg(test)]
mod structure_tests {
    use super::*;

    #[test]
    fn null_and_absent_stay_distinct() {
        assert_eq!(canonicalize(&Value::Null), Canonical::Null);
        assert_eq!(canonicalize(&Value::Absent), Canonical::Absent);
        assert_eq!(Canonical::Null.render().unwrap(), "null");
        assert_eq!(Canonical::Absent.render().unwrap(), "undefined");
    }

    #[test]
    fn lists_keep_order_and_length() {
        let value = Value::from(vec![Value::from(3), Value::Absent, Value::from("a")]);
        match canonicalize(&value) {
            Canonical::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[1], Canonical::Absent);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn functions_collapse_to_names() {
        let value = Value::map([
            ("named", Value::function("submit")),
            ("anon", Value::anonymous_function()),
            ("empty", Value::Function(Some(String::new()))),
        ]);
        let rendered = canonicalize(&value).render().unwrap();
        assert_eq!(
            rendered,
            "{\n  \"named\": \"submit\",\n  \"anon\": \"[function]\",\n  \"empty\": \"[function]\"\n}"
        );
    }

    #[test]
    fn uncollapsed_functions_are_dropped() {
        let options = CanonicalizeOptions {
            collapse_functions: false,
            ..CanonicalizeOptions::default()
        };
        let value = Value::map([("f", Value::function("go")), ("n", Value::from(1))]);
        let rendered = canonicalize_with(&value, options).render().unwrap();
        assert_eq!(rendered, "{\n  \"n\": 1\n}");
    }

    #[test]
    fn only_the_empty_key_is_skipped() {
        let value = Value::map([("", Value::from(1)), (" ", Value::from(2)), ("$", Value::from(3))]);
        match canonicalize(&value) {
            Canonical::Map(entries) => {
                let keys: Vec<_> = entries.keys().cloned().collect();
                assert_eq!(keys, vec![" ", "$"]);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn map_keys_keep_insertion_order() {
        let value = Value::map([("zeta", 1), ("alpha", 2), ("mid", 3)]);
        assert_eq!(
            canonicalize(&value).render().unwrap(),
            "{\n  \"zeta\": 1,\n  \"alpha\": 2,\n  \"mid\": 3\n}"
        );
    }

    #[test]
    fn serializable_values_convert() {
        #[derive(serde::Serialize)]
        struct Card {
            title: String,
            tags: Vec<&'static str>,
        }
        let card = Card {
            title: "hi".into(),
            tags: vec!["a", "b"],
        };
        let value = Value::from_serialize(&card).unwrap();
        assert_eq!(
            canonicalize(&value),
            Canonical::from(json!({"title": "hi", "tags": ["a", "b"]}))
        );
    }
}

#[cfg(test)]
mod class_name_tests {
    use super::*;

    #[test]
    fn strips_digits_from_class_names_at_any_depth() {
        let tree = FakeWrapper(json!({
            "type": "ul",
            "props": {"className": "list-1a2b", "data-id": "item-42"},
            "children": [
                {"type": "li", "props": {"CLASSNAME": "row7", "label": "row 7"}},
                [{"wrapperClassName": "w99", "count": 12}]
            ]
        }));
        let canonical = canonicalize(&Value::tree(&tree));
        assert_eq!(
            canonical,
            Canonical::from(json!({
                "type": "ul",
                "props": {"className": "list-ab", "data-id": "item-42"},
                "children": [
                    {"type": "li", "props": {"CLASSNAME": "row", "label": "row 7"}},
                    [{"wrapperClassName": "w", "count": 12}]
                ]
            }))
        );
    }

    #[test]
    fn non_string_class_names_are_recursed_not_stripped() {
        let tree = FakeWrapper(json!({
            "className": {"inner": "x1", "className": "y2"},
            "classNames": ["a1", "b2"]
        }));
        assert_eq!(
            canonicalize(&Value::tree(&tree)),
            Canonical::from(json!({
                "className": {"inner": "x1", "className": "y"},
                "classNames": ["a1", "b2"]
            }))
        );
    }

    #[test]
    fn plain_values_are_never_scrubbed() {
        let value = Value::from(json!({"className": "keep-123"}));
        assert_eq!(
            canonicalize(&value),
            Canonical::from(json!({"className": "keep-123"}))
        );
    }

    #[test]
    fn scrubbing_can_be_disabled() {
        let options = CanonicalizeOptions {
            scrub_class_names: false,
            ..CanonicalizeOptions::default()
        };
        let tree = FakeWrapper(json!({"className": "c1"}));
        assert_eq!(
            canonicalize_with(&Value::tree(&tree), options),
            Canonical::from(json!({"className": "c1"}))
        );
    }
}
