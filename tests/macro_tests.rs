//! The `assert_snapshot!` macro against snapshots committed next to this
//! file. CI mode is forced so a key mismatch can never record silently.

use serde_json::json;
use snapkeep::{assert_snapshot, RenderTree, SnapshotConfig, Value};

struct Button {
    label: &'static str,
    build: u32,
}

impl RenderTree for Button {
    fn render_tree(&self) -> serde_json::Value {
        json!({
            "type": "button",
            "props": {"className": format!("btn-{}", self.build), "label": self.label}
        })
    }
}

fn committed() -> SnapshotConfig {
    SnapshotConfig::plain().with_ci(true)
}

#[test]
fn renders_greeting_card() {
    let card = Value::map([("title", Value::from("hello")), ("count", Value::from(3))]);
    assert_snapshot!(card, committed());
    assert_snapshot!(vec!["a", "b"], committed());
}

#[test]
fn generated_class_names_do_not_matter() {
    assert_snapshot!(Value::tree(Button { label: "Save", build: 4711 }), committed());
}

#[test]
#[should_panic(expected = "Snapshot didn't match")]
fn divergent_value_panics() {
    assert_snapshot!(Value::from("something else"), committed());
}
