//! Golden test vectors for transaction data.
//!
//! Each vector runs a fixed scenario against a fresh [`TestFixture`] whose
//! temporary references start at `-1`, and pins the JSON rendering of the
//! resulting facts. Any change to fact ordering, diffing or rendering
//! shows up here first.

use serde_json::{json, Value as Json};

use factmodel::{Fact, Value};

use crate::fixtures::{symbols, TestFixture};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The scenario producing transaction data.
    pub scenario: fn(&TestFixture) -> Vec<Fact>,
    /// Expected JSON rendering of the facts.
    pub expected: fn() -> Json,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "new mouse gains a tag",
            scenario: |f| {
                let mut jerry = f.mouse("Jerry", &["fast"]);
                set(&mut jerry, "tags", Value::Set(symbols(&["fast", "sneaky"])));
                tx(f, &[&jerry])
            },
            expected: || {
                json!([
                    [":db/add", { "#db/id": [":db.part/user", -1] }, ":mouse/tags", [":sneaky"]],
                ])
            },
        },
        GoldenVector {
            name: "stored mouse renamed and retagged",
            scenario: |f| {
                let mut tom = f.stored_mouse(17592186045418, "Tom", &["grey", "slow"]);
                set(&mut tom, "name", Value::from("Thomas"));
                set(&mut tom, "tags", Value::Set(symbols(&["grey", "brave"])));
                tx(f, &[&tom])
            },
            expected: || {
                json!([
                    [":db/retract", 17592186045418i64, ":mouse/tags", [":slow"]],
                    [":db/add", 17592186045418i64, ":mouse/tags", [":brave"]],
                    { ":db/id": 17592186045418i64, ":mouse/name": "Thomas" },
                ])
            },
        },
        GoldenVector {
            name: "name cleared on stored mouse",
            scenario: |f| {
                let mut tom = f.stored_mouse(42, "Tom", &[]);
                set(&mut tom, "name", Value::Nil);
                tx(f, &[&tom])
            },
            expected: || json!([{ ":db/id": 42, ":mouse/name": null }]),
        },
        GoldenVector {
            name: "two new entities share one sequence",
            scenario: |f| {
                let mut jerry = f.mouse("Jerry", &[]);
                set(&mut jerry, "name", Value::from("Jerry Mouse"));
                let mut admin = f.user("admin@example.com");
                set(&mut admin, "roles", Value::Set(symbols(&["admin"])));
                tx(f, &[&jerry, &admin])
            },
            expected: || {
                json!([
                    { ":db/id": { "#db/id": [":db.part/user", -1] }, ":mouse/name": "Jerry Mouse" },
                    [":db/retract", { "#db/id": [":db.part/user", -2] }, ":person.user/roles", [":member"]],
                    [":db/add", { "#db/id": [":db.part/user", -2] }, ":person.user/roles", [":admin"]],
                ])
            },
        },
        GoldenVector {
            name: "retract stored entity",
            scenario: |f| {
                let tom = f.stored_mouse(7, "Tom", &[]);
                f.session
                    .retract(&[&tom])
                    .unwrap_or_else(|err| panic!("retract: {err}"))
            },
            expected: || json!([[":db.fn/retractEntity", 7]]),
        },
    ]
}

fn set(entity: &mut factmodel::Entity, name: &str, value: Value) {
    entity
        .set(name, value)
        .unwrap_or_else(|err| panic!("set {name}: {err}"));
}

fn tx(fixture: &TestFixture, entities: &[&factmodel::Entity]) -> Vec<Fact> {
    fixture
        .session
        .transaction(entities)
        .unwrap_or_else(|err| panic!("transaction: {err}"))
}

/// Run a vector's scenario on a fresh fixture and render the facts.
pub fn render_vector(vector: &GoldenVector) -> Json {
    let fixture = TestFixture::starting_at(-1);
    let facts = (vector.scenario)(&fixture);
    serde_json::to_value(&facts).unwrap_or_else(|err| panic!("render {}: {err}", vector.name))
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, rendered)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, Json)> {
    all_vectors()
        .iter()
        .map(|v| {
            let rendered = render_vector(v);
            let matches = rendered == (v.expected)();
            (v.name.to_string(), matches, rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, rendered) in verify_all_vectors() {
            assert!(matches, "Vector '{name}' rendered {rendered}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(
                render_vector(&vector),
                render_vector(&vector),
                "Vector '{}' changed on regeneration",
                vector.name
            );
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
