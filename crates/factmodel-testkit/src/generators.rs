//! Proptest generators for property-based testing.

use proptest::prelude::*;

use factmodel::{Entity, Keyword, Value, ValueSet};

use crate::fixtures::{symbols, TestFixture};

/// Generate a keyword name segment.
pub fn symbol_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}".prop_map(String::from)
}

/// Generate a keyword, namespaced or not.
pub fn keyword() -> impl Strategy<Value = Keyword> {
    (
        proptest::option::of("[a-z][a-z0-9.]{0,11}".prop_map(String::from)),
        symbol_name(),
    )
        .prop_map(|(ns, name)| match ns {
            Some(ns) => Keyword::namespaced(ns, name),
            None => Keyword::new(name),
        })
}

/// Generate a scalar value of one of the attribute value types.
pub fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        keyword().prop_map(Value::Keyword),
        "[ -~]{0,24}".prop_map(Value::String),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
        any::<bool>().prop_map(Value::Boolean),
    ]
}

/// Generate a set of up to `max_len` keywords.
pub fn value_set(max_len: usize) -> impl Strategy<Value = ValueSet> {
    prop::collection::vec(keyword().prop_map(Value::Keyword), 0..=max_len)
        .prop_map(|values| values.into_iter().collect())
}

/// Generate a subset of a small tag vocabulary.
pub fn tags() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(
        vec!["fast", "sneaky", "brave", "hungry", "sleepy", "grey"],
        0..=6,
    )
    .prop_map(|tags| tags.into_iter().map(String::from).collect())
}

/// A mouse whose tags are reassigned once.
#[derive(Debug, Clone)]
pub struct TagChangeParams {
    pub name: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub persisted: Option<i64>,
}

impl Arbitrary for TagChangeParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[A-Z][a-z]{0,9}",
            tags(),
            tags(),
            proptest::option::of(1i64..=1_000_000i64),
        )
            .prop_map(|(name, before, after, persisted)| TagChangeParams {
                name,
                before,
                after,
                persisted,
            })
            .boxed()
    }
}

impl TagChangeParams {
    pub fn before_set(&self) -> ValueSet {
        symbols(&self.before.iter().map(String::as_str).collect::<Vec<_>>())
    }

    pub fn after_set(&self) -> ValueSet {
        symbols(&self.after.iter().map(String::as_str).collect::<Vec<_>>())
    }
}

/// Build the mouse described by `params` and apply its tag change.
pub fn mouse_from_params(fixture: &TestFixture, params: &TagChangeParams) -> Entity {
    let before: Vec<&str> = params.before.iter().map(String::as_str).collect();
    let mut mouse = match params.persisted {
        Some(id) => fixture.stored_mouse(id, &params.name, &before),
        None => fixture.mouse(&params.name, &before),
    };
    mouse
        .set("tags", Value::Set(params.after_set()))
        .unwrap_or_else(|err| panic!("fixture tags: {err}"));
    mouse
}

#[cfg(test)]
mod tests {
    use super::*;
    use factmodel::{Fact, TxOp};

    fn assertions(facts: &[Fact]) -> Vec<(TxOp, ValueSet)> {
        facts
            .iter()
            .filter_map(|fact| match fact {
                Fact::Assertion { op, values, .. } => Some((*op, values.clone())),
                _ => None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_keyword_display_parses_back(kw in keyword()) {
            let parsed: Keyword = kw.to_string().parse().unwrap();
            prop_assert_eq!(parsed, kw);
        }

        #[test]
        fn test_value_order_is_total(a in scalar_value(), b in scalar_value()) {
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            prop_assert_eq!(a == b, a.cmp(&b).is_eq());
        }

        #[test]
        fn test_set_difference_disjoint(a in value_set(8), b in value_set(8)) {
            let removed = a.difference(&b);
            let added = b.difference(&a);
            prop_assert!(removed.iter().all(|v| !b.contains(v)));
            prop_assert!(added.iter().all(|v| !a.contains(v)));
        }

        #[test]
        fn test_tag_change_is_a_set_diff(params: TagChangeParams) {
            let fixture = TestFixture::new();
            let mouse = mouse_from_params(&fixture, &params);

            let before = params.before_set();
            let after = params.after_set();
            let facts = mouse.tx_data().unwrap();

            let mut expected = Vec::new();
            let retracted = before.difference(&after);
            if !retracted.is_empty() {
                expected.push((TxOp::Retract, retracted));
            }
            let added = after.difference(&before);
            if !added.is_empty() {
                expected.push((TxOp::Add, added));
            }

            prop_assert_eq!(assertions(&facts), expected);
            prop_assert_eq!(facts.len(), assertions(&facts).len());
        }

        #[test]
        fn test_tag_change_names_one_entity(params: TagChangeParams) {
            let fixture = TestFixture::new();
            let mouse = mouse_from_params(&fixture, &params);
            let facts = mouse.tx_data().unwrap();

            for fact in &facts {
                prop_assert_eq!(fact.entity_ref(), Some(mouse.entity_ref()));
            }
            prop_assert_eq!(mouse.entity_ref().is_permanent(), params.persisted.is_some());
        }

        #[test]
        fn test_tag_change_serializes(params: TagChangeParams) {
            let fixture = TestFixture::new();
            let mouse = mouse_from_params(&fixture, &params);
            let json = serde_json::to_value(mouse.tx_data().unwrap()).unwrap();

            let facts = json.as_array().unwrap();
            for fact in facts {
                let fact = fact.as_array().unwrap();
                prop_assert_eq!(fact.len(), 4);
                prop_assert_eq!(&fact[2], &serde_json::json!(":mouse/tags"));
            }
        }
    }
}
