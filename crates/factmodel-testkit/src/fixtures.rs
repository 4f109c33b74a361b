//! Test fixtures and helpers.
//!
//! Two small model types wired to one session, plus shortcuts for the
//! instances most tests start from.

use std::sync::Arc;

use factmodel::{
    AttributeOptions, Entity, EntityType, EntityTypeExt, Keyword, Session, SessionConfig,
    Uniqueness, Value, ValueSet, ValueType,
};

/// A session with a `Mouse` and a `Person::User` type declared.
///
/// `Mouse` has `name` (string) and `tags` (symbol, many).
/// `Person::User` has `email` (string, unique identity), `age` (integer)
/// and `roles` (symbol, many, default `#{:member}`).
pub struct TestFixture {
    pub session: Session,
    pub mouse: Arc<EntityType>,
    pub user: Arc<EntityType>,
}

impl TestFixture {
    /// Create a fixture with the default session configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a fixture whose temporary references start at `start`.
    pub fn starting_at(start: i64) -> Self {
        Self::with_config(SessionConfig {
            temp_ref_start: start,
            ..SessionConfig::default()
        })
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let session = Session::new(config);
        let mouse = mouse_type(&session);
        let user = user_type(&session);
        Self {
            session,
            mouse,
            user,
        }
    }

    /// A new, unsaved mouse.
    pub fn mouse(&self, name: &str, tags: &[&str]) -> Entity {
        let fields = [
            ("name", Value::from(name)),
            ("tags", Value::Set(symbols(tags))),
        ];
        // Both attributes are declared on the fixture type.
        self.mouse
            .create(fields)
            .unwrap_or_else(|err| panic!("fixture mouse: {err}"))
    }

    /// A mouse re-hydrated from a query row, persisted and clean.
    pub fn stored_mouse(&self, id: i64, name: &str, tags: &[&str]) -> Entity {
        let row = vec![
            Value::Integer(id),
            Value::from(name),
            Value::Set(symbols(tags)),
        ];
        self.mouse
            .from_query(row)
            .unwrap_or_else(|err| panic!("fixture mouse row: {err}"))
    }

    /// A new, unsaved user with default roles.
    pub fn user(&self, email: &str) -> Entity {
        self.user
            .create([("email", email)])
            .unwrap_or_else(|err| panic!("fixture user: {err}"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Declare the `Mouse` type on `session`.
pub fn mouse_type(session: &Session) -> Arc<EntityType> {
    let mut builder = session.define("Mouse");
    builder
        .attribute("name", ValueType::String, AttributeOptions::new())
        .and_then(|b| b.attribute("tags", ValueType::Symbol, AttributeOptions::new().many()))
        .unwrap_or_else(|err| panic!("fixture Mouse declaration: {err}"));
    builder
        .build()
        .unwrap_or_else(|err| panic!("fixture Mouse build: {err}"))
}

/// Declare the `Person::User` type on `session`.
pub fn user_type(session: &Session) -> Arc<EntityType> {
    let mut builder = session.define("Person::User");
    builder
        .attribute(
            "email",
            ValueType::String,
            AttributeOptions::new()
                .unique(Uniqueness::Identity)
                .index()
                .doc("Login address"),
        )
        .and_then(|b| b.attribute("age", ValueType::Integer, AttributeOptions::new()))
        .and_then(|b| {
            b.attribute(
                "roles",
                ValueType::Symbol,
                AttributeOptions::new()
                    .many()
                    .default_value(Keyword::new("member")),
            )
        })
        .unwrap_or_else(|err| panic!("fixture User declaration: {err}"));
    builder
        .build()
        .unwrap_or_else(|err| panic!("fixture User build: {err}"))
}

/// A set of un-namespaced keywords.
pub fn symbols(names: &[&str]) -> ValueSet {
    names
        .iter()
        .map(|name| Value::Keyword(Keyword::new(*name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use factmodel::{EntityId, Fact};

    #[test]
    fn test_fixture_types() {
        let fixture = TestFixture::new();

        assert_eq!(fixture.mouse.prefix(), "mouse");
        assert_eq!(fixture.user.prefix(), "person.user");
        assert_eq!(fixture.session.schema(&[&fixture.mouse, &fixture.user]).len(), 5);
    }

    #[test]
    fn test_fixture_instances_are_clean() {
        let fixture = TestFixture::new();

        let jerry = fixture.mouse("Jerry", &["fast"]);
        assert!(!jerry.is_changed());
        assert!(jerry.is_new_record());

        let admin = fixture.user("admin@example.com");
        assert_eq!(admin.get("roles"), Some(&Value::Set(symbols(&["member"]))));
    }

    #[test]
    fn test_stored_mouse() {
        let fixture = TestFixture::new();
        let tom = fixture.stored_mouse(17592186045418, "Tom", &[]);

        assert_eq!(tom.id(), Some(EntityId(17592186045418)));
        assert!(!tom.is_changed());
        assert_eq!(
            fixture.session.retract(&[&tom]).unwrap(),
            vec![Fact::RetractEntity(EntityId(17592186045418))]
        );
    }

    #[test]
    fn test_starting_at() {
        let fixture = TestFixture::starting_at(-1);
        let a = fixture.mouse("a", &[]);
        let b = fixture.user("b@example.com");

        assert_eq!(a.temporary_reference(), -1);
        assert_eq!(b.temporary_reference(), -2);
    }
}
