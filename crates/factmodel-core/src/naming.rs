//! Namespace prefix derivation from type names.

use convert_case::{Case, Casing};

/// Derive the attribute namespace prefix for a type name.
///
/// Path segments separated by `::` are converted to lower snake case and
/// joined with `.`: `person::User` becomes `person.user` and `MyMouse`
/// becomes `my_mouse`.
pub fn derive_prefix(type_name: &str) -> String {
    type_name
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join(".")
}
