//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two instances
/// with the same attribute values are the same value. The forecast core deals
/// almost exclusively in value objects: observations, stock snapshots and
/// forecast results have no identity of their own; only their numbers matter.
///
/// To "modify" a value object, build a new one. That keeps them safe to share
/// across threads and trivially cacheable.
///
/// Required bounds:
/// - **Clone**: values are cheap to copy around.
/// - **PartialEq**: compared attribute-by-attribute.
/// - **Debug**: printable in logs and test failures.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
