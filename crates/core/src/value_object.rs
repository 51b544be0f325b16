//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two values with the same attributes are
/// interchangeable. In this workspace the stock item key `(code, type)` and the
/// derived balance records are value objects, while stock events are entities.
///
/// ```ignore
/// let a = ItemKey::new("A-100", "Acrylic 5mm");
/// let b = ItemKey::new("A-100", "Acrylic 5mm");
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
