//! Strongly typed identifiers for named model entities.
use std::borrow::Borrow;
use std::fmt::Display;

/// An entity which is identified by a unique ID
pub trait HasID<T: IDLike> {
    /// Get the entity's ID
    fn get_id(&self) -> &T;
}

/// A type which can be used as an ID
pub trait IDLike: Eq + std::hash::Hash + Borrow<str> + Clone + Display {}

/// Define a new ID type, wrapping a reference-counted string
macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, serde::Deserialize, serde::Serialize,
        )]
        #[serde(transparent)]
        /// An ID type (e.g. `CommodityID`, `ProcessID`, etc.)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }

            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl $crate::id::IDLike for $name {}
    };
}
pub(crate) use define_id_type;

/// Implement the `HasID` trait for the given type, assuming it has a field called `id`
macro_rules! define_id_getter {
    ($t:ty, $id_ty:ty) => {
        impl $crate::id::HasID<$id_ty> for $t {
            fn get_id(&self) -> &$id_ty {
                &self.id
            }
        }
    };
}
pub(crate) use define_id_getter;

define_id_type! {RegionID}
