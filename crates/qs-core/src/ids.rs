//! Identifiers for agents, nodes, links and activity types.
//!
//! Ids are dense indices assigned in insertion order, so they double as
//! positions in the SoA vectors of `Network` and `AgentRuntime`.  Their
//! `Ord` is load-bearing: nodes, links and departure backlogs are always
//! visited in ascending id, which is what makes event streams reproducible.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident($inner:ty), $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl $name {
            /// Placeholder for "not assigned"; never produced by a builder.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            /// The first `count` ids, ascending.
            ///
            /// `count` is a collection length, so it always fits the inner type.
            pub fn all(count: usize) -> impl Iterator<Item = $name> {
                (0..count).map(|i| $name(i as $inner))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " {}"), self.0)
                } else {
                    f.write_str(concat!($label, " <none>"))
                }
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<$name, Self::Error> {
                Ok($name(<$inner>::try_from(n)?))
            }
        }
    };
}

typed_id! {
    /// An agent, and the single vehicle it drives.
    AgentId(u32), "agent"
}

typed_id! {
    NodeId(u32), "node"
}

typed_id! {
    /// A directed link.
    LinkId(u32), "link"
}

typed_id! {
    /// Application-defined activity type ("home", "work", …).
    ActivityId(u16), "activity"
}
