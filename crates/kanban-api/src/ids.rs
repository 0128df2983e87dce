//! Type-safe wrappers for the numeric ids used by the REST API
//!
//! The backend identifies every resource by an integer. Wrapping each kind in
//! its own newtype keeps a list id from ever being sent where a card id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying integer
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::new(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a board
    BoardId
);
numeric_id!(
    /// Identifier of a list (column) on a board
    ListId
);
numeric_id!(
    /// Identifier of a card inside a list
    CardId
);
numeric_id!(
    /// Identifier of a registered user
    UserId
);
