use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identity of a node. Freshly minted ids look like `n1`, `n2`, ...
    NodeId
);

string_id!(
    /// Identity of an edge. Freshly minted ids look like `e1`, `e2`, ...
    EdgeId
);

// ------------------------------------------------------------------
// Id minting
// ------------------------------------------------------------------

/// Largest suffix `observe` will move a counter to.
const OBSERVE_CEILING: u64 = u64::MAX / 2;

/// Monotonic `<prefix><n>` generator.
///
/// The counter only moves forward, so an id handed out once is never
/// handed out again, even after the graph is restored from an older
/// snapshot.
#[derive(Debug, Clone)]
pub(crate) struct IdCounter {
    prefix: char,
    last: u64,
}

impl IdCounter {
    pub(crate) const fn new(prefix: char) -> Self {
        Self { prefix, last: 0 }
    }

    pub(crate) fn mint(&mut self) -> String {
        self.last += 1;
        format!("{}{}", self.prefix, self.last)
    }

    /// Advance past `id` if it has the shape of an id this counter mints.
    /// Suffixes above [`OBSERVE_CEILING`] are ignored, so minting always
    /// has room left and never wraps onto existing ids.
    pub(crate) fn observe(&mut self, id: &str) {
        if let Some(n) = id
            .strip_prefix(self.prefix)
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|&n| n <= OBSERVE_CEILING)
        {
            self.last = self.last.max(n);
        }
    }
}
