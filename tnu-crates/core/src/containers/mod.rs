//! Contains the containers which are used by the checkers.
mod keyed_vec;
mod min_priority_queue;

use fnv::FnvBuildHasher;
pub use keyed_vec::*;
pub(crate) use min_priority_queue::*;

/// [`std::collections::HashMap`] that defaults to a deterministic hasher.
#[allow(clippy::disallowed_types, reason = "this is how we define our HashMap")]
pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
