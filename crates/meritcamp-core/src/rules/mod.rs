//! Business rules enforced by the registration engine.
//!
//! Every function here is pure: callers gather the relevant counts and
//! records, and the rule decides. Violations are reported as
//! [`Error::BadRequest`](crate::Error::BadRequest) or
//! [`Error::Unauthorized`](crate::Error::Unauthorized).

pub mod access;
pub mod capacity;
pub mod completion;
pub mod eligibility;
pub mod periods;

pub use access::Caller;
pub use capacity::{DEFAULT_CLASS_SIZE, MAX_QUANTITY};
