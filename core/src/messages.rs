//! Common error messages used across Tether components.
//!
//! These constants keep validation wording consistent between the plan
//! builder and the session facade.

/// Error: nested input must be a JSON object.
pub const ERR_INPUT_NOT_OBJECT: &str = "Expected an object";

/// Error: list-valued slot received something other than an object or array.
pub const ERR_INPUT_NOT_LIST: &str = "Expected an object or a list of objects";

/// Error: a single-valued slot received more than one exclusive operation.
pub const ERR_CONFLICTING_OPERATIONS: &str =
    "Only one of create, connect or update may be supplied for a single-valued relationship";

/// Error: a key lookup was supplied without every key attribute.
pub const ERR_INCOMPLETE_KEY: &str = "Key lookup is missing one or more key attributes";

/// Error: a node identifier was not a string.
pub const ERR_NODE_ID_NOT_STRING: &str = "Node identifier must be a string";

/// Error: an update was requested with nothing to change and no nested input.
pub const ERR_EMPTY_PATCH: &str = "Patch must be an object";
