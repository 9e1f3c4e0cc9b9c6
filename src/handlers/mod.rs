pub mod protected;
pub mod public;

use serde_json::{json, Value};

/// Framework-style structured status payloads. The mobile client treats
/// these as ordinary 200 responses and keys off the `status` field, so they
/// ride inside the success envelope rather than becoming HTTP errors.
pub(crate) fn status_error(message: impl Into<String>) -> Value {
    json!({ "status": "error", "message": message.into() })
}

pub(crate) fn status_message(message: impl Into<String>) -> Value {
    json!({ "message": message.into() })
}
