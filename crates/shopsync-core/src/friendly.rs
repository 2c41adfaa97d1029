// ── Error translation ──
//
// Pure mapping from a transport failure to the message a UI shows.
// Deterministic and side-effect-free; the stores call this at every
// command failure, so every wording lives in exactly one place.

use shopsync_api::{Error, ServerMessage};

/// Separator used when the server reports several validation failures.
const LIST_SEPARATOR: &str = " • ";

/// Translate an API failure into a human-readable message.
///
/// Priority order: connectivity, then the well-known HTTP statuses, then
/// whatever detail the server supplied, then a generic fallback. Never
/// returns an empty string.
pub fn friendly_error(err: &Error) -> String {
    if err.is_connectivity() {
        return "Could not reach the API. Check that the backend is running.".into();
    }

    match err.status() {
        Some(401) => "Your session is invalid or has expired. Please sign in again.".into(),
        Some(403) => "You do not have permission to perform this action.".into(),
        Some(404) => "The requested resource was not found.".into(),
        Some(409) => err
            .server_message()
            .map_or_else(
                || "Conflict: the operation could not be completed.".into(),
                |m| m.join(LIST_SEPARATOR),
            ),
        Some(400) => err
            .server_message()
            .map_or_else(|| "Invalid request.".into(), |m| m.join(LIST_SEPARATOR)),
        _ => err
            .server_message()
            .map_or_else(
                || "An unexpected error occurred.".into(),
                |m| m.join(LIST_SEPARATOR),
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_err(status: u16, message: Option<ServerMessage>) -> Error {
        Error::Api { status, message }
    }

    #[test]
    fn not_found_uses_fixed_message() {
        let msg = friendly_error(&api_err(404, None));
        assert_eq!(msg, "The requested resource was not found.");
    }

    #[test]
    fn unauthorized_asks_to_sign_in() {
        let msg = friendly_error(&api_err(401, None));
        assert!(msg.contains("sign in"));
    }

    #[test]
    fn forbidden_mentions_permission() {
        let msg = friendly_error(&api_err(403, None));
        assert!(msg.contains("permission"));
    }

    #[test]
    fn conflict_prefers_server_detail() {
        let msg = friendly_error(&api_err(
            409,
            Some(ServerMessage::Text("insufficient stock".into())),
        ));
        assert_eq!(msg, "insufficient stock");
    }

    #[test]
    fn conflict_without_detail_falls_back() {
        let msg = friendly_error(&api_err(409, None));
        assert_eq!(msg, "Conflict: the operation could not be completed.");
    }

    #[test]
    fn validation_list_is_joined_with_bullets() {
        let msg = friendly_error(&api_err(
            400,
            Some(ServerMessage::List(vec!["a".into(), "b".into()])),
        ));
        assert_eq!(msg, "a • b");
    }

    #[test]
    fn validation_without_detail_falls_back() {
        let msg = friendly_error(&api_err(400, None));
        assert_eq!(msg, "Invalid request.");
    }

    #[test]
    fn unknown_status_uses_server_text_when_present() {
        let msg = friendly_error(&api_err(
            503,
            Some(ServerMessage::Text("maintenance window".into())),
        ));
        assert_eq!(msg, "maintenance window");
    }

    #[test]
    fn unknown_status_without_detail_is_generic() {
        let msg = friendly_error(&api_err(500, None));
        assert_eq!(msg, "An unexpected error occurred.");
    }

    #[test]
    fn deserialization_failure_is_never_swallowed() {
        let err = Error::Deserialization {
            message: "bad body".into(),
            body: String::new(),
        };
        assert_eq!(friendly_error(&err), "An unexpected error occurred.");
    }
}
