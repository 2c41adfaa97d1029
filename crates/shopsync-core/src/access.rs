// ── Navigation admission ──
//
// The decision half of route guarding. The navigation layer asks before
// entering a protected view and handles the redirect itself; all this
// module does is read the session predicates.

use crate::store::SessionState;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Proceed to the requested view.
    Granted,
    /// No session: send the user to login, remembering the target.
    RequiresLogin,
    /// Authenticated but lacking the required role: send elsewhere.
    Forbidden,
}

/// Admission for views that only need a session.
pub fn admit_authenticated(session: &SessionState) -> Admission {
    if session.is_authenticated() {
        Admission::Granted
    } else {
        Admission::RequiresLogin
    }
}

/// Admission for the administration panel.
pub fn admit_admin(session: &SessionState) -> Admission {
    if !session.is_authenticated() {
        Admission::RequiresLogin
    } else if session.is_admin() {
        Admission::Granted
    } else {
        Admission::Forbidden
    }
}
