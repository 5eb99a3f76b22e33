/// State management module
///
/// This module holds everything the user has chosen during a session:
/// - Shared data structures (data.rs)
/// - The session state machine (session.rs)
/// - User-facing notifications (notify.rs)

pub mod data;
pub mod notify;
pub mod session;
