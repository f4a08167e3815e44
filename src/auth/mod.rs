//! Session lifecycle: initial check, login, logout and the redirect policy.

mod manager;


pub use manager::{AuthManager, LoginOutcome};
