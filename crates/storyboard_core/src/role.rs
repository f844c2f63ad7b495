//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message.
///
/// # Examples
///
/// ```
/// use storyboard_core::Role;
///
/// assert_ne!(Role::User, Role::System);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System instructions (style rules, output contract)
    System,
    /// The creative brief or screenplay supplied by the user
    User,
}
