//! Opaque caller identity.
//!
//! Connectors that cache remote metadata scope their caches by the identity
//! of the caller. The execution layer never interprets it: it is created by
//! the surrounding system and only compared, hashed and passed along.

use std::fmt;
use std::sync::Arc;

/// Value-equality key naming the caller a page source is opened for.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Identity {
    username: Option<Arc<str>>,
}

impl Identity {
    /// The anonymous identity, shared by callers that are not scoped by user.
    pub const fn none() -> Self {
        Self { username: None }
    }

    pub fn for_user(username: impl Into<Arc<str>>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.username.is_none()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .finish()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(user) => write!(f, "Identity(user={user})"),
            None => f.write_str("Identity(none)"),
        }
    }
}
