use serde::{Deserialize, Serialize};

use crate::domain::types::UserId;

/// Identity of the caller as established by the external auth service.
///
/// The matching core only needs the user id; credentials and sessions are
/// handled elsewhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
