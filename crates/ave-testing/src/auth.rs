//! Mock identity for integration tests.
//!
//! Services behind the gateway receive an `x-ave-user-id` header injected by
//! the gateway. In tests, `MockAuth` produces that header directly.

use http::{HeaderName, HeaderValue};

use ave_auth_types::identity::USER_ID_HEADER;

/// Acting user injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
}

impl MockAuth {
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }

    /// The header pair as the gateway would inject it.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from(self.user_id),
        )
    }
}
