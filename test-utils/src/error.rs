use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    /// A mock user lookup configured to fail was called.
    #[error("User lookup for {user_id} failed: {reason}")]
    UserLookup {
        /// The user ID as passed to the lookup
        user_id: String,
        /// Reason configured on the mock
        reason: String,
    },
}
