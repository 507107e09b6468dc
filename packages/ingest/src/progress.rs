//! Progress reporting trait for multi-file loads.
//!
//! Decouples the batch loader from any rendering backend. The CLI supplies
//! an `indicatif` implementation; tests and library callers use
//! [`NullProgress`].

/// Receives progress updates while a batch of files is loaded.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of files in the batch.
    fn set_total(&self, total: u64);

    /// Advance by `delta` files.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the batch as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
