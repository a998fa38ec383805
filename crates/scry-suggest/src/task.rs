//! Task ownership helpers.

use tokio::task::AbortHandle;

/// Aborts a spawned task when dropped.
#[derive(Debug)]
pub struct AbortOnDrop(pub AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
