//! Graceful shutdown trigger

use std::future::Future;
use std::io;

/// Resolve once `signal` fires
///
/// If the signal cannot be installed the error is logged and this never
/// resolves, so the server keeps running instead of stopping at startup.
pub async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_resolves_on_signal() {
        let fired = async { Ok::<(), io::Error>(()) };
        let done = timeout(Duration::from_millis(200), wait_for_shutdown(fired)).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_failed_listener_keeps_serving() {
        let broken = async { Err::<(), _>(io::Error::other("no signal driver")) };
        let done = timeout(Duration::from_millis(100), wait_for_shutdown(broken)).await;
        assert!(done.is_err());
    }
}
