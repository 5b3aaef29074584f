#[cfg(test)]
mod tests {
    use crate::shutdown::{ShutdownSignal, run_until_shutdown};
    use std::{future, time::Duration};
    use tokio::{sync::oneshot, time};

    #[tokio::test]
    async fn completes_when_future_finishes_first() {
        let future = async {
            time::sleep(Duration::from_millis(10)).await;
            "completed"
        };

        let result = run_until_shutdown(future, future::pending()).await;
        assert_eq!(result, Some("completed"));
    }

    #[tokio::test]
    async fn returns_none_when_shutdown_fires() {
        let (tx, rx) = oneshot::channel::<()>();
        let shutdown = async move {
            let _ = rx.await;
        };

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(());
        });

        let result = run_until_shutdown(future::pending::<()>(), shutdown).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn signal_handlers_install() {
        let shutdown = ShutdownSignal::new().unwrap();
        let result = run_until_shutdown(async { 1 }, shutdown).await;
        assert_eq!(result, Some(1));
    }
}
