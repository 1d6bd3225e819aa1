use std::time::Duration;

/// Poll `condition` every 10ms until it holds, panicking after `attempts`.
pub async fn wait_until<F>(what: &str, attempts: usize, mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..attempts {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
