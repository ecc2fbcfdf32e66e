use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use bigsky_config::RetryConfig;
use bigsky_domain::Error;

/// Runs `operation` until it succeeds, fails with an error that is not
/// [`Error::Retryable`], or the configured attempts are exhausted
pub async fn retry_with_config<F, Fut, T, C>(
    config: &RetryConfig,
    operation: F,
    notify: Option<C>,
) -> anyhow::Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
    C: Fn(&anyhow::Error, Duration) + Send + Sync + 'static,
{
    let mut strategy = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(config.min_delay_ms))
        .with_factor(config.backoff_factor as f32)
        .with_max_times(config.max_retry_attempts)
        .with_jitter();
    if let Some(max_delay) = config.max_delay {
        strategy = strategy.with_max_delay(Duration::from_secs(max_delay));
    }

    let retryable = operation.retry(&strategy).when(should_retry);

    match notify {
        Some(callback) => retryable.notify(callback).await,
        None => retryable.await,
    }
}

/// Only [`Error::Retryable`] triggers another attempt
fn should_retry(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<Error>()
        .is_some_and(|error| matches!(error, Error::Retryable(_)))
}
