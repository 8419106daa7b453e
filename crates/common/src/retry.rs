use std::time::Duration;

/// Retry a fallible operation with exponential backoff.
///
/// `base_delay_ms` doubles on each failed attempt; `operation_name` is used
/// for log messages only.
pub fn retry_with_backoff<F, T, E>(
    mut f: F,
    max_retries: u32,
    base_delay_ms: u64,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
{
    for attempt in 0..max_retries {
        match f() {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt < max_retries - 1 {
                    let delay_ms = base_delay_ms * 2_u64.pow(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation_name,
                        attempt + 1,
                        max_retries,
                        e,
                        delay_ms
                    );
                    std::thread::sleep(Duration::from_millis(delay_ms));
                } else {
                    tracing::error!(
                        "{} failed after {} attempts: {}",
                        operation_name,
                        max_retries,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }
    unreachable!()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_after_transient_failures() {
        let mut attempts = 0;
        let result: Result<u32, &str> = retry_with_backoff(
            || {
                attempts += 1;
                if attempts < 3 { Err("not yet") } else { Ok(42) }
            },
            5,
            1,
            "test op",
        );
        assert_eq!(result, Ok(42));
        assert_eq!(attempts, 3);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let mut attempts = 0;
        let result: Result<u32, &str> = retry_with_backoff(
            || {
                attempts += 1;
                Err("never")
            },
            3,
            1,
            "test op",
        );
        assert_eq!(result, Err("never"));
        assert_eq!(attempts, 3);
    }
}
