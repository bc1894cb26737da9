//! Bounded retry with fixed backoff.
//!
//! A step gets `max_retries + 1` attempts. Failed attempts are discarded;
//! only the final attempt's outcome is reported. The backoff magnitude is
//! policy, not correctness — no property depends on its exact value.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::context::Context;
use crate::steps::{StepDescriptor, StepExecution};

/// Retry behavior applied to every step in a run.
///
/// A step descriptor can override `max_retries` for itself; the backoff is
/// shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries and never sleeps.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

/// Execute a step against the context, retrying per policy.
///
/// Never panics and never propagates an error: the outcome, completed or
/// failed after exhausted retries, is encoded in the returned
/// [`StepExecution`].
pub fn execute_with_retry(
    step: &StepDescriptor,
    ctx: &Context,
    policy: &RetryPolicy,
) -> StepExecution {
    let max_retries = step.retries_override().unwrap_or(policy.max_retries);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let start = Instant::now();

        match step.execute(ctx) {
            Ok(data) => {
                return StepExecution::completed(step.name(), data, start.elapsed());
            }
            Err(err) => {
                if attempt > max_retries {
                    return StepExecution::failed(step.name(), start.elapsed(), err.to_string());
                }
                debug!(
                    "Step '{}' attempt {} failed: {}; retrying",
                    step.name(),
                    attempt,
                    err
                );
                thread::sleep(policy.backoff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanopyError;
    use crate::steps::StepStatus;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    fn failing_step(name: &'static str, attempts: Arc<AtomicUsize>) -> StepDescriptor {
        StepDescriptor::new(name, move |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(CanopyError::StepFailed {
                step: name.to_string(),
                message: "always fails".into(),
            })
        })
    }

    #[test]
    fn success_on_first_attempt_stops_retrying() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let step = StepDescriptor::new("sourcing", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"analysis": []}))
        });

        let exec = execute_with_retry(&step, &Context::new(), &fast_policy(2));
        assert_eq!(exec.status, StepStatus::Completed);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attempts_never_exceed_max_retries_plus_one() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let step = failing_step("logistics", Arc::clone(&attempts));

        let exec = execute_with_retry(&step, &Context::new(), &fast_policy(2));
        assert_eq!(exec.status, StepStatus::Failed);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn descriptor_override_beats_policy_default() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let step = failing_step("inventory", Arc::clone(&attempts)).max_retries(0);

        execute_with_retry(&step, &Context::new(), &fast_policy(5));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_failure_recovers_on_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let step = StepDescriptor::new("carbon_accounting", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CanopyError::StepFailed {
                    step: "carbon_accounting".into(),
                    message: "transient".into(),
                })
            } else {
                Ok(json!({"total_carbon_footprint_tons": 12.5}))
            }
        });

        let exec = execute_with_retry(&step, &Context::new(), &fast_policy(2));
        assert_eq!(exec.status, StepStatus::Completed);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(exec.error.is_none());
    }

    #[test]
    fn failed_execution_carries_last_error_description() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let step = failing_step("sourcing", attempts);

        let exec = execute_with_retry(&step, &Context::new(), &fast_policy(1));
        let message = exec.error.unwrap();
        assert!(message.contains("sourcing"));
        assert!(message.contains("always fails"));
    }

    #[test]
    fn default_policy_is_two_retries_with_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.backoff, Duration::from_millis(500));
    }
}
