//! Before / original / after sequencing
//!
//! ```text
//! bookended:   before? -> original (unless ignored) -> after?
//! early-out:   before? -> [stop if policy triggers] -> original (unless ignored) -> after?
//! ```
//!
//! `env` carries everything the hooks and the original mutate (the hook
//! context plus any in/out arguments), so the two closures never hold
//! overlapping borrows.

use super::policy::{EarlyOut, HookOutput};

/// Run a bookended operation
pub fn run_bookended<E, H: Copy>(
    env: &mut E,
    before: Option<H>,
    after: Option<H>,
    ignore_original: bool,
    mut bookend: impl FnMut(&mut E, H),
    original: impl FnOnce(&mut E),
) {
    if let Some(hook) = before {
        bookend(env, hook);
    }
    if !ignore_original {
        original(env);
    }
    if let Some(hook) = after {
        bookend(env, hook);
    }
}

/// Run an operation whose result may stop it after `before`
///
/// `original` receives the result so far and returns the new one, so a
/// family can either replace or accumulate.
pub fn run_early_out<E, H: Copy, R: HookOutput>(
    env: &mut E,
    before: Option<H>,
    after: Option<H>,
    ignore_original: bool,
    policy: EarlyOut,
    initial: R,
    mut bookend: impl FnMut(&mut E, H, &mut R),
    original: impl FnOnce(&mut E, R) -> R,
) -> R {
    let mut result = initial;

    if let Some(hook) = before {
        bookend(env, hook, &mut result);
        if policy.triggers(&result) {
            tracing::trace!("Early out after before hook ({:?})", policy);
            return result;
        }
    }
    if !ignore_original {
        result = original(env, result);
    }
    if let Some(hook) = after {
        bookend(env, hook, &mut result);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
    }

    fn before(log: &mut Log, result: &mut bool) {
        log.calls.push("before");
        *result = true;
    }

    fn after(log: &mut Log, _: &mut bool) {
        log.calls.push("after");
    }

    fn bookend(log: &mut Log) {
        log.calls.push("bookend");
    }

    #[test]
    fn test_early_out_skips_original_and_after() {
        let mut log = Log::default();
        let result = run_early_out(
            &mut log,
            Some(before as fn(&mut Log, &mut bool)),
            Some(after as fn(&mut Log, &mut bool)),
            false,
            EarlyOut::IfNonZero,
            false,
            |log, hook, result| hook(log, result),
            |log, _| {
                log.calls.push("original");
                false
            },
        );
        assert!(result);
        assert_eq!(log.calls, vec!["before"]);
    }

    #[test]
    fn test_no_trigger_runs_everything() {
        let mut log = Log::default();
        let result = run_early_out(
            &mut log,
            Some(before as fn(&mut Log, &mut bool)),
            Some(after as fn(&mut Log, &mut bool)),
            false,
            EarlyOut::IfZero,
            false,
            |log, hook, result| hook(log, result),
            |log, _| {
                log.calls.push("original");
                false
            },
        );
        assert!(!result);
        assert_eq!(log.calls, vec!["before", "original", "after"]);
    }

    #[test]
    fn test_ignore_original_keeps_bookends() {
        let mut log = Log::default();
        run_bookended(
            &mut log,
            Some(bookend as fn(&mut Log)),
            Some(bookend as fn(&mut Log)),
            true,
            |log, hook| hook(log),
            |log| log.calls.push("original"),
        );
        assert_eq!(log.calls, vec!["bookend", "bookend"]);
    }

    #[test]
    fn test_accumulating_original() {
        fn push_one(_: &mut (), result: &mut i32) {
            *result += 1;
        }
        let total = run_early_out(
            &mut (),
            Some(push_one as fn(&mut (), &mut i32)),
            None,
            false,
            EarlyOut::Never,
            0,
            |env, hook, result| hook(env, result),
            |_, so_far| so_far + 2,
        );
        assert_eq!(total, 3);
    }
}
