//! Precondition hooks — predicates that must all hold before the scene is recalled.
//!
//! Hooks are queries: they may look at the outside world (the clock, a
//! calendar, another sensor) but must not block for long, since the engine
//! imposes no timeout on them.

use chrono::{Local, NaiveTime};

use lightson_domain::time::TimeWindow;

/// A predicate deciding whether the lights may come on.
pub trait ShouldTurnOn: Send + Sync {
    fn should_turn_on(&self) -> bool;
}

impl<F> ShouldTurnOn for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_turn_on(&self) -> bool {
        self()
    }
}

/// Ordered, short-circuiting conjunction of [`ShouldTurnOn`] hooks.
///
/// An empty chain always allows activation.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn ShouldTurnOn>>,
}

impl HookChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; hooks run in insertion order.
    #[must_use]
    pub fn with(mut self, hook: impl ShouldTurnOn + 'static) -> Self {
        self.push(hook);
        self
    }

    pub fn push(&mut self, hook: impl ShouldTurnOn + 'static) {
        self.hooks.push(Box::new(hook));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run hooks in order, stopping at the first that returns `false`.
    #[must_use]
    pub fn evaluate(&self) -> bool {
        self.hooks.iter().all(|hook| hook.should_turn_on())
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Allows activation only while local wall-clock time is inside a window.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowHook {
    window: TimeWindow,
}

impl TimeWindowHook {
    #[must_use]
    pub fn new(window: TimeWindow) -> Self {
        Self { window }
    }

    /// Evaluate against an explicit time of day.
    #[must_use]
    pub fn allows(&self, time: NaiveTime) -> bool {
        self.window.contains(time)
    }
}

impl ShouldTurnOn for TimeWindowHook {
    fn should_turn_on(&self) -> bool {
        self.allows(Local::now().time())
    }
}

/// Wrap a fallible check into a hook that treats errors as `false`.
pub fn fail_closed<F, E>(name: &'static str, check: F) -> impl ShouldTurnOn
where
    F: Fn() -> Result<bool, E> + Send + Sync,
    E: std::fmt::Display,
{
    move || match check() {
        Ok(allowed) => allowed,
        Err(err) => {
            tracing::warn!(hook = name, %err, "hook failed, refusing activation");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(result: bool, calls: &Arc<AtomicUsize>) -> impl ShouldTurnOn + 'static {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    #[test]
    fn should_allow_when_chain_is_empty() {
        assert!(HookChain::new().evaluate());
    }

    #[test]
    fn should_allow_when_every_hook_passes() {
        let chain = HookChain::new().with(|| true).with(|| true);
        assert_eq!(chain.len(), 2);
        assert!(chain.evaluate());
    }

    #[test]
    fn should_stop_at_first_failing_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = HookChain::new()
            .with(counting(true, &calls))
            .with(counting(false, &calls))
            .with(counting(true, &calls));

        assert!(!chain.evaluate());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn should_treat_hook_error_as_refusal() {
        let hook = fail_closed("calendar", || Err::<bool, _>("calendar offline"));
        assert!(!hook.should_turn_on());

        let hook = fail_closed("calendar", || Ok::<_, String>(true));
        assert!(hook.should_turn_on());
    }

    #[test]
    fn should_allow_only_inside_time_window() {
        let hook = TimeWindowHook::new(TimeWindow::parse("17:00", "06:00").unwrap());
        assert!(hook.allows(NaiveTime::from_hms_opt(21, 0, 0).unwrap()));
        assert!(hook.allows(NaiveTime::from_hms_opt(5, 59, 0).unwrap()));
        assert!(!hook.allows(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    }
}
