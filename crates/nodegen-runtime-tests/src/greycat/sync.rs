use std::{
    any::Any,
    fmt,
    sync::{Arc, Condvar, Mutex, PoisonError},
};

type Continuation = Box<dyn FnOnce() + Send>;

///
/// Counter
/// Runs a continuation once `count` has been called the expected number of
/// times.
///

#[derive(Clone)]
pub struct Counter {
    state: Arc<Mutex<CounterState>>,
}

struct CounterState {
    remaining: usize,
    then: Option<Continuation>,
}

impl Counter {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CounterState {
                remaining: expected,
                then: None,
            })),
        }
    }

    pub fn count(&self) {
        let ready = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.remaining = state.remaining.saturating_sub(1);
            if state.remaining == 0 {
                state.then.take()
            } else {
                None
            }
        };

        if let Some(then) = ready {
            then();
        }
    }

    /// Runs `then` now when nothing is pending.
    pub fn then<F: FnOnce() + Send + 'static>(&self, then: F) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.remaining > 0 {
                state.then = Some(Box::new(then));
                return;
            }
        }

        then();
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Counter")
            .field("remaining", &state.remaining)
            .finish_non_exhaustive()
    }
}

///
/// SyncCounter
/// Blocking counterpart of [`Counter`] that can carry one result back to the
/// waiting thread.
///

#[derive(Clone)]
pub struct SyncCounter {
    shared: Arc<(Mutex<SyncState>, Condvar)>,
}

struct SyncState {
    remaining: usize,
    result: Option<Box<dyn Any + Send>>,
}

impl SyncCounter {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            shared: Arc::new((
                Mutex::new(SyncState {
                    remaining: expected,
                    result: None,
                }),
                Condvar::new(),
            )),
        }
    }

    pub fn count(&self) {
        let (lock, ready) = &*self.shared;
        let mut state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        state.remaining = state.remaining.saturating_sub(1);
        if state.remaining == 0 {
            ready.notify_all();
        }
    }

    /// Store `value` for [`Self::wait_result`], then count down.
    pub fn wrap<T: Send + 'static>(&self, value: Option<T>) {
        {
            let (lock, _) = &*self.shared;
            let mut state = lock.lock().unwrap_or_else(PoisonError::into_inner);
            state.result = value.map(|v| Box::new(v) as Box<dyn Any + Send>);
        }

        self.count();
    }

    pub fn wait(&self) {
        let (lock, ready) = &*self.shared;
        let state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        drop(
            ready
                .wait_while(state, |state| state.remaining > 0)
                .unwrap_or_else(PoisonError::into_inner),
        );
    }

    #[must_use]
    pub fn wait_result<T: 'static>(&self) -> Option<T> {
        let (lock, ready) = &*self.shared;
        let state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = ready
            .wait_while(state, |state| state.remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);

        state
            .result
            .take()
            .and_then(|result| result.downcast::<T>().ok())
            .map(|result| *result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn continuation_waits_for_every_count() {
        let counter = Counter::new(2);
        let done = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&done);
        counter.then(move || flag.store(true, Ordering::SeqCst));
        counter.count();
        assert!(!done.load(Ordering::SeqCst));

        counter.count();
        assert!(done.load(Ordering::SeqCst));
    }

    #[test]
    fn wrapped_value_is_handed_to_the_waiter() {
        let gate = SyncCounter::new(1);
        let waiter = gate.clone();

        std::thread::spawn(move || waiter.wrap(Some(7_i64)));

        assert_eq!(gate.wait_result::<i64>(), Some(7));
    }
}
