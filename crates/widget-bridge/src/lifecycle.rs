//! One-shot lifecycle events with cancellable subscriptions.
//!
//! A model fires its destroy event exactly once; views subscribe so that the
//! model's destruction removes them. The subscription is a weak link: dropping
//! the [`Subscription`] guard cancels the hook, so a view discarded early
//! never leaves a dangling reaction behind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Hook = Box<dyn FnOnce() + Send>;
type HookTable = Mutex<HashMap<u64, Hook>>;

/// An event that fires at most once, running all registered hooks.
pub struct LifecycleEvent {
    hooks: Arc<HookTable>,
    next_id: AtomicU64,
    fired: AtomicBool,
}

/// Guard for a registered hook. Dropping it cancels the hook if the event
/// has not fired yet.
pub struct Subscription {
    hooks: Weak<HookTable>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hooks) = self.hooks.upgrade() {
            hooks.lock().unwrap().remove(&self.id);
        }
    }
}

impl LifecycleEvent {
    pub fn new() -> Self {
        LifecycleEvent {
            hooks: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            fired: AtomicBool::new(false),
        }
    }

    /// Register a hook to run when the event fires.
    ///
    /// If the event has already fired, the hook runs immediately: a view
    /// whose creation completes after its model was destroyed must still
    /// tear down rather than linger.
    pub fn subscribe(&self, hook: impl FnOnce() + Send + 'static) -> Subscription {
        {
            let mut hooks = self.hooks.lock().unwrap();
            if !self.fired.load(Ordering::SeqCst) {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                hooks.insert(id, Box::new(hook));
                return Subscription {
                    hooks: Arc::downgrade(&self.hooks),
                    id,
                };
            }
        }
        hook();
        Subscription {
            hooks: Weak::new(),
            id: 0,
        }
    }

    /// Fire the event, running all hooks in registration order. Subsequent
    /// calls are no-ops.
    ///
    /// Hooks run after the table lock is released, so a hook may freely drop
    /// other subscriptions or fire further events.
    pub fn fire(&self) {
        let mut drained: Vec<(u64, Hook)> = {
            let mut hooks = self.hooks.lock().unwrap();
            if self.fired.swap(true, Ordering::SeqCst) {
                return;
            }
            hooks.drain().collect()
        };
        drained.sort_by_key(|(id, _)| *id);
        for (_, hook) in drained {
            hook();
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

impl Default for LifecycleEvent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_fire_runs_hooks_once() {
        let event = LifecycleEvent::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let _sub = event.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        event.fire();
        event.fire();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(event.has_fired());
    }

    #[test]
    fn test_dropping_subscription_cancels_hook() {
        let event = LifecycleEvent::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let sub = event.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(sub);

        event.fire();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscribe_after_fire_runs_immediately() {
        let event = LifecycleEvent::new();
        event.fire();

        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _sub = event.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hooks_run_in_subscription_order() {
        let event = LifecycleEvent::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..5)
            .map(|i| {
                let order = order.clone();
                event.subscribe(move || order.lock().unwrap().push(i))
            })
            .collect();

        event.fire();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        drop(subs);
    }

    #[test]
    fn test_hook_may_drop_other_subscriptions() {
        let event = Arc::new(LifecycleEvent::new());
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let sub_a = event.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // A hook that drops another subscription while the event fires.
        let holder = Arc::new(Mutex::new(Some(sub_a)));
        let h = holder.clone();
        let _sub_b = event.subscribe(move || {
            h.lock().unwrap().take();
        });

        event.fire();
        // sub_a was drained before sub_b ran, so it still fires; the late
        // drop of its guard is a no-op and nothing deadlocks.
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
