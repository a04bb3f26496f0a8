use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;
use super::channel::{oneshot, Rx};
use super::error::contain;
use super::queue::Handle;
use super::reaction::Reaction;
use super::resolve::resolve;
use super::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Pending,
    Fulfilled,
    Rejected,
}

/// `Ok` carries the fulfillment value, `Err` the rejection reason.
pub type Outcome = Result<Value, Value>;

pub type Handler = Box<dyn FnOnce(Value) -> Result<Value, Value> + Send + 'static>;

/// A value that settles exactly once, fulfilled or rejected.
///
/// Reactions attached with [`then`](Self::then) always run on the task
/// queue behind the value's [`Handle`], never on the caller's stack, even
/// when the value is already settled.
#[derive(Clone)]
pub struct Deferred {
    shared: Arc<Shared>,
}

/// Settles its value with the result of the resolution procedure.
#[derive(Clone)]
pub struct Fulfill(Resolver);

/// Settles its value as rejected. Reasons are never unwrapped.
#[derive(Clone)]
pub struct Reject(Resolver);

struct Shared {
    handle: Handle,
    slot:   Mutex<Slot>,
}

enum Slot {
    Pending(Vec<Reaction>),
    Settled(Outcome),
}

#[derive(Clone)]
pub(crate) struct Resolver {
    deferred: Deferred,
    claimed:  Arc<AtomicBool>,
}

pub fn handler<F>(f: F) -> Option<Handler>
where
    F: FnOnce(Value) -> Result<Value, Value> + Send + 'static,
{
    Some(Box::new(f))
}

impl Deferred {
    /// Runs `initializer` synchronously. An `Err` or a panic from it
    /// rejects the new value unless a capability was already used.
    pub fn new<F>(handle: &Handle, initializer: F) -> Self
    where
        F: FnOnce(Fulfill, Reject) -> Result<(), Value>,
    {
        let (deferred, resolver) = Self::pending(handle);
        let fulfill = Fulfill(resolver.clone());
        let reject  = Reject(resolver.clone());

        if let Err(reason) = contain(move || initializer(fulfill, reject)) {
            resolver.reject(reason);
        }

        deferred
    }

    pub fn resolve(handle: &Handle, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(handle, move |fulfill, _| {
            fulfill.fulfill(value);
            Ok(())
        })
    }

    pub fn reject(handle: &Handle, reason: impl Into<Value>) -> Self {
        let reason = reason.into();
        Self::new(handle, move |_, reject| {
            reject.reject(reason);
            Ok(())
        })
    }

    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Deferred {
        let (derived, resolver) = Self::pending(&self.shared.handle);
        self.react(Reaction::Then {
            on_fulfilled: on_fulfilled,
            on_rejected:  on_rejected,
            derived:      resolver,
        });
        derived
    }

    pub fn catch<F>(&self, on_rejected: F) -> Deferred
    where
        F: FnOnce(Value) -> Result<Value, Value> + Send + 'static,
    {
        self.then(None, handler(on_rejected))
    }

    pub fn settled(&self) -> Rx {
        let (tx, rx) = oneshot();
        self.react(Reaction::Notify(tx));
        rx
    }

    pub fn state(&self) -> State {
        match &*self.lock() {
            Slot::Pending(_)       => State::Pending,
            Slot::Settled(Ok(_))   => State::Fulfilled,
            Slot::Settled(Err(_))  => State::Rejected,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match &*self.lock() {
            Slot::Pending(_)       => None,
            Slot::Settled(outcome) => Some(outcome.clone()),
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.shared.handle
    }

    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn pending(handle: &Handle) -> (Self, Resolver) {
        let shared = Shared {
            handle: handle.clone(),
            slot:   Mutex::new(Slot::Pending(Vec::new())),
        };
        let deferred = Self { shared: Arc::new(shared) };
        let resolver = Resolver::new(deferred.clone());
        (deferred, resolver)
    }

    /// Queues `reaction`, or schedules it right away once settled.
    ///
    /// Scheduling happens under the slot lock so that dispatches of one
    /// value enter the task queue in attachment order. Scheduling only
    /// sends on the queue channel and never runs user code.
    pub(crate) fn react(&self, reaction: Reaction) {
        let mut slot = self.lock();
        match &mut *slot {
            Slot::Pending(reactions) => reactions.push(reaction),
            Slot::Settled(outcome)   => self.dispatch(reaction, outcome.clone()),
        }
    }

    /// Pending -> Fulfilled or Pending -> Rejected. No-op once settled.
    pub(crate) fn settle(&self, outcome: Outcome) {
        let count = {
            let mut slot = self.lock();
            if let Slot::Settled(_) = *slot {
                return;
            }
            let reactions = match mem::replace(&mut *slot, Slot::Settled(outcome.clone())) {
                Slot::Pending(reactions) => reactions,
                Slot::Settled(_)         => Vec::new(),
            };
            let count = reactions.len();
            for reaction in reactions {
                self.dispatch(reaction, outcome.clone());
            }
            count
        };

        trace!(fulfilled = outcome.is_ok(), reactions = count, "settled");
    }

    fn dispatch(&self, reaction: Reaction, outcome: Outcome) {
        self.shared.handle.schedule(move || reaction.run(outcome));
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.shared.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deferred({:?})", self.state())
    }
}

impl Fulfill {
    pub fn fulfill(&self, value: impl Into<Value>) {
        self.0.fulfill(value.into());
    }
}

impl Reject {
    pub fn reject(&self, reason: impl Into<Value>) {
        self.0.reject(reason.into());
    }
}

impl Resolver {
    fn new(deferred: Deferred) -> Self {
        let claimed = Arc::new(AtomicBool::new(false));
        Self { deferred, claimed }
    }

    pub(crate) fn fulfill(&self, value: Value) {
        if self.claim() {
            resolve(&self.deferred, value);
        }
    }

    pub(crate) fn reject(&self, reason: Value) {
        if self.claim() {
            self.deferred.settle(Err(reason));
        }
    }

    // first call of either capability wins
    fn claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::AcqRel)
    }
}
