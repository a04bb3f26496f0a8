use tracing::trace;
use super::channel::Tx;
use super::deferred::{Deferred, Handler, Outcome, Resolver};
use super::error::contain;

pub(crate) enum Reaction {
    Then {
        on_fulfilled: Option<Handler>,
        on_rejected:  Option<Handler>,
        derived:      Resolver,
    },
    Adopt(Deferred),
    Notify(Tx),
}

impl Reaction {
    /// Runs on the task queue once the receiver has settled with `outcome`.
    pub(crate) fn run(self, outcome: Outcome) {
        match self {
            Reaction::Then { on_fulfilled, on_rejected, derived } => {
                let handler = match outcome {
                    Ok(_)  => on_fulfilled,
                    Err(_) => on_rejected,
                };

                trace!(fulfilled = outcome.is_ok(), handled = handler.is_some(), "dispatch");

                match (handler, outcome) {
                    (Some(handler), Ok(payload) | Err(payload)) => {
                        match contain(move || handler(payload)) {
                            Ok(value)   => derived.fulfill(value),
                            Err(reason) => derived.reject(reason),
                        }
                    }
                    (None, Ok(value))   => derived.fulfill(value),
                    (None, Err(reason)) => derived.reject(reason),
                }
            }
            Reaction::Adopt(owner) => owner.settle(outcome),
            Reaction::Notify(tx)   => tx.send(outcome),
        }
    }
}
