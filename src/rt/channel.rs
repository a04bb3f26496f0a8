#[cfg(not(feature = "tokio"))]
use crossbeam_channel::{unbounded as channel, Sender, Receiver};
#[cfg(feature = "tokio")]
use std::{future::Future, pin::Pin, task::{Context, Poll}};
use anyhow::{anyhow, Error, Result};
#[cfg(feature = "tokio")]
use tokio::sync::oneshot::{channel, Sender, Receiver};
use super::deferred::Outcome;

pub(crate) struct Tx(Sender<Outcome>);

/// Receives the outcome of a deferred value once it settles.
///
/// The outcome is delivered through the value's task queue, so waiting
/// on a `Queue` the current thread is supposed to pump never returns.
/// Wait on values scheduled on a `Machine` instead.
pub struct Rx(Receiver<Outcome>);

pub(crate) fn oneshot() -> (Tx, Rx) {
    let (tx, rx) = channel();
    (Tx(tx), Rx(rx))
}

impl Tx {
    pub(crate) fn send(self, outcome: Outcome) {
        match self.0.send(outcome) {
            Ok(()) => (),
            Err(_) => (),
        }
    }
}

#[cfg(not(feature = "tokio"))]
impl Rx {
    pub fn recv(self) -> Result<Outcome> {
        self.0.recv().map_err(|_| dropped())
    }
}

#[cfg(feature = "tokio")]
impl Rx {
    pub fn recv(self) -> Result<Outcome> {
        self.0.blocking_recv().map_err(|_| dropped())
    }
}

#[cfg(feature = "tokio")]
impl Future for Rx {
    type Output = Result<Outcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(r))  => Poll::Ready(Ok(r)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(dropped())),
            Poll::Pending       => Poll::Pending,
        }
    }
}

fn dropped() -> Error {
    anyhow!("deferred value dropped while pending")
}
