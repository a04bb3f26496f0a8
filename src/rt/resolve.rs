use tracing::trace;
use super::deferred::Deferred;
use super::error::{contain, TypeError};
use super::object::Function;
use super::reaction::Reaction;
use super::value::Value;

enum Kind {
    Native(Deferred),
    Thenable(Value, Value),
    Plain(Value),
    Failed(Value),
}

/// Drives `owner` toward settlement with `value`.
///
/// A foreign `then` member is read once, here, but invoked asynchronously
/// from a queued task, unlike an initializer passed to `Deferred::new`
/// which runs at once. Adopting a thenable therefore takes one more queue
/// turn than adopting a native value.
///
/// Adoption never recurses on the stack: a native value gets an adoption
/// reaction, and a foreign `then` is called from the queue. A thenable
/// that keeps resolving with itself therefore cycles through the task
/// queue forever instead of overflowing the stack.
pub(crate) fn resolve(owner: &Deferred, value: Value) {
    match classify(owner, value) {
        Kind::Native(inner) => inner.react(Reaction::Adopt(owner.clone())),
        Kind::Thenable(object, then) => {
            let owner = owner.clone();
            let handle = owner.handle().clone();
            handle.schedule(move || adopt(owner, object, then));
        }
        Kind::Plain(value)   => owner.settle(Ok(value)),
        Kind::Failed(reason) => owner.settle(Err(reason)),
    }
}

fn classify(owner: &Deferred, value: Value) -> Kind {
    match value {
        Value::Deferred(inner) if inner.ptr_eq(owner) => {
            Kind::Failed(TypeError::SelfAdoption.into())
        }
        Value::Deferred(inner) => Kind::Native(inner),
        Value::Object(object)  => match contain(|| object.get("then")) {
            Ok(then) if then.is_callable() => Kind::Thenable(Value::Object(object), then),
            Ok(_)                          => Kind::Plain(Value::Object(object)),
            Err(reason)                    => Kind::Failed(reason),
        },
        value => Kind::Plain(value),
    }
}

// The fresh value's settle-once guard absorbs a `then` that fails after
// calling one of its callbacks.
fn adopt(owner: Deferred, object: Value, then: Value) {
    trace!("calling foreign then");

    let fresh = Deferred::new(owner.handle(), move |fulfill, reject| {
        let fulfill = Function::new(move |_, args| {
            fulfill.fulfill(first(args));
            Ok(Value::Undefined)
        });
        let reject = Function::new(move |_, args| {
            reject.reject(first(args));
            Ok(Value::Undefined)
        });

        then.call(object, vec![Value::object(fulfill), Value::object(reject)])?;
        Ok(())
    });

    fresh.react(Reaction::Adopt(owner));
}

fn first(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or_default()
}
