use crate::rt::{Function, Object, Value};

/// A foreign thenable: an object whose `then` member is a callable built
/// from a closure. The closure receives the resolve and reject callables
/// handed to `then`, and an `Err` from it is a throwing `then`.
pub struct Thenable {
    then: Value,
}

impl Thenable {
    pub fn new<F>(then: F) -> Self
    where
        F: Fn(Value, Value) -> Result<(), Value> + Send + Sync + 'static,
    {
        let then = Function::new(move |_, args| {
            let mut args = args.into_iter();
            let resolve  = args.next().unwrap_or_default();
            let reject   = args.next().unwrap_or_default();
            then(resolve, reject)?;
            Ok(Value::Undefined)
        });
        Self { then: Value::object(then) }
    }

    /// A thenable that resolves with `value` as soon as `then` is called.
    pub fn resolving(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move |resolve, _| {
            resolve.call(Value::Undefined, vec![value.clone()])?;
            Ok(())
        })
    }

    /// A thenable whose `then` fails with `reason`.
    pub fn throwing(reason: impl Into<Value>) -> Self {
        let reason = reason.into();
        Self::new(move |_, _| Err(reason.clone()))
    }
}

impl Object for Thenable {
    fn get(&self, key: &str) -> Result<Value, Value> {
        match key {
            "then" => Ok(self.then.clone()),
            _      => Ok(Value::Undefined),
        }
    }
}

impl From<Thenable> for Value {
    fn from(thenable: Thenable) -> Self {
        Value::object(thenable)
    }
}
