use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use super::value::Value;

/// Type-error-class rejection reasons raised by the primitive itself.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("a deferred value cannot adopt its own outcome")]
    SelfAdoption,
    #[error("{0} is not a function")]
    NotCallable(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("panicked: {0}")]
    Panic(String),
}

impl Error {
    /// Builds a panic reason from a payload caught by `catch_unwind` or a
    /// panicked task.
    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        Error::Panic(message(payload))
    }
}

/// Runs user code, turning a panic into an `Error::Panic` reason.
pub(crate) fn contain<T, F>(f: F) -> Result<T, Value>
where
    F: FnOnce() -> Result<T, Value>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result)   => result,
        Err(payload) => Err(Value::error(Error::panic(payload))),
    }
}

fn message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s)        => *s,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(s)  => (*s).to_owned(),
            Err(_) => "unknown panic payload".to_owned(),
        },
    }
}
