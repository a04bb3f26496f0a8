use std::fmt;
use std::sync::Arc;
use anyhow::Error;
use super::deferred::Deferred;
use super::error::TypeError;
use super::object::Object;

/// A dynamically typed payload.
///
/// Plain data is never thenable, even when it is a JSON object with a
/// `then` key. Only `Object` values take part in duck typing, and only
/// `Deferred` values are adopted natively.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Data(serde_json::Value),
    Error(Arc<Error>),
    Deferred(Deferred),
    Object(Arc<dyn Object>),
}

impl Value {
    pub fn error<E: Into<Error>>(error: E) -> Self {
        Value::Error(Arc::new(error.into()))
    }

    pub fn object<O: Object>(object: O) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Data(data) => Some(data),
            _                 => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(serde_json::Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(serde_json::Value::as_i64)
    }

    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Value::Error(error) => Some(error),
            _                   => None,
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.as_error().map_or(false, |e| e.is::<TypeError>())
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Value::Object(object) => object.is_callable(),
            _                     => false,
        }
    }

    pub fn call(&self, this: Value, args: Vec<Value>) -> Result<Value, Value> {
        match self {
            Value::Object(object) if object.is_callable() => object.call(this, args),
            other => Err(Value::error(TypeError::NotCallable(format!("{other:?}")))),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined,   Value::Undefined)   => true,
            (Value::Data(a),     Value::Data(b))     => a == b,
            (Value::Error(a),    Value::Error(b))    => Arc::ptr_eq(a, b),
            (Value::Deferred(a), Value::Deferred(b)) => a.ptr_eq(b),
            (Value::Object(a),   Value::Object(b))   => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined   => f.write_str("undefined"),
            Value::Data(data)  => write!(f, "{data}"),
            Value::Error(e)    => write!(f, "Error({e})"),
            Value::Deferred(d) => write!(f, "{d:?}"),
            Value::Object(o)   => match o.is_callable() {
                true  => f.write_str("[function]"),
                false => f.write_str("[object]"),
            },
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Value::Data(data)
    }
}

impl From<Deferred> for Value {
    fn from(deferred: Deferred) -> Self {
        Value::Deferred(deferred)
    }
}

impl From<Error> for Value {
    fn from(error: Error) -> Self {
        Value::Error(Arc::new(error))
    }
}

impl From<TypeError> for Value {
    fn from(error: TypeError) -> Self {
        Value::error(error)
    }
}

macro_rules! data {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Data(v.into())
            }
        })*
    };
}

data!(bool, i32, i64, u32, u64, f64, &str, String);

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;
    use crate::rt::Record;

    #[test]
    fn data_compares_by_value() {
        assert_eq!(Value::from(1), Value::from(json!(1)));
        assert_eq!(Value::from("x"), Value::Data(json!("x")));
        assert_ne!(Value::from(1), Value::Undefined);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(Record::new());
        let b = Value::object(Record::new());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn type_errors_are_detectable() {
        let reason = Value::from(TypeError::SelfAdoption);
        assert!(reason.is_type_error());
        assert!(!Value::error(anyhow::anyhow!("other")).is_type_error());
        assert!(!Value::from("text").is_type_error());
    }

    #[test]
    fn calling_plain_data_fails() {
        let reason = Value::from(3).call(Value::Undefined, vec![]).unwrap_err();
        assert!(reason.is_type_error());
        assert_eq!(reason.as_error().unwrap().to_string(), "3 is not a function");
    }
}
