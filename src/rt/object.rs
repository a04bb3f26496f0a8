use std::collections::HashMap;
use super::error::TypeError;
use super::value::Value;

/// A foreign object. Property reads may fail, which is how a throwing
/// getter is expressed.
pub trait Object: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Value, Value>;

    fn is_callable(&self) -> bool {
        false
    }

    fn call(&self, _this: Value, _args: Vec<Value>) -> Result<Value, Value> {
        Err(TypeError::NotCallable("object".to_owned()).into())
    }
}

#[derive(Default)]
pub struct Record {
    fields: HashMap<String, Value>,
}

type Body = dyn Fn(Value, Vec<Value>) -> Result<Value, Value> + Send + Sync;

/// A callable object. It may carry properties of its own, so a function
/// with a callable `then` is a thenable like any other object.
pub struct Function {
    body:   Box<Body>,
    fields: Record,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }
}

impl Object for Record {
    fn get(&self, key: &str) -> Result<Value, Value> {
        Ok(self.fields.get(key).cloned().unwrap_or_default())
    }
}

impl Function {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, Value> + Send + Sync + 'static,
    {
        Self {
            body:   Box::new(body),
            fields: Record::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields = self.fields.with(key, value);
        self
    }
}

impl Object for Function {
    fn get(&self, key: &str) -> Result<Value, Value> {
        self.fields.get(key)
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn call(&self, this: Value, args: Vec<Value>) -> Result<Value, Value> {
        (self.body)(this, args)
    }
}
