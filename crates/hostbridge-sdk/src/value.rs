//! Script-facing values
//!
//! `Value` is what crosses the boundary between the script runtime and the
//! bridge layer. Primitives are stored inline; native objects travel either
//! raw (`Native`) or wrapped by a bridge (`Object`).

use std::fmt;
use std::sync::Arc;

use crate::error::NativeResult;
use crate::object::NativeRef;
use crate::scriptable::Scriptable;

/// Erased native callable
pub type NativeFn = Arc<dyn Fn(&[Value]) -> NativeResult<Value> + Send + Sync>;

/// A callable member handed to the script runtime.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: NativeFn,
}

impl NativeFunction {
    /// Create a named function from a closure
    pub fn new(
        name: impl Into<Arc<str>>,
        func: impl Fn(&[Value]) -> NativeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Function name as seen by scripts
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> NativeResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Value crossing the script/native boundary
#[derive(Clone, Default)]
pub enum Value {
    /// `null` / `undefined`
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Raw native object with no bridge type mapped to its class
    Native(NativeRef),
    /// Native object wrapped by a bridge type
    Object(Arc<dyn Scriptable>),
    /// Callable member
    Function(NativeFunction),
}

impl Value {
    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Native(_) => "native",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a number (integers are widened)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as &str if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the raw native object
    pub fn as_native(&self) -> Option<&NativeRef> {
        match self {
            Value::Native(n) => Some(n),
            _ => None,
        }
    }

    /// Get the bridged host object
    pub fn as_object(&self) -> Option<&Arc<dyn Scriptable>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the callable
    pub fn as_function(&self) -> Option<&NativeFunction> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Native(n) => write!(f, "Native({})", n.native_class()),
            Value::Object(o) => write!(f, "Object({})", o.class_name()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Int(u as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<NativeRef> for Value {
    fn from(n: NativeRef) -> Self {
        Value::Native(n)
    }
}
