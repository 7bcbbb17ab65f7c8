//! Runtime value types
//!
//! Fulfillment values and rejection reasons are both [`Val`]. The data
//! variants are plain structural data; the engine variants (`Future`,
//! `Thenable`, `Callback`) carry shared handles and compare by identity.
//! The JSON conversions at the bottom are the serialization boundary: the
//! engine variants have no JSON form.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::future::Future;

/* ===================== Error values ===================== */

/// Error value with code and message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorInfo {
            code: code.into(),
            message: message.into(),
        }
    }

    /// A future was asked to adopt its own settlement.
    pub fn cycle() -> Self {
        ErrorInfo::new(
            "CycleError",
            "chaining cycle detected: future resolved with itself",
        )
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ErrorInfo::new("TypeError", message)
    }
}

/* ===================== Foreign interop ===================== */

/// Resolution callback handed to a foreign thenable's `then` member.
///
/// Multiply-callable on purpose: a misbehaving thenable may invoke it any
/// number of times, and the engine's one-shot commit guard absorbs the
/// extras.
pub type ThenCallback = Box<dyn Fn(Val)>;

/// Foreign deferred-value object: anything exposing a callable `then`-style
/// member, interoperable through the resolution algorithm without being one
/// of this engine's own futures.
pub trait ForeignThenable {
    /// Invoke the object's `then` member with two resolution callbacks.
    ///
    /// `Err` models a synchronous failure raised out of the member itself.
    fn then(&self, on_fulfilled: ThenCallback, on_rejected: ThenCallback) -> Result<(), Val>;
}

/// Outcome delivered to a callback-style operation's completion callback.
pub type Completion = Box<dyn FnOnce(Result<Val, Val>)>;

/// Callback-style async operation: a function invoked with a single
/// completion callback carrying either an error or a value.
#[derive(Clone)]
pub struct CallbackOp {
    op: Rc<dyn Fn(Completion)>,
}

impl CallbackOp {
    pub fn new(op: impl Fn(Completion) + 'static) -> Self {
        CallbackOp { op: Rc::new(op) }
    }

    pub fn call(&self, done: Completion) {
        (self.op)(done)
    }

    fn ptr_eq(&self, other: &CallbackOp) -> bool {
        Rc::ptr_eq(&self.op, &other.op)
    }
}

/* ===================== Values ===================== */

/// Runtime value type
#[derive(Clone)]
pub enum Val {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<Val>),
    Obj(HashMap<String, Val>),
    /// Error value with code and message
    Error(ErrorInfo),
    /// One of this engine's own futures
    Future(Future),
    /// Foreign deferred-value object
    Thenable(Rc<dyn ForeignThenable>),
    /// Callback-style operation, awaitable through the coroutine executor
    Callback(CallbackOp),
}

impl Val {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Val::Null => "null",
            Val::Bool(_) => "bool",
            Val::Num(_) => "number",
            Val::Str(_) => "string",
            Val::List(_) => "list",
            Val::Obj(_) => "object",
            Val::Error(_) => "error",
            Val::Future(_) => "future",
            Val::Thenable(_) => "thenable",
            Val::Callback(_) => "callback",
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Val) -> bool {
        match (self, other) {
            (Val::Null, Val::Null) => true,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::Num(a), Val::Num(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::List(a), Val::List(b)) => a == b,
            (Val::Obj(a), Val::Obj(b)) => a == b,
            (Val::Error(a), Val::Error(b)) => a == b,
            (Val::Future(a), Val::Future(b)) => a.ptr_eq(b),
            (Val::Thenable(a), Val::Thenable(b)) => Rc::ptr_eq(a, b),
            (Val::Callback(a), Val::Callback(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => write!(f, "Null"),
            Val::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Val::Num(n) => f.debug_tuple("Num").field(n).finish(),
            Val::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Val::List(items) => f.debug_tuple("List").field(items).finish(),
            Val::Obj(map) => f.debug_tuple("Obj").field(map).finish(),
            Val::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Val::Future(_) => write!(f, "Future(..)"),
            Val::Thenable(_) => write!(f, "Thenable(..)"),
            Val::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

/* ===================== JSON boundary ===================== */

/// Conversion failures at the `Val`/JSON boundary
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("number {0} has no f64 representation")]
    UnrepresentableNumber(String),
    #[error("{0} values have no JSON representation")]
    UnrepresentableKind(&'static str),
}

/// Convert a JSON value into a runtime value.
pub fn json_to_val(json: &JsonValue) -> Result<Val, ConvertError> {
    match json {
        JsonValue::Null => Ok(Val::Null),
        JsonValue::Bool(b) => Ok(Val::Bool(*b)),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Val::Num)
            .ok_or_else(|| ConvertError::UnrepresentableNumber(n.to_string())),
        JsonValue::String(s) => Ok(Val::Str(s.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_val)
            .collect::<Result<Vec<_>, _>>()
            .map(Val::List),
        JsonValue::Object(map) => {
            let mut obj = HashMap::new();
            for (key, value) in map {
                obj.insert(key.clone(), json_to_val(value)?);
            }
            Ok(Val::Obj(obj))
        }
    }
}

/// Convert a runtime value back to JSON. Engine variants have no JSON form.
pub fn val_to_json(val: &Val) -> Result<JsonValue, ConvertError> {
    match val {
        Val::Null => Ok(JsonValue::Null),
        Val::Bool(b) => Ok(JsonValue::Bool(*b)),
        Val::Num(n) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .ok_or_else(|| ConvertError::UnrepresentableNumber(n.to_string())),
        Val::Str(s) => Ok(JsonValue::String(s.clone())),
        Val::List(items) => items
            .iter()
            .map(val_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        Val::Obj(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                out.insert(key.clone(), val_to_json(value)?);
            }
            Ok(JsonValue::Object(out))
        }
        Val::Error(e) => Ok(serde_json::json!({ "code": e.code, "message": e.message })),
        Val::Future(_) => Err(ConvertError::UnrepresentableKind("future")),
        Val::Thenable(_) => Err(ConvertError::UnrepresentableKind("thenable")),
        Val::Callback(_) => Err(ConvertError::UnrepresentableKind("callback")),
    }
}
