//! Consumer-side callback values and their identity handles.
//!
//! A [`ConsumerFunction`] is the consumer runtime's function object. Cloning
//! one clones a reference, not the function, so every clone has the same
//! identity. A [`CallbackHandle`] is built from a [`ConsumerValue`] and is
//! what the registry compares to detect duplicate registration.
//!
//! ```
//! use casement::{CallbackHandle, ConsumerFunction, ConsumerValue};
//! use serde_json::Value;
//!
//! let on_resize = ConsumerValue::from(ConsumerFunction::new(|_| Value::Null));
//!
//! let first = CallbackHandle::from_value(&on_resize).unwrap();
//! let second = CallbackHandle::from_value(&on_resize.clone()).unwrap();
//! assert_eq!(first, second);
//!
//! let other = ConsumerValue::from(ConsumerFunction::new(|_| Value::Null));
//! assert_ne!(first, CallbackHandle::from_value(&other).unwrap());
//! ```

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::error::{ListenerError, Result};

type CallbackFn = dyn Fn(&[Value]) -> Value + Send + Sync;

struct FunctionInner {
    call: Box<CallbackFn>,
    alive: AtomicBool,
    name: Option<String>,
}

/// A function object owned by the consumer runtime.
#[derive(Clone)]
pub struct ConsumerFunction {
    inner: Arc<FunctionInner>,
}

impl ConsumerFunction {
    /// Wrap a closure as a consumer function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::build(None, Box::new(f))
    }

    /// Wrap a closure with a name used in logs.
    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::build(Some(name.into()), Box::new(f))
    }

    fn build(name: Option<String>, call: Box<CallbackFn>) -> Self {
        Self {
            inner: Arc::new(FunctionInner {
                call,
                alive: AtomicBool::new(true),
                name,
            }),
        }
    }

    /// Call the function. Returns `None` without calling it if revoked.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        if !self.is_alive() {
            return None;
        }
        Some((self.inner.call)(args))
    }

    /// Mark the function as no longer invocable.
    ///
    /// Called when the consumer environment that owns it is torn down.
    pub fn revoke(&self) {
        self.inner.alive.store(false, Ordering::Release);
    }

    /// Whether the function can still be invoked.
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// The function's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Whether two values refer to the same function object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl std::fmt::Debug for ConsumerFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerFunction")
            .field("name", &self.name())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

/// A value handed over by the consumer runtime.
#[derive(Debug, Clone)]
pub enum ConsumerValue {
    /// A callable function.
    Function(ConsumerFunction),
    /// Any non-callable value.
    Data(Value),
}

impl ConsumerValue {
    /// Whether the value can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl From<ConsumerFunction> for ConsumerValue {
    fn from(function: ConsumerFunction) -> Self {
        Self::Function(function)
    }
}

impl From<Value> for ConsumerValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

/// Identity of a registered consumer callback.
///
/// Two handles are equal iff they refer to the same [`ConsumerFunction`].
#[derive(Clone)]
pub struct CallbackHandle {
    function: ConsumerFunction,
}

impl CallbackHandle {
    /// Build a handle from a consumer value.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::InvalidCallback`] if the value is not a function.
    pub fn from_value(value: &ConsumerValue) -> Result<Self> {
        match value {
            ConsumerValue::Function(function) => Ok(Self {
                function: function.clone(),
            }),
            ConsumerValue::Data(_) => Err(ListenerError::InvalidCallback),
        }
    }

    /// Whether the callback can still be invoked.
    pub fn is_alive(&self) -> bool {
        self.function.is_alive()
    }

    /// Invoke the callback. Returns `None` if it is no longer alive.
    pub fn invoke(&self, args: &[Value]) -> Option<Value> {
        self.function.call(args)
    }

    /// The underlying function.
    pub fn function(&self) -> &ConsumerFunction {
        &self.function
    }
}

impl PartialEq for CallbackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.function.ptr_eq(&other.function)
    }
}

impl Eq for CallbackHandle {}

impl Hash for CallbackHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.function.addr().hash(state);
    }
}

impl std::fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("CallbackHandle");
        s.field("addr", &format_args!("{:#x}", self.function.addr()));
        if let Some(name) = self.function.name() {
            s.field("name", &name);
        }
        s.field("alive", &self.is_alive()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn echo() -> ConsumerFunction {
        ConsumerFunction::new(|args| args.first().cloned().unwrap_or(Value::Null))
    }

    #[test]
    fn test_same_function_equal_handles() {
        let value = ConsumerValue::from(echo());
        let a = CallbackHandle::from_value(&value).unwrap();
        let b = CallbackHandle::from_value(&value).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_distinct_functions_differ() {
        let a = CallbackHandle::from_value(&echo().into()).unwrap();
        let b = CallbackHandle::from_value(&echo().into()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_non_callable_rejected() {
        let value = ConsumerValue::from(json!({"not": "a function"}));
        assert!(!value.is_callable());
        assert_eq!(
            CallbackHandle::from_value(&value),
            Err(ListenerError::InvalidCallback)
        );
    }

    #[test]
    fn test_invoke_and_revoke() {
        let function = echo();
        let handle = CallbackHandle::from_value(&function.clone().into()).unwrap();
        assert_eq!(handle.invoke(&[json!(5)]), Some(json!(5)));

        function.revoke();
        assert!(!handle.is_alive());
        assert_eq!(handle.invoke(&[json!(5)]), None);
    }

    #[test]
    fn test_debug_includes_name() {
        let function = ConsumerFunction::named("onResize", |_| Value::Null);
        let handle = CallbackHandle::from_value(&function.into()).unwrap();
        let debug = format!("{handle:?}");
        assert!(debug.contains("onResize"));
    }
}
