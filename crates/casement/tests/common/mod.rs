//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use casement::{ConsumerFunction, ConsumerValue, ListenerCapability, NativeError, NativeResult, NativeTarget};
use parking_lot::Mutex;
use serde_json::Value;

/// A native object that records installed listeners.
#[derive(Default)]
pub struct MockTarget {
    listeners: Mutex<Vec<ListenerCapability>>,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: AtomicUsize,
    subscribe_error: Mutex<Option<NativeError>>,
    unsubscribe_error: Mutex<Option<NativeError>>,
    destroyed: AtomicBool,
    on_subscribe: Mutex<Option<Box<dyn Fn(&ListenerCapability) + Send + Sync>>>,
}

impl MockTarget {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::SeqCst)
    }

    /// Number of listeners currently installed.
    pub fn installed(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn fail_subscribe_with(&self, err: NativeError) {
        *self.subscribe_error.lock() = Some(err);
    }

    pub fn fail_unsubscribe_with(&self, err: NativeError) {
        *self.unsubscribe_error.lock() = Some(err);
    }

    /// Mark the native object as destroyed.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    /// Run `f` against each newly installed listener, after it is stored.
    pub fn on_subscribe(&self, f: impl Fn(&ListenerCapability) + Send + Sync + 'static) {
        *self.on_subscribe.lock() = Some(Box::new(f));
    }

    /// Snapshot of the installed listeners.
    pub fn listeners(&self) -> Vec<ListenerCapability> {
        self.listeners.lock().clone()
    }

    /// Call `f` for every installed listener, as the native side would.
    pub fn fire(&self, f: impl Fn(&ListenerCapability)) {
        for listener in self.listeners() {
            f(&listener);
        }
    }
}

impl NativeTarget for MockTarget {
    fn subscribe(&self, capability: ListenerCapability) -> NativeResult {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = *self.subscribe_error.lock() {
            return Err(err);
        }
        self.listeners.lock().push(capability.clone());
        if let Some(hook) = self.on_subscribe.lock().as_ref() {
            hook(&capability);
        }
        Ok(())
    }

    fn unsubscribe(&self, capability: ListenerCapability) -> NativeResult {
        self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
        let id = capability.listener_id();
        self.listeners.lock().retain(|listener| listener.listener_id() != id);
        match *self.unsubscribe_error.lock() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_alive(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
    }
}

/// A consumer callback that records the arguments of every call.
#[derive(Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Vec<Value>>>>,
    function: ConsumerFunction,
}

impl Recorder {
    pub fn new() -> Self {
        Self::returning(Value::Null)
    }

    /// A recorder whose callback returns `result`.
    pub fn returning(result: Value) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let function = ConsumerFunction::new(move |args| {
            sink.lock().push(args.to_vec());
            result.clone()
        });
        Self { calls, function }
    }

    pub fn value(&self) -> ConsumerValue {
        self.function.clone().into()
    }

    pub fn function(&self) -> &ConsumerFunction {
        &self.function
    }

    /// Take the calls recorded so far.
    pub fn take(&self) -> Vec<Vec<Value>> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// First argument of every recorded call.
    pub fn take_first_args(&self) -> Vec<Value> {
        self.take()
            .into_iter()
            .map(|args| args.into_iter().next().unwrap_or(Value::Null))
            .collect()
    }
}

/// Install a test subscriber once; ignored if one is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("casement=debug")
        .with_test_writer()
        .try_init();
}
