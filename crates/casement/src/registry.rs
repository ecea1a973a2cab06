//! The listener registry.
//!
//! A [`ListenerRegistry`] records which consumer callbacks are registered for
//! which event on which native target, and keeps the native side in step:
//! an adapter is installed on its target exactly while an entry references
//! it.
//!
//! Mutations are serialized by a write lock that is held across the native
//! subscribe/unsubscribe call. The entries themselves sit behind a second
//! lock that is only taken briefly and never across a native call, so
//! queries such as [`ListenerRegistry::listener_count`] never wait on the
//! native side. An entry is added only after its subscribe succeeded and is
//! removed before its unsubscribe runs.
//!
//! # Re-entrancy
//!
//! A target that calls back into the same registry from inside subscribe or
//! unsubscribe (directly, or through a consumer callback run inline) would
//! deadlock on the write lock. Such mutations are detected per thread, queued
//! on the registry, and return [`RegisterOutcome::Deferred`] or
//! [`UnregisterOutcome::Deferred`]. The outermost call runs the queue once it
//! has released the write lock. Queries are answered directly.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use casement::{
//!     CallbackHandle, ConsumerFunction, ListenerCapability, ListenerRegistry, NativeResult,
//!     NativeTarget, ObjectCategory, RegisterOutcome,
//! };
//! use casement_core::InlineScheduler;
//! use serde_json::Value;
//!
//! struct Window;
//!
//! impl NativeTarget for Window {
//!     fn subscribe(&self, _capability: ListenerCapability) -> NativeResult {
//!         Ok(())
//!     }
//!
//!     fn unsubscribe(&self, _capability: ListenerCapability) -> NativeResult {
//!         Ok(())
//!     }
//! }
//!
//! let registry = ListenerRegistry::new(Arc::new(InlineScheduler));
//! let window: Arc<dyn NativeTarget> = Arc::new(Window);
//! let handle = CallbackHandle::from_value(&ConsumerFunction::new(|_| Value::Null).into()).unwrap();
//!
//! let outcome = registry
//!     .register(Some(&window), ObjectCategory::Window, "screenshot", &handle, None)
//!     .unwrap();
//! assert_eq!(outcome, RegisterOutcome::Subscribed);
//! assert!(registry.is_registered(Some(&window), ObjectCategory::Window, "screenshot", &handle));
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use casement_core::ConsumerScheduler;
use casement_core::logging::targets;

use crate::adapter::{AdapterContext, ListenerArena, ListenerId, ListenerOptions, NativeListenerAdapter};
use crate::dispatch::{DispatchTable, EventKind, NO_INTERACTION_TIMEOUT_MAX_SECS};
use crate::error::{ListenerError, Result};
use crate::handle::CallbackHandle;
use crate::payload::{JsonPayloadBuilder, PayloadBuilder};
use crate::target::NativeTarget;
use crate::types::ObjectCategory;

/// What to do when a callback is registered twice for the same event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Succeed without doing anything.
    #[default]
    Ignore,
    /// Fail with [`ListenerError::AlreadyRegistered`].
    Reject,
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Handling of duplicate registrations.
    pub duplicate_policy: DuplicatePolicy,
    /// Largest accepted no-interaction timeout, in seconds.
    pub max_no_interaction_timeout_secs: i64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Ignore,
            max_no_interaction_timeout_secs: NO_INTERACTION_TIMEOUT_MAX_SECS,
        }
    }
}

impl RegistryConfig {
    /// A configuration that rejects duplicate registrations.
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            ..Default::default()
        }
    }
}

/// Result of a successful [`ListenerRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new listener was installed.
    Subscribed,
    /// The callback was already registered; nothing changed.
    Duplicate,
    /// The call was re-entrant and will run once the registry is free.
    Deferred,
}

/// Result of a successful [`ListenerRegistry::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    /// This many listeners were removed.
    Removed(usize),
    /// Nothing matched; nothing changed.
    NotRegistered,
    /// The call was re-entrant and will run once the registry is free.
    Deferred,
}

/// Identity of a target by allocation address.
///
/// Entries hold a `Weak` to their target, which keeps the allocation (and so
/// the address) reserved for as long as the entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct TargetKey(usize);

impl TargetKey {
    fn of(target: &Arc<dyn NativeTarget>) -> Self {
        Self(Arc::as_ptr(target) as *const () as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct BucketKey {
    category: ObjectCategory,
    kind: EventKind,
    target: TargetKey,
}

struct ListenerEntry {
    handle: CallbackHandle,
    adapter: Arc<NativeListenerAdapter>,
    target: Weak<dyn NativeTarget>,
}

enum DeferredOp {
    Register {
        target: Option<Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: String,
        handle: CallbackHandle,
        parameter: Option<Value>,
    },
    Unregister {
        target: Option<Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: String,
        handle: Option<CallbackHandle>,
    },
    Teardown,
}

impl DeferredOp {
    fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Unregister { .. } => "unregister",
            Self::Teardown => "teardown",
        }
    }
}

thread_local! {
    /// Registries the current thread is inside of.
    static ACTIVE_REGISTRIES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks the registry as entered on this thread.
struct ActiveGuard(usize);

impl ActiveGuard {
    /// Returns `None` if this thread is already inside the registry.
    fn enter(registry: &ListenerRegistry) -> Option<Self> {
        let addr = registry as *const ListenerRegistry as usize;
        ACTIVE_REGISTRIES.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&addr) {
                return None;
            }
            active.push(addr);
            Some(Self(addr))
        })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE_REGISTRIES.with(|active| active.borrow_mut().retain(|addr| *addr != self.0));
    }
}

/// Builder for [`ListenerRegistry`].
pub struct ListenerRegistryBuilder {
    scheduler: Arc<dyn ConsumerScheduler>,
    payloads: Arc<dyn PayloadBuilder>,
    global_target: Option<Arc<dyn NativeTarget>>,
    config: RegistryConfig,
}

impl ListenerRegistryBuilder {
    /// Set the payload builder. Defaults to [`JsonPayloadBuilder`].
    pub fn payloads(mut self, payloads: Arc<dyn PayloadBuilder>) -> Self {
        self.payloads = payloads;
        self
    }

    /// Set the implicit target used when a call passes no target.
    pub fn global_target(mut self, target: Arc<dyn NativeTarget>) -> Self {
        self.global_target = Some(target);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the duplicate registration policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Set the largest accepted no-interaction timeout, in seconds.
    pub fn max_no_interaction_timeout_secs(mut self, secs: i64) -> Self {
        self.config.max_no_interaction_timeout_secs = secs;
        self
    }

    /// Build the registry.
    pub fn build(self) -> ListenerRegistry {
        ListenerRegistry {
            write_lock: Mutex::new(()),
            buckets: Mutex::new(BTreeMap::new()),
            arena: Arc::new(ListenerArena::new()),
            deferred: Mutex::new(VecDeque::new()),
            scheduler: self.scheduler,
            payloads: self.payloads,
            global_target: self.global_target,
            config: self.config,
        }
    }
}

/// Per-target, per-event record of registered callbacks.
pub struct ListenerRegistry {
    /// Held for the whole of a mutation, native calls included.
    write_lock: Mutex<()>,
    /// Never held across a native call.
    buckets: Mutex<BTreeMap<BucketKey, Vec<ListenerEntry>>>,
    arena: Arc<ListenerArena>,
    deferred: Mutex<VecDeque<DeferredOp>>,
    scheduler: Arc<dyn ConsumerScheduler>,
    payloads: Arc<dyn PayloadBuilder>,
    global_target: Option<Arc<dyn NativeTarget>>,
    config: RegistryConfig,
}

impl ListenerRegistry {
    /// Create a registry with default settings.
    pub fn new(scheduler: Arc<dyn ConsumerScheduler>) -> Self {
        Self::builder(scheduler).build()
    }

    /// Start building a registry that delivers on `scheduler`.
    pub fn builder(scheduler: Arc<dyn ConsumerScheduler>) -> ListenerRegistryBuilder {
        ListenerRegistryBuilder {
            scheduler,
            payloads: Arc::new(JsonPayloadBuilder),
            global_target: None,
            config: RegistryConfig::default(),
        }
    }

    /// The registry's configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The scheduler events are delivered on.
    pub fn scheduler(&self) -> &Arc<dyn ConsumerScheduler> {
        &self.scheduler
    }

    /// Look up a live listener by id.
    pub fn listener(&self, id: ListenerId) -> Option<Arc<NativeListenerAdapter>> {
        self.arena.get(id)
    }

    /// Register `handle` for `event_type` on `target`.
    ///
    /// `target` may be `None` if the registry has a global target.
    ///
    /// # Errors
    ///
    /// - [`ListenerError::UnsupportedEvent`] if `event_type` is not in the
    ///   category's vocabulary
    /// - [`ListenerError::InvalidParam`] if the parameter is malformed or no
    ///   target is available
    /// - [`ListenerError::AlreadyRegistered`] for duplicates under
    ///   [`DuplicatePolicy::Reject`]
    /// - [`ListenerError::NativeSubscribeFailed`] if the target refuses; the
    ///   registry is left unchanged
    #[tracing::instrument(
        name = "casement::register",
        skip(self, target, handle, parameter),
        target = "casement::registry",
        level = "debug"
    )]
    pub fn register(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: &str,
        handle: &CallbackHandle,
        parameter: Option<&Value>,
    ) -> Result<RegisterOutcome> {
        let kind = DispatchTable::resolve(category, event_type)?;

        let Some(guard) = ActiveGuard::enter(self) else {
            self.defer(DeferredOp::Register {
                target: target.cloned(),
                category,
                event_type: event_type.to_owned(),
                handle: handle.clone(),
                parameter: parameter.cloned(),
            });
            return Ok(RegisterOutcome::Deferred);
        };
        let result = self.register_locked(target, category, kind, handle, parameter);
        drop(guard);

        self.run_deferred();
        result
    }

    fn register_locked(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        kind: EventKind,
        handle: &CallbackHandle,
        parameter: Option<&Value>,
    ) -> Result<RegisterOutcome> {
        let target = self.resolve_target(target, kind)?;
        let key = BucketKey {
            category,
            kind,
            target: TargetKey::of(&target),
        };

        let _write = self.write_lock.lock();
        let duplicate = self
            .buckets
            .lock()
            .get(&key)
            .is_some_and(|entries| entries.iter().any(|entry| entry.handle == *handle));
        if duplicate {
            return match self.config.duplicate_policy {
                DuplicatePolicy::Ignore => {
                    tracing::debug!(target: targets::REGISTRY, %kind, ?handle, "already registered");
                    Ok(RegisterOutcome::Duplicate)
                }
                DuplicatePolicy::Reject => Err(ListenerError::AlreadyRegistered {
                    event_type: kind.name(),
                }),
            };
        }

        let route = kind.route();
        let options = route.configure(parameter)?;
        self.check_options(&options)?;

        let adapter = self.arena.insert_with(|id| {
            NativeListenerAdapter::new(
                id,
                AdapterContext {
                    category,
                    kind,
                    handle: handle.clone(),
                    arena: Arc::downgrade(&self.arena),
                    scheduler: self.scheduler.clone(),
                    payloads: self.payloads.clone(),
                    options,
                },
            )
        });

        if let Err(err) = route.subscribe(&*target, &adapter) {
            self.arena.remove(adapter.id());
            tracing::warn!(target: targets::REGISTRY, %kind, %err, "native subscribe failed");
            return Err(ListenerError::subscribe_failed(kind.name(), err));
        }

        let listener = adapter.id();
        self.buckets.lock().entry(key).or_default().push(ListenerEntry {
            handle: handle.clone(),
            adapter,
            target: Arc::downgrade(&target),
        });
        tracing::info!(target: targets::REGISTRY, %category, %kind, ?listener, "listener registered");
        Ok(RegisterOutcome::Subscribed)
    }

    fn check_options(&self, options: &ListenerOptions) -> Result<()> {
        let Some(timeout_ms) = options.no_interaction_timeout_ms else {
            return Ok(());
        };
        let max_secs = self.config.max_no_interaction_timeout_secs.max(0) as u64;
        if timeout_ms > max_secs.saturating_mul(1000) {
            return Err(ListenerError::invalid_param(format!(
                "timeout {}s exceeds the configured maximum of {max_secs}s",
                timeout_ms / 1000
            )));
        }
        Ok(())
    }

    /// Unregister `handle`, or every callback if `handle` is `None`, for
    /// `event_type` on `target`.
    ///
    /// Unregistering something that was never registered succeeds with
    /// [`UnregisterOutcome::NotRegistered`].
    ///
    /// # Errors
    ///
    /// - [`ListenerError::UnsupportedEvent`] if `event_type` is not in the
    ///   category's vocabulary
    /// - [`ListenerError::Busy`] if a matching listener has a blocking call
    ///   in flight; nothing is removed
    /// - [`ListenerError::NativeUnsubscribeFailed`] if the target refuses;
    ///   the entries are removed regardless
    #[tracing::instrument(
        name = "casement::unregister",
        skip(self, target, handle),
        target = "casement::registry",
        level = "debug"
    )]
    pub fn unregister(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: &str,
        handle: Option<&CallbackHandle>,
    ) -> Result<UnregisterOutcome> {
        let kind = DispatchTable::resolve(category, event_type)?;

        let Some(guard) = ActiveGuard::enter(self) else {
            self.defer(DeferredOp::Unregister {
                target: target.cloned(),
                category,
                event_type: event_type.to_owned(),
                handle: handle.cloned(),
            });
            return Ok(UnregisterOutcome::Deferred);
        };
        let result = self.unregister_locked(target, category, kind, handle);
        drop(guard);

        self.run_deferred();
        result
    }

    fn unregister_locked(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        kind: EventKind,
        handle: Option<&CallbackHandle>,
    ) -> Result<UnregisterOutcome> {
        let target = self.resolve_target(target, kind)?;
        let key = BucketKey {
            category,
            kind,
            target: TargetKey::of(&target),
        };

        let _write = self.write_lock.lock();
        let Some(removed) = self.take_entries(key, handle)? else {
            return Ok(UnregisterOutcome::NotRegistered);
        };

        let count = removed.len();
        let mut first_error = None;
        for entry in removed {
            if let Err(err) = self.detach(kind, entry) {
                tracing::warn!(target: targets::REGISTRY, %kind, %err, "native unsubscribe failed");
                first_error.get_or_insert(err);
            }
        }

        tracing::info!(target: targets::REGISTRY, %category, %kind, count, "listeners unregistered");
        match first_error {
            Some(err) => Err(err),
            None => Ok(UnregisterOutcome::Removed(count)),
        }
    }

    /// Take the entries an unregister removes. `None` if nothing matches.
    fn take_entries(
        &self,
        key: BucketKey,
        handle: Option<&CallbackHandle>,
    ) -> Result<Option<Vec<ListenerEntry>>> {
        let kind = key.kind;
        let mut buckets = self.buckets.lock();
        let Some(entries) = buckets.get_mut(&key) else {
            tracing::debug!(target: targets::REGISTRY, %kind, "nothing registered");
            return Ok(None);
        };

        let removed = match handle {
            None => {
                if entries.iter().any(|entry| entry.adapter.is_busy()) {
                    return Err(ListenerError::Busy {
                        event_type: kind.name(),
                    });
                }
                std::mem::take(entries)
            }
            Some(handle) => {
                let Some(index) = entries.iter().position(|entry| entry.handle == *handle) else {
                    tracing::debug!(target: targets::REGISTRY, %kind, ?handle, "callback not registered");
                    return Ok(None);
                };
                if entries[index].adapter.is_busy() {
                    return Err(ListenerError::Busy {
                        event_type: kind.name(),
                    });
                }
                vec![entries.remove(index)]
            }
        };
        if entries.is_empty() {
            buckets.remove(&key);
        }
        Ok(Some(removed))
    }

    /// Remove the adapter from the arena and from its target.
    ///
    /// A target that no longer exists counts as unsubscribed.
    fn detach(&self, kind: EventKind, entry: ListenerEntry) -> Result<()> {
        let listener = entry.adapter.id();
        self.arena.remove(listener);

        let Some(target) = entry.target.upgrade().filter(|target| target.is_alive()) else {
            tracing::warn!(
                target: targets::REGISTRY,
                %kind,
                ?listener,
                "target gone, listener treated as unsubscribed"
            );
            return Ok(());
        };

        match kind.route().unsubscribe(&*target, &entry.adapter) {
            Ok(()) => Ok(()),
            Err(err) if err.is_target_gone() => {
                tracing::warn!(
                    target: targets::REGISTRY,
                    %kind,
                    ?listener,
                    "target reported gone on unsubscribe"
                );
                Ok(())
            }
            Err(err) => Err(ListenerError::unsubscribe_failed(kind.name(), err)),
        }
    }

    /// Unregister everything. Never fails.
    ///
    /// Listeners with a blocking call in flight are removed as well; their
    /// pending call completes without reaching the consumer.
    #[tracing::instrument(
        name = "casement::teardown",
        skip(self),
        target = "casement::registry",
        level = "debug"
    )]
    pub fn teardown(&self) {
        let Some(guard) = ActiveGuard::enter(self) else {
            self.defer(DeferredOp::Teardown);
            return;
        };
        self.teardown_locked();
        drop(guard);

        self.run_deferred();
    }

    fn teardown_locked(&self) {
        let _write = self.write_lock.lock();
        let drained = std::mem::take(&mut *self.buckets.lock());

        let mut count = 0;
        for (key, entries) in drained {
            for entry in entries {
                if entry.adapter.is_busy() {
                    tracing::warn!(
                        target: targets::REGISTRY,
                        kind = %key.kind,
                        listener = ?entry.adapter.id(),
                        "tearing down listener with a blocking call in flight"
                    );
                }
                if let Err(err) = self.detach(key.kind, entry) {
                    tracing::warn!(target: targets::REGISTRY, kind = %key.kind, %err, "teardown unsubscribe failed");
                }
                count += 1;
            }
        }

        if count > 0 {
            tracing::info!(target: targets::REGISTRY, count, "registry torn down");
        }
    }

    /// Number of callbacks registered for `event_type` on `target`.
    pub fn listener_count(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: &str,
    ) -> usize {
        let Some(key) = self.key_for(target, category, event_type) else {
            return 0;
        };
        self.buckets.lock().get(&key).map_or(0, Vec::len)
    }

    /// Whether `handle` is registered for `event_type` on `target`.
    pub fn is_registered(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: &str,
        handle: &CallbackHandle,
    ) -> bool {
        let Some(key) = self.key_for(target, category, event_type) else {
            return false;
        };
        self.buckets
            .lock()
            .get(&key)
            .is_some_and(|entries| entries.iter().any(|entry| entry.handle == *handle))
    }

    /// Total number of registered callbacks.
    pub fn total_listeners(&self) -> usize {
        self.buckets.lock().values().map(Vec::len).sum()
    }

    /// Number of re-entrant calls waiting to run.
    pub fn deferred_count(&self) -> usize {
        self.deferred.lock().len()
    }

    /// Capture the current registrations for debugging.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let buckets = self.buckets.lock();
        let buckets = buckets
            .iter()
            .map(|(key, entries)| BucketSnapshot {
                category: key.category,
                kind: key.kind,
                target: key.target.0,
                listeners: entries
                    .iter()
                    .map(|entry| ListenerSnapshot {
                        id: entry.adapter.id(),
                        busy: entry.adapter.is_busy(),
                        callback_alive: entry.handle.is_alive(),
                        target_alive: entry.target.strong_count() > 0,
                    })
                    .collect(),
            })
            .collect();
        RegistrySnapshot { buckets }
    }

    fn key_for(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        category: ObjectCategory,
        event_type: &str,
    ) -> Option<BucketKey> {
        let kind = DispatchTable::lookup(category, event_type)?;
        let target = target.or(self.global_target.as_ref())?;
        Some(BucketKey {
            category,
            kind,
            target: TargetKey::of(target),
        })
    }

    fn resolve_target(
        &self,
        target: Option<&Arc<dyn NativeTarget>>,
        kind: EventKind,
    ) -> Result<Arc<dyn NativeTarget>> {
        target
            .or(self.global_target.as_ref())
            .cloned()
            .ok_or_else(|| ListenerError::invalid_param(format!("no target to install '{kind}' on")))
    }

    fn defer(&self, op: DeferredOp) {
        tracing::debug!(target: targets::REGISTRY, op = op.name(), "re-entrant call deferred");
        self.deferred.lock().push_back(op);
    }

    fn run_deferred(&self) {
        loop {
            let Some(op) = self.deferred.lock().pop_front() else {
                break;
            };
            let name = op.name();
            let result = match op {
                DeferredOp::Register {
                    target,
                    category,
                    event_type,
                    handle,
                    parameter,
                } => self
                    .register(target.as_ref(), category, &event_type, &handle, parameter.as_ref())
                    .map(drop),
                DeferredOp::Unregister {
                    target,
                    category,
                    event_type,
                    handle,
                } => self
                    .unregister(target.as_ref(), category, &event_type, handle.as_ref())
                    .map(drop),
                DeferredOp::Teardown => {
                    self.teardown();
                    Ok(())
                }
            };
            if let Err(err) = result {
                tracing::warn!(target: targets::REGISTRY, op = name, %err, "deferred call failed");
            }
        }
    }
}

impl Drop for ListenerRegistry {
    fn drop(&mut self) {
        let discarded = std::mem::take(&mut *self.deferred.lock()).len();
        if discarded > 0 {
            tracing::debug!(target: targets::REGISTRY, discarded, "deferred calls discarded on drop");
        }
        self.teardown_locked();
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.total_listeners())
            .field("deferred", &self.deferred_count())
            .field("has_global_target", &self.global_target.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ListenerRegistry: Send, Sync);

/// Point-in-time view of a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub buckets: Vec<BucketSnapshot>,
}

/// Registrations for one event on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSnapshot {
    pub category: ObjectCategory,
    pub kind: EventKind,
    /// Address of the target, for telling targets apart.
    pub target: usize,
    pub listeners: Vec<ListenerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSnapshot {
    pub id: ListenerId,
    pub busy: bool,
    pub callback_alive: bool,
    pub target_alive: bool,
}

impl RegistrySnapshot {
    /// Total number of listeners.
    pub fn listener_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.listeners.len()).sum()
    }
}

impl fmt::Display for RegistrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Listener Registry ({} listeners):", self.listener_count())?;
        if self.buckets.is_empty() {
            return writeln!(f, "  (empty)");
        }
        for bucket in &self.buckets {
            writeln!(f, "  {}/{} @ {:#x}", bucket.category, bucket.kind, bucket.target)?;
            for (i, listener) in bucket.listeners.iter().enumerate() {
                let branch = if i + 1 == bucket.listeners.len() { "└── " } else { "├── " };
                write!(f, "    {branch}{:?}", listener.id)?;
                if listener.busy {
                    write!(f, " [busy]")?;
                }
                if !listener.callback_alive {
                    write!(f, " [callback revoked]")?;
                }
                if !listener.target_alive {
                    write!(f, " [target gone]")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
