//! Per-object registration entry points.
//!
//! A [`RegistrationFacade`] is what a window, window stage, window manager or
//! screen manager exposes to consumers as `on`/`off`. It fixes the category
//! and target and forwards to its [`ListenerRegistry`]. Singleton categories
//! have no per-call target; their one native object is the registry's global
//! target.
//!
//! Dropping the last facade of a registry tears the registry down.

use std::sync::Arc;

use serde_json::Value;

use casement_core::ConsumerScheduler;

use crate::error::Result;
use crate::handle::{CallbackHandle, ConsumerValue};
use crate::registry::{ListenerRegistry, RegisterOutcome, UnregisterOutcome};
use crate::target::NativeTarget;
use crate::types::ObjectCategory;

/// `on`/`off` for one native object.
pub struct RegistrationFacade {
    category: ObjectCategory,
    target: Option<Arc<dyn NativeTarget>>,
    registry: Arc<ListenerRegistry>,
}

impl RegistrationFacade {
    /// Facade for a window.
    pub fn for_window(target: Arc<dyn NativeTarget>, scheduler: Arc<dyn ConsumerScheduler>) -> Self {
        Self::with_registry(
            ObjectCategory::Window,
            Some(target),
            Arc::new(ListenerRegistry::new(scheduler)),
        )
    }

    /// Facade for a window stage.
    pub fn for_window_stage(
        target: Arc<dyn NativeTarget>,
        scheduler: Arc<dyn ConsumerScheduler>,
    ) -> Self {
        Self::with_registry(
            ObjectCategory::WindowStage,
            Some(target),
            Arc::new(ListenerRegistry::new(scheduler)),
        )
    }

    /// Facade for the window manager.
    pub fn for_window_manager(
        manager: Arc<dyn NativeTarget>,
        scheduler: Arc<dyn ConsumerScheduler>,
    ) -> Self {
        Self::singleton(ObjectCategory::WindowManager, manager, scheduler)
    }

    /// Facade for the screen manager.
    pub fn for_screen_manager(
        manager: Arc<dyn NativeTarget>,
        scheduler: Arc<dyn ConsumerScheduler>,
    ) -> Self {
        Self::singleton(ObjectCategory::ScreenManager, manager, scheduler)
    }

    fn singleton(
        category: ObjectCategory,
        manager: Arc<dyn NativeTarget>,
        scheduler: Arc<dyn ConsumerScheduler>,
    ) -> Self {
        let registry = ListenerRegistry::builder(scheduler)
            .global_target(manager)
            .build();
        Self::with_registry(category, None, Arc::new(registry))
    }

    /// Facade over an existing registry.
    ///
    /// Use this to share a registry between objects or to supply a custom
    /// payload builder or configuration. `target` is ignored for singleton
    /// categories.
    pub fn with_registry(
        category: ObjectCategory,
        target: Option<Arc<dyn NativeTarget>>,
        registry: Arc<ListenerRegistry>,
    ) -> Self {
        let target = if category.is_singleton() { None } else { target };
        Self {
            category,
            target,
            registry,
        }
    }

    /// Register `callback` for `event_type`.
    ///
    /// `parameter` is required by events that take one, such as the timeout
    /// in seconds for `noInteractionDetected`.
    pub fn on(
        &self,
        event_type: &str,
        callback: &ConsumerValue,
        parameter: Option<&Value>,
    ) -> Result<RegisterOutcome> {
        let handle = CallbackHandle::from_value(callback)?;
        self.registry
            .register(self.target.as_ref(), self.category, event_type, &handle, parameter)
    }

    /// Unregister `callback` from `event_type`.
    ///
    /// With no callback, or a null value, every callback for the event is
    /// removed.
    pub fn off(&self, event_type: &str, callback: Option<&ConsumerValue>) -> Result<UnregisterOutcome> {
        let handle = match callback {
            None | Some(ConsumerValue::Data(Value::Null)) => None,
            Some(value) => Some(CallbackHandle::from_value(value)?),
        };
        self.registry
            .unregister(self.target.as_ref(), self.category, event_type, handle.as_ref())
    }

    /// Number of callbacks registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry
            .listener_count(self.target.as_ref(), self.category, event_type)
    }

    /// The object category this facade serves.
    pub fn category(&self) -> ObjectCategory {
        self.category
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for RegistrationFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationFacade")
            .field("category", &self.category)
            .field("has_target", &self.target.is_some())
            .field("registry", &self.registry)
            .finish()
    }
}
