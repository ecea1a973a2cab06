//! Integration tests for registering and unregistering listeners.

mod common;

use std::sync::{Arc, Weak};

use casement::{
    InlineScheduler, ListenerError, ListenerRegistry, NativeError, NativeTarget,
    NoInteractionListener, ObjectCategory, PumpedScheduler, RegisterOutcome, RegistrationFacade,
    RegistryConfig, UnregisterOutcome, VisibilityChangedListener,
};
use common::{MockTarget, Recorder, init_tracing};
use parking_lot::Mutex;
use serde_json::json;

fn window(target: &Arc<MockTarget>) -> RegistrationFacade {
    RegistrationFacade::for_window(target.clone(), Arc::new(InlineScheduler))
}

#[test]
fn test_duplicate_registration_subscribes_once() {
    init_tracing();
    let target = MockTarget::new();
    let facade = window(&target);
    let callback = Recorder::new();

    assert_eq!(
        facade.on("windowSizeChange", &callback.value(), None),
        Ok(RegisterOutcome::Subscribed)
    );
    assert_eq!(
        facade.on("windowSizeChange", &callback.value(), None),
        Ok(RegisterOutcome::Duplicate)
    );

    assert_eq!(target.subscribe_calls(), 1);
    assert_eq!(target.installed(), 1);
    assert_eq!(facade.listener_count("windowSizeChange"), 1);
}

#[test]
fn test_same_callback_on_different_events() {
    let target = MockTarget::new();
    let facade = window(&target);
    let callback = Recorder::new();

    facade.on("screenshot", &callback.value(), None).unwrap();
    facade.on("touchOutside", &callback.value(), None).unwrap();
    assert_eq!(target.subscribe_calls(), 2);
}

#[test]
fn test_unregister_without_handle_removes_all() {
    let target = MockTarget::new();
    let facade = window(&target);
    let callbacks: Vec<Recorder> = (0..3).map(|_| Recorder::new()).collect();
    for callback in &callbacks {
        facade.on("avoidAreaChange", &callback.value(), None).unwrap();
    }
    facade.on("screenshot", &callbacks[0].value(), None).unwrap();
    assert_eq!(facade.listener_count("avoidAreaChange"), 3);

    assert_eq!(
        facade.off("avoidAreaChange", None),
        Ok(UnregisterOutcome::Removed(3))
    );
    assert_eq!(facade.listener_count("avoidAreaChange"), 0);
    assert_eq!(target.unsubscribe_calls(), 3);
    // Other events are untouched.
    assert_eq!(facade.listener_count("screenshot"), 1);
    assert_eq!(target.installed(), 1);
}

#[test]
fn test_unregister_single_handle() {
    let target = MockTarget::new();
    let facade = window(&target);
    let first = Recorder::new();
    let second = Recorder::new();
    facade.on("screenshot", &first.value(), None).unwrap();
    facade.on("screenshot", &second.value(), None).unwrap();

    assert_eq!(
        facade.off("screenshot", Some(&first.value())),
        Ok(UnregisterOutcome::Removed(1))
    );
    assert_eq!(
        facade.off("screenshot", Some(&first.value())),
        Ok(UnregisterOutcome::NotRegistered)
    );
    assert_eq!(facade.listener_count("screenshot"), 1);
    assert_eq!(target.unsubscribe_calls(), 1);
}

#[test]
fn test_unsupported_event_rejected() {
    let target = MockTarget::new();
    let facade = window(&target);

    let err = facade
        .on("bogusEvent", &Recorder::new().value(), None)
        .unwrap_err();
    assert_eq!(
        err,
        ListenerError::unsupported(ObjectCategory::Window, "bogusEvent")
    );
    assert!(matches!(
        facade.off("bogusEvent", None),
        Err(ListenerError::UnsupportedEvent { .. })
    ));

    assert_eq!(target.subscribe_calls(), 0);
    assert_eq!(facade.registry().total_listeners(), 0);
}

#[test]
fn test_event_vocabulary_is_per_category() {
    let target = MockTarget::new();
    let stage = RegistrationFacade::for_window_stage(target.clone(), Arc::new(InlineScheduler));

    assert!(stage.on("windowStageEvent", &Recorder::new().value(), None).is_ok());
    assert!(matches!(
        stage.on("windowSizeChange", &Recorder::new().value(), None),
        Err(ListenerError::UnsupportedEvent { .. })
    ));
}

#[test]
fn test_subscribe_failure_leaves_registry_unchanged() {
    let target = MockTarget::new();
    target.fail_subscribe_with(NativeError::StateAbnormal);
    let facade = window(&target);

    let err = facade
        .on("windowVisibilityChange", &Recorder::new().value(), None)
        .unwrap_err();
    assert_eq!(
        err,
        ListenerError::subscribe_failed("windowVisibilityChange", NativeError::StateAbnormal)
    );
    assert_eq!(facade.listener_count("windowVisibilityChange"), 0);
    assert!(facade.registry().snapshot().buckets.is_empty());
}

#[test]
fn test_unsubscribe_failure_reported_but_removed() {
    let target = MockTarget::new();
    let facade = window(&target);
    facade.on("screenshot", &Recorder::new().value(), None).unwrap();
    facade.on("screenshot", &Recorder::new().value(), None).unwrap();
    target.fail_unsubscribe_with(NativeError::SystemAbnormal);

    let err = facade.off("screenshot", None).unwrap_err();
    assert_eq!(
        err,
        ListenerError::unsubscribe_failed("screenshot", NativeError::SystemAbnormal)
    );
    assert_eq!(facade.listener_count("screenshot"), 0);
    assert_eq!(target.unsubscribe_calls(), 2);
}

#[test]
fn test_strict_duplicate_policy() {
    let target = MockTarget::new();
    let registry = ListenerRegistry::builder(Arc::new(InlineScheduler))
        .config(RegistryConfig::strict())
        .build();
    let facade =
        RegistrationFacade::with_registry(ObjectCategory::Window, Some(target.clone()), Arc::new(registry));
    let callback = Recorder::new();

    facade.on("rectChange", &callback.value(), None).unwrap();
    assert_eq!(
        facade.on("rectChange", &callback.value(), None),
        Err(ListenerError::AlreadyRegistered {
            event_type: "rectChange"
        })
    );
    assert_eq!(target.subscribe_calls(), 1);
}

#[test]
fn test_no_interaction_timeout_validation() {
    let target = MockTarget::new();
    let facade = window(&target);
    let callback = Recorder::new();

    for parameter in [None, Some(json!(0)), Some(json!(-1)), Some(json!(1.5)), Some(json!("30"))] {
        let result = facade.on("noInteractionDetected", &callback.value(), parameter.as_ref());
        assert!(
            matches!(result, Err(ListenerError::InvalidParam(_))),
            "{parameter:?} accepted"
        );
    }
    assert_eq!(target.subscribe_calls(), 0);

    facade
        .on("noInteractionDetected", &callback.value(), Some(&json!(15)))
        .unwrap();
    let listeners = target.listeners();
    let listener = listeners[0]
        .as_no_interaction()
        .expect("no-interaction capability installed");
    assert_eq!(listener.timeout_ms(), 15_000);
}

#[test]
fn test_dead_target_counts_as_unsubscribed() {
    let target = MockTarget::new();
    let facade = window(&target);
    facade.on("screenshot", &Recorder::new().value(), None).unwrap();

    target.destroy();
    assert_eq!(
        facade.off("screenshot", None),
        Ok(UnregisterOutcome::Removed(1))
    );
    assert_eq!(target.unsubscribe_calls(), 0);
    assert_eq!(facade.listener_count("screenshot"), 0);
}

#[test]
fn test_teardown_on_drop() {
    let target = MockTarget::new();
    let facade = window(&target);
    facade.on("screenshot", &Recorder::new().value(), None).unwrap();
    facade.on("windowEvent", &Recorder::new().value(), None).unwrap();
    facade.on("windowEvent", &Recorder::new().value(), None).unwrap();

    drop(facade);
    assert_eq!(target.unsubscribe_calls(), 3);
    assert_eq!(target.installed(), 0);
}

#[test]
fn test_teardown_tolerates_gone_targets() {
    let live = MockTarget::new();
    let gone = MockTarget::new();
    gone.fail_unsubscribe_with(NativeError::TargetGone);
    let destroyed = MockTarget::new();

    let registry = Arc::new(ListenerRegistry::new(Arc::new(InlineScheduler)));
    let facades: Vec<RegistrationFacade> = [&live, &gone, &destroyed]
        .into_iter()
        .map(|target| {
            RegistrationFacade::with_registry(
                ObjectCategory::Window,
                Some(target.clone()),
                registry.clone(),
            )
        })
        .collect();
    for facade in &facades {
        facade.on("touchOutside", &Recorder::new().value(), None).unwrap();
        facade.on("windowStatusChange", &Recorder::new().value(), None).unwrap();
    }
    destroyed.destroy();

    registry.teardown();
    assert_eq!(registry.total_listeners(), 0);
    assert_eq!(live.unsubscribe_calls(), 2);
    assert_eq!(gone.unsubscribe_calls(), 2);
    assert_eq!(destroyed.unsubscribe_calls(), 0);

    // A second teardown has nothing left to do.
    registry.teardown();
    assert_eq!(live.unsubscribe_calls(), 2);
}

#[test]
fn test_singleton_facades_use_global_target() {
    let manager = MockTarget::new();
    let facade = RegistrationFacade::for_window_manager(manager.clone(), Arc::new(InlineScheduler));

    facade
        .on("systemBarTintChange", &Recorder::new().value(), None)
        .unwrap();
    facade
        .on("gestureNavigationEnabledChange", &Recorder::new().value(), None)
        .unwrap();
    assert_eq!(manager.installed(), 2);

    assert_eq!(
        facade.off("systemBarTintChange", None),
        Ok(UnregisterOutcome::Removed(1))
    );
    assert_eq!(manager.installed(), 1);
}

#[test]
fn test_reentrant_registration_is_deferred() {
    let target = MockTarget::new();
    let registry = Arc::new(ListenerRegistry::new(Arc::new(InlineScheduler)));
    let facade =
        RegistrationFacade::with_registry(ObjectCategory::Window, Some(target.clone()), registry.clone());

    // The native side reports the current visibility as soon as a
    // visibility listener is installed.
    target.on_subscribe(|capability| {
        if let Some(listener) = capability.as_visibility_changed() {
            listener.on_visibility_changed(true);
        }
    });

    let weak_registry: Weak<ListenerRegistry> = Arc::downgrade(&registry);
    let weak_target: Weak<dyn NativeTarget> = Arc::downgrade(&(target.clone() as Arc<dyn NativeTarget>));
    let screenshot = Recorder::new();
    let screenshot_handle =
        casement::CallbackHandle::from_value(&screenshot.value()).unwrap();
    let nested = Arc::new(Mutex::new(Vec::new()));
    let outcomes = nested.clone();
    let on_visible = casement::ConsumerFunction::new(move |_| {
        if let (Some(registry), Some(target)) = (weak_registry.upgrade(), weak_target.upgrade()) {
            outcomes.lock().push(registry.register(
                Some(&target),
                ObjectCategory::Window,
                "screenshot",
                &screenshot_handle,
                None,
            ));
        }
        serde_json::Value::Null
    });

    assert_eq!(
        facade.on("windowVisibilityChange", &on_visible.into(), None),
        Ok(RegisterOutcome::Subscribed)
    );
    assert_eq!(*nested.lock(), vec![Ok(RegisterOutcome::Deferred)]);

    // The deferred registration ran once the outer call finished.
    assert_eq!(registry.deferred_count(), 0);
    assert_eq!(facade.listener_count("screenshot"), 1);
    assert_eq!(target.installed(), 2);
}

#[test]
fn test_queries_during_subscribe_see_committed_entries() {
    let target = MockTarget::new();
    let facade = Arc::new(window(&target));
    let first = Recorder::new();
    facade
        .on("windowVisibilityChange", &first.value(), None)
        .unwrap();

    target.on_subscribe(|capability| {
        if let Some(listener) = capability.as_visibility_changed() {
            listener.on_visibility_changed(true);
        }
    });

    let weak = Arc::downgrade(&facade);
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let on_visible = casement::ConsumerFunction::new(move |_| {
        if let Some(facade) = weak.upgrade() {
            let description = format!("{facade:?}");
            *sink.lock() = Some((facade.listener_count("windowVisibilityChange"), description));
        }
        serde_json::Value::Null
    });

    assert_eq!(
        facade.on("windowVisibilityChange", &on_visible.into(), None),
        Ok(RegisterOutcome::Subscribed)
    );

    // Inside subscribe only the earlier registration is visible.
    let (count, description) = seen.lock().take().unwrap();
    assert_eq!(count, 1);
    assert!(description.contains("listeners: 1"));
    assert_eq!(facade.listener_count("windowVisibilityChange"), 2);
    assert_eq!(first.take_first_args(), Vec::<serde_json::Value>::new());
}

#[test]
fn test_registration_from_consumer_thread_is_not_deferred() {
    let target = MockTarget::new();
    let scheduler = Arc::new(PumpedScheduler::new());
    let facade = Arc::new(RegistrationFacade::for_window(target.clone(), scheduler.clone()));

    let weak = Arc::downgrade(&facade);
    let late = Recorder::new();
    let late_value = late.value();
    let result = Arc::new(Mutex::new(None));
    let sink = result.clone();
    let on_visible = casement::ConsumerFunction::new(move |_| {
        if let Some(facade) = weak.upgrade() {
            *sink.lock() = Some(facade.on("screenshot", &late_value, None));
        }
        serde_json::Value::Null
    });
    facade
        .on("windowVisibilityChange", &on_visible.into(), None)
        .unwrap();

    target.fire(|listener| {
        if let Some(listener) = listener.as_visibility_changed() {
            listener.on_visibility_changed(false);
        }
    });
    scheduler.process_pending();

    assert_eq!(*result.lock(), Some(Ok(RegisterOutcome::Subscribed)));
    assert_eq!(facade.listener_count("screenshot"), 1);
}
