//! Integration tests for event delivery to the consumer thread.

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use casement::{
    AvoidArea, AvoidAreaChangedListener, AvoidAreaType, ConsumerFunction, ConsumerLoop,
    ConsumerValue, KeyboardPanelInfo, KeyboardTransitionListener, LifecycleListener,
    ListenerError, NativeError, PumpedScheduler, Rect, RectChangeListener, RectType,
    RegistrationFacade, RotationChangeInfo, RotationChangeResult, RotationChangeType,
    ScreenChangeEvent, ScreenListener, ScreenshotListener, SubWindowCloseListener,
    SystemBarChangedListener, SystemBarRegionTint, SystemBarType, UnregisterOutcome,
    WindowChangeListener, WindowRotationChangeListener, WindowSizeChangeReason,
    WindowStageLifecycleListener, WindowWillCloseListener, call_blocking,
};
use common::{MockTarget, Recorder};
use serde_json::{Value, json};

struct Fixture {
    target: Arc<MockTarget>,
    scheduler: Arc<PumpedScheduler>,
    facade: RegistrationFacade,
}

impl Fixture {
    fn window() -> Self {
        let target = MockTarget::new();
        let scheduler = Arc::new(PumpedScheduler::new());
        let facade = RegistrationFacade::for_window(target.clone(), scheduler.clone());
        Self {
            target,
            scheduler,
            facade,
        }
    }

    fn window_stage() -> Self {
        let target = MockTarget::new();
        let scheduler = Arc::new(PumpedScheduler::new());
        let facade = RegistrationFacade::for_window_stage(target.clone(), scheduler.clone());
        Self {
            target,
            scheduler,
            facade,
        }
    }

    fn flush(&self) -> usize {
        self.scheduler.process_pending()
    }
}

#[test]
fn test_size_change_scenario() {
    let fx = Fixture::window();
    let callback = Recorder::new();

    fx.facade
        .on("windowSizeChange", &callback.value(), None)
        .unwrap();
    assert_eq!(fx.target.subscribe_calls(), 1);
    let stale = fx.target.listeners()[0].clone();

    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_window_change() {
            listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::DragEnd);
        }
    });
    fx.flush();
    assert_eq!(
        callback.take_first_args(),
        vec![json!({"width": 100, "height": 200})]
    );

    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_window_change() {
            listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::Undefined);
        }
    });
    fx.flush();
    assert!(callback.take().is_empty());

    assert_eq!(
        fx.facade.off("windowSizeChange", Some(&callback.value())),
        Ok(UnregisterOutcome::Removed(1))
    );
    assert_eq!(fx.target.unsubscribe_calls(), 1);

    // A native source still holding the old listener reaches nobody.
    if let Some(listener) = stale.as_window_change() {
        listener.on_size_change(Rect::sized(300, 300), WindowSizeChangeReason::Resize);
    }
    fx.flush();
    assert!(callback.take().is_empty());
}

#[test]
fn test_size_change_dedupe_reasons() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade
        .on("windowSizeChange", &callback.value(), None)
        .unwrap();
    let listeners = fx.target.listeners();
    let listener = listeners[0].as_window_change().unwrap();

    listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::Undefined);
    listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::Undefined);
    fx.flush();
    assert_eq!(callback.take().len(), 1);

    listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::DragEnd);
    listener.on_size_change(Rect::sized(100, 200), WindowSizeChangeReason::DragEnd);
    fx.flush();
    assert_eq!(callback.take().len(), 2);
}

#[test]
fn test_events_delivered_in_order() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade
        .on("windowSizeChange", &callback.value(), None)
        .unwrap();

    let listener = fx.target.listeners()[0].clone();
    thread::spawn(move || {
        let listener = listener.as_window_change().unwrap();
        for width in 1..=50 {
            listener.on_size_change(Rect::sized(width, 10), WindowSizeChangeReason::Resize);
        }
    })
    .join()
    .unwrap();

    assert_eq!(fx.flush(), 50);
    let widths: Vec<Value> = callback
        .take_first_args()
        .into_iter()
        .map(|size| size["width"].clone())
        .collect();
    let expected: Vec<Value> = (1..=50).map(|width| json!(width)).collect();
    assert_eq!(widths, expected);
}

#[test]
fn test_ordering_on_consumer_loop() {
    let consumer = Arc::new(ConsumerLoop::new().unwrap());
    let target = MockTarget::new();
    let facade = RegistrationFacade::for_window(target.clone(), consumer.clone());
    let callback = Recorder::new();
    facade
        .on("rectChange", &callback.value(), None)
        .unwrap();

    let listener = target.listeners()[0].clone();
    let producer = thread::spawn(move || {
        let listener = listener.as_rect_change().unwrap();
        for x in 0..20 {
            listener.on_rect_change(Rect::new(x, 0, 10, 10), WindowSizeChangeReason::Move);
        }
    });
    producer.join().unwrap();

    // Everything posted before this marker has run once it returns.
    call_blocking(&*consumer, || ()).unwrap();
    let xs: Vec<Value> = callback
        .take_first_args()
        .into_iter()
        .map(|payload| payload["rect"]["left"].clone())
        .collect();
    assert_eq!(xs, (0..20).map(|x| json!(x)).collect::<Vec<_>>());

    drop(facade);
    consumer.stop_and_join();
}

#[test]
fn test_blocking_close_round_trip_and_busy() {
    let consumer = Arc::new(ConsumerLoop::new().unwrap());
    let target = MockTarget::new();
    let facade = RegistrationFacade::for_window(target.clone(), consumer.clone());

    let (entered_tx, entered_rx) = crossbeam_channel::bounded::<()>(1);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<bool>(1);
    let on_close: ConsumerValue = ConsumerFunction::new(move |args| {
        assert!(args.is_empty());
        entered_tx.send(()).unwrap();
        json!(release_rx.recv().unwrap_or(false))
    })
    .into();
    facade.on("windowWillClose", &on_close, None).unwrap();

    let listener = target.listeners()[0].clone();
    let native = thread::spawn(move || {
        listener
            .as_window_will_close()
            .map(|listener| listener.on_window_will_close())
    });

    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("close callback should start");
    let busy = Err(ListenerError::Busy {
        event_type: "windowWillClose",
    });
    assert_eq!(facade.off("windowWillClose", Some(&on_close)), busy);
    assert_eq!(facade.off("windowWillClose", None), busy);
    assert_eq!(facade.listener_count("windowWillClose"), 1);

    release_tx.send(true).unwrap();
    assert_eq!(native.join().unwrap(), Some(true));

    assert_eq!(
        facade.off("windowWillClose", Some(&on_close)),
        Ok(UnregisterOutcome::Removed(1))
    );

    drop(facade);
    consumer.stop_and_join();
}

#[test]
fn test_close_after_consumer_stopped_does_not_intercept() {
    let consumer = Arc::new(ConsumerLoop::new().unwrap());
    let target = MockTarget::new();
    let facade = RegistrationFacade::for_window(target.clone(), consumer.clone());
    let callback = Recorder::returning(json!(true));
    facade
        .on("subWindowClose", &callback.value(), None)
        .unwrap();

    consumer.stop_and_join();
    let listeners = target.listeners();
    let listener = listeners[0].as_sub_window_close().unwrap();
    assert!(!listener.on_sub_window_close());
    assert!(callback.take().is_empty());
}

#[test]
fn test_rotation_blocks_until_delivered() {
    let consumer = Arc::new(ConsumerLoop::new().unwrap());
    let target = MockTarget::new();
    let facade = RegistrationFacade::for_window(target.clone(), consumer.clone());
    let callback = Recorder::new();
    facade
        .on("windowSizeChange", &callback.value(), None)
        .unwrap();

    let listener = target.listeners()[0].clone();
    thread::spawn(move || {
        let listener = listener.as_window_change().unwrap();
        listener.on_size_change(Rect::sized(1080, 1920), WindowSizeChangeReason::Rotation);
    })
    .join()
    .unwrap();

    // No flush: the native call returned only after delivery.
    assert_eq!(
        callback.take_first_args(),
        vec![json!({"width": 1080, "height": 1920})]
    );

    drop(facade);
    consumer.stop_and_join();
}

#[test]
fn test_rotation_change_returns_placement() {
    let consumer = Arc::new(ConsumerLoop::new().unwrap());
    let target = MockTarget::new();
    let facade = RegistrationFacade::for_window(target.clone(), consumer.clone());
    let callback = Recorder::returning(json!({
        "rectType": 1,
        "windowRect": {"left": 10, "top": 20, "width": 600, "height": 400},
    }));
    facade
        .on("windowRotationChange", &callback.value(), None)
        .unwrap();

    let listener = target.listeners()[0].clone();
    let answer = thread::spawn(move || {
        listener
            .as_window_rotation_change()
            .and_then(|listener| {
                listener.on_rotation_change(RotationChangeInfo {
                    change_type: RotationChangeType::WindowDidRotate,
                    orientation: 1,
                    display_id: 0,
                    display_rect: Rect::sized(2400, 1080),
                })
            })
    })
    .join()
    .unwrap();

    assert_eq!(
        answer,
        Some(RotationChangeResult {
            rect_type: RectType::RelativeToParentWindow,
            window_rect: Rect::new(10, 20, 600, 400),
        })
    );
    assert_eq!(
        callback.take_first_args(),
        vec![json!({
            "type": 1,
            "orientation": 1,
            "displayId": 0,
            "displayRect": {"left": 0, "top": 0, "width": 2400, "height": 1080},
        })]
    );

    drop(facade);
    consumer.stop_and_join();
}

#[test]
fn test_rotation_change_unsupported_device() {
    let fx = Fixture::window();
    fx.target.fail_subscribe_with(NativeError::DeviceNotSupported);
    let callback = Recorder::new();

    assert_eq!(
        fx.facade.on("windowRotationChange", &callback.value(), None),
        Err(ListenerError::subscribe_failed(
            "windowRotationChange",
            NativeError::DeviceNotSupported
        ))
    );
    assert_eq!(fx.facade.listener_count("windowRotationChange"), 0);
}

#[test]
fn test_keyboard_transitions_routed_by_name() {
    let fx = Fixture::window();
    let will_show = Recorder::new();
    let did_hide = Recorder::new();
    fx.facade
        .on("keyboardWillShow", &will_show.value(), None)
        .unwrap();
    fx.facade
        .on("keyboardDidHide", &did_hide.value(), None)
        .unwrap();

    let info = KeyboardPanelInfo {
        begin_rect: Rect::new(0, 2400, 1080, 0),
        end_rect: Rect::new(0, 1600, 1080, 800),
        animated: true,
    };
    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_keyboard_will_show() {
            listener.on_keyboard_will_show(info);
        }
        if let Some(listener) = listener.as_keyboard_did_hide() {
            listener.on_keyboard_will_show(info);
            listener.on_keyboard_did_hide(info);
        }
    });
    fx.flush();

    let shown = will_show.take_first_args();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0]["endRect"]["height"], json!(800));
    assert_eq!(did_hide.take().len(), 1);
}

#[test]
fn test_lifecycle_dedupe() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade.on("windowEvent", &callback.value(), None).unwrap();
    let listeners = fx.target.listeners();
    let listener = listeners[0].as_lifecycle().unwrap();

    listener.after_foreground();
    listener.after_foreground();
    listener.after_focused();
    listener.after_background();
    listener.after_background();
    listener.after_foreground();
    listener.after_destroyed();
    fx.flush();

    assert_eq!(
        callback.take_first_args(),
        vec![json!(1), json!(2), json!(4), json!(1), json!(7)]
    );
}

#[test]
fn test_window_stage_lifecycle() {
    let fx = Fixture::window_stage();
    let events = Recorder::new();
    let stage_lifecycle = Recorder::new();
    fx.facade
        .on("windowStageEvent", &events.value(), None)
        .unwrap();
    fx.facade
        .on("windowStageLifecycleEvent", &stage_lifecycle.value(), None)
        .unwrap();

    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_lifecycle() {
            listener.after_foreground();
            listener.after_resumed();
            listener.after_destroyed();
        }
        if let Some(listener) = listener.as_window_stage_lifecycle() {
            listener.after_lifecycle_foreground();
            listener.after_lifecycle_resumed();
            listener.after_lifecycle_foreground();
        }
    });
    fx.flush();

    assert_eq!(events.take_first_args(), vec![json!(1), json!(5)]);
    assert_eq!(stage_lifecycle.take_first_args(), vec![json!(1), json!(2)]);
}

#[test]
fn test_avoid_area_payload_shapes() {
    let fx = Fixture::window();
    let deprecated = Recorder::new();
    let current = Recorder::new();
    fx.facade
        .on("systemAvoidAreaChange", &deprecated.value(), None)
        .unwrap();
    fx.facade
        .on("avoidAreaChange", &current.value(), None)
        .unwrap();

    let area = AvoidArea {
        visible: true,
        bottom_rect: Rect::new(0, 1800, 1080, 120),
        ..Default::default()
    };
    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_avoid_area_changed() {
            listener.on_avoid_area_changed(area, AvoidAreaType::Keyboard);
        }
    });
    fx.flush();

    let old = deprecated.take_first_args();
    assert_eq!(old.len(), 1);
    assert_eq!(old[0]["visible"], json!(true));
    assert_eq!(old[0]["bottomRect"]["top"], json!(1800));

    let new = current.take_first_args();
    assert_eq!(new.len(), 1);
    assert_eq!(new[0]["type"], json!(AvoidAreaType::Keyboard.code()));
    assert_eq!(new[0]["area"]["bottomRect"]["height"], json!(120));
}

#[test]
fn test_system_bar_tint_payload() {
    let manager = MockTarget::new();
    let scheduler = Arc::new(PumpedScheduler::new());
    let facade = RegistrationFacade::for_window_manager(manager.clone(), scheduler.clone());
    let callback = Recorder::new();
    facade
        .on("systemBarTintChange", &callback.value(), None)
        .unwrap();

    let tints = [SystemBarRegionTint {
        bar_type: SystemBarType::NavigationBar,
        is_enabled: false,
        region: Rect::new(0, 2200, 1080, 140),
        background_color: 0x8000_0000,
        content_color: 0xFFFF_FFFF,
    }];
    manager.fire(|listener| {
        if let Some(listener) = listener.as_system_bar_changed() {
            listener.on_system_bar_property_change(7, &tints);
        }
    });
    scheduler.process_pending();

    let payload = &callback.take_first_args()[0];
    assert_eq!(payload["displayId"], json!(7));
    let tint = &payload["regionTint"][0];
    assert_eq!(tint["type"], json!("navigationBar"));
    assert_eq!(tint["isEnable"], json!(false));
    assert_eq!(tint["backgroundColor"], json!("#80000000"));
}

#[test]
fn test_screen_events_routed_by_name() {
    let manager = MockTarget::new();
    let scheduler = Arc::new(PumpedScheduler::new());
    let facade = RegistrationFacade::for_screen_manager(manager.clone(), scheduler.clone());
    let connect = Recorder::new();
    let disconnect = Recorder::new();
    let change = Recorder::new();
    facade.on("connect", &connect.value(), None).unwrap();
    facade.on("disconnect", &disconnect.value(), None).unwrap();
    facade.on("change", &change.value(), None).unwrap();
    assert_eq!(manager.installed(), 3);

    manager.fire(|listener| {
        if let Some(listener) = listener.as_screen() {
            listener.on_connect(1);
            listener.on_disconnect(2);
            listener.on_change(&[3, 4], ScreenChangeEvent::Update);
        }
    });
    scheduler.process_pending();

    assert_eq!(connect.take_first_args(), vec![json!(1)]);
    assert_eq!(disconnect.take_first_args(), vec![json!(2)]);
    assert_eq!(change.take_first_args(), vec![json!(3), json!(4)]);
}

#[test]
fn test_scheduler_shutdown_drops_events() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade.on("screenshot", &callback.value(), None).unwrap();

    fx.scheduler.shutdown();
    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_screenshot() {
            listener.on_screenshot();
        }
    });

    assert_eq!(fx.scheduler.pending_count(), 0);
    assert!(callback.take().is_empty());
}

#[test]
fn test_revoked_callback_not_invoked() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade.on("screenshot", &callback.value(), None).unwrap();

    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_screenshot() {
            listener.on_screenshot();
        }
    });
    callback.function().revoke();
    fx.flush();

    assert!(callback.take().is_empty());
    let snapshot = fx.facade.registry().snapshot();
    assert!(!snapshot.buckets[0].listeners[0].callback_alive);
}

#[test]
fn test_queued_event_after_unregister_is_dropped() {
    let fx = Fixture::window();
    let callback = Recorder::new();
    fx.facade.on("screenshot", &callback.value(), None).unwrap();

    fx.target.fire(|listener| {
        if let Some(listener) = listener.as_screenshot() {
            listener.on_screenshot();
        }
    });
    fx.facade.off("screenshot", None).unwrap();

    assert_eq!(fx.flush(), 1);
    assert!(callback.take().is_empty());
}
