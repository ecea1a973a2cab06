//! The native listener adapter.
//!
//! One [`NativeListenerAdapter`] is created per registered callback. It
//! implements every native listener capability and is bound to exactly one
//! [`EventKind`]; capability calls that do not belong to its kind are
//! ignored, so a target may share one listener interface between several
//! event names.
//!
//! # Delivery
//!
//! Native callbacks arrive on arbitrary threads. For ordinary events the
//! adapter builds a payload and posts an ordered task to the consumer
//! scheduler, then returns immediately. Close events, rotation size changes
//! and rotation changes use a blocking hand-off instead: the native thread
//! waits until the consumer has run the callback. While a blocking call is in flight the
//! adapter reports itself busy and the registry refuses to remove it.
//!
//! Posted tasks do not hold the adapter. They carry its [`ListenerId`] and a
//! weak reference to the [`ListenerArena`], and re-resolve the adapter when
//! they run. If the listener was removed in the meantime the task does
//! nothing.
//!
//! # Deduplication
//!
//! - Size changes with the same width and height as the last accepted one
//!   are dropped unless the reason is `DragEnd` or `Rotation`.
//! - Rect changes identical to the last delivered rect are dropped.
//! - Foreground is only reported from the initial or hidden state, and
//!   background only from the initial or shown state. Focus changes are
//!   always reported.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use slotmap::{SlotMap, new_key_type};

use casement_core::logging::targets;
use casement_core::{ConsumerScheduler, QueuedInvocation, call_blocking};

use crate::dispatch::EventKind;
use crate::handle::CallbackHandle;
use crate::payload::{ConsumerPayload, NativeEvent, PayloadBuilder};
use crate::target::{
    AcrossDisplaysChangeListener, AvoidAreaChangedListener, DialogDeathRecipientListener,
    DialogTargetTouchListener, DisplayIdChangeListener, ExtensionSecureLimitChangeListener,
    FrameMetricsChangedListener, FreeWindowModeChangeListener,
    GestureNavigationEnabledChangedListener, KeyboardTransitionListener, LifecycleListener,
    MainWindowCloseListener, NativeListener, NoInteractionListener, OcclusionStateChangedListener,
    OccupiedAreaChangeListener, RectChangeInGlobalDisplayListener, RectChangeListener,
    ScreenListener, ScreenshotAppEventListener, ScreenshotListener, SubWindowCloseListener,
    SystemBarChangedListener, SystemDensityChangeListener, TouchOutsideListener,
    VisibilityChangedListener, WaterMarkFlagChangedListener, WindowChangeListener,
    WindowHighlightChangeListener, WindowRotationChangeListener, WindowStageLifecycleListener,
    WindowStatusChangeListener, WindowStatusDidChangeListener,
    WindowTitleButtonRectChangedListener, WindowWillCloseListener,
};
use crate::types::{
    AvoidArea, AvoidAreaType, DisplayId, FrameMetrics, KeyboardPanelInfo, LifeCycleEventType,
    ObjectCategory, OcclusionState, Rect, RotationChangeInfo, RotationChangeResult,
    ScreenChangeEvent, ScreenId, ScreenshotEventType, SystemBarRegionTint, TitleButtonRect,
    WindowSizeChangeReason, WindowStageLifecycleEventType, WindowStatus,
};

new_key_type! {
    /// Identity of a registered listener.
    pub struct ListenerId;
}

/// Owns every live adapter of a registry, keyed by [`ListenerId`].
#[derive(Default)]
pub struct ListenerArena {
    listeners: RwLock<SlotMap<ListenerId, Arc<NativeListenerAdapter>>>,
}

impl ListenerArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live adapter.
    pub fn get(&self, id: ListenerId) -> Option<Arc<NativeListenerAdapter>> {
        self.listeners.read().get(id).cloned()
    }

    /// Whether `id` refers to a live adapter.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.read().contains_key(id)
    }

    /// Number of live adapters.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert_with(
        &self,
        f: impl FnOnce(ListenerId) -> NativeListenerAdapter,
    ) -> Arc<NativeListenerAdapter> {
        let mut listeners = self.listeners.write();
        let id = listeners.insert_with_key(|id| Arc::new(f(id)));
        listeners[id].clone()
    }

    pub(crate) fn remove(&self, id: ListenerId) -> Option<Arc<NativeListenerAdapter>> {
        self.listeners.write().remove(id)
    }
}

impl std::fmt::Debug for ListenerArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerArena")
            .field("len", &self.len())
            .finish()
    }
}

/// Per-listener settings derived from the registration parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Timeout for no-interaction listeners, in milliseconds.
    pub no_interaction_timeout_ms: Option<u64>,
}

/// Visibility state used to deduplicate foreground/background events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Initial,
    Shown,
    Hidden,
}

#[derive(Debug, Default)]
struct AdapterState {
    window: WindowState,
    last_size: Rect,
    last_rect: Option<Rect>,
}

/// Everything an adapter needs from its registry.
pub(crate) struct AdapterContext {
    pub category: ObjectCategory,
    pub kind: EventKind,
    pub handle: CallbackHandle,
    pub arena: Weak<ListenerArena>,
    pub scheduler: Arc<dyn ConsumerScheduler>,
    pub payloads: Arc<dyn PayloadBuilder>,
    pub options: ListenerOptions,
}

/// Marks a blocking call as in flight for its lifetime.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Bridges native listener callbacks to one consumer callback.
pub struct NativeListenerAdapter {
    id: ListenerId,
    category: ObjectCategory,
    kind: EventKind,
    handle: CallbackHandle,
    arena: Weak<ListenerArena>,
    scheduler: Arc<dyn ConsumerScheduler>,
    payloads: Arc<dyn PayloadBuilder>,
    options: ListenerOptions,
    state: Mutex<AdapterState>,
    in_flight: AtomicUsize,
}

impl NativeListenerAdapter {
    pub(crate) fn new(id: ListenerId, context: AdapterContext) -> Self {
        Self {
            id,
            category: context.category,
            kind: context.kind,
            handle: context.handle,
            arena: context.arena,
            scheduler: context.scheduler,
            payloads: context.payloads,
            options: context.options,
            state: Mutex::new(AdapterState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Identity of this adapter.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Category of the target this adapter is installed on.
    pub fn category(&self) -> ObjectCategory {
        self.category
    }

    /// The event kind this adapter delivers.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The consumer callback this adapter delivers to.
    pub fn handle(&self) -> &CallbackHandle {
        &self.handle
    }

    /// Whether a blocking call is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Current visibility state.
    pub fn window_state(&self) -> WindowState {
        self.state.lock().window
    }

    fn accepts(&self, event: &NativeEvent) -> bool {
        if event.belongs_to(self.kind) {
            return true;
        }
        tracing::trace!(
            target: targets::ADAPTER,
            listener = ?self.id,
            kind = %self.kind,
            event = event.name(),
            "ignoring event for another kind"
        );
        false
    }

    fn build(&self, event: &NativeEvent) -> Option<ConsumerPayload> {
        match self.payloads.build(self.kind, event) {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::error!(
                    target: targets::PAYLOAD,
                    listener = ?self.id,
                    kind = %self.kind,
                    %err,
                    "failed to build payload, event dropped"
                );
                None
            }
        }
    }

    /// Post an ordered, fire-and-forget delivery.
    fn post(&self, event: NativeEvent) {
        let Some(payload) = self.build(&event) else {
            return;
        };

        let arena = self.arena.clone();
        let id = self.id;
        let invocation = QueuedInvocation::new(move || {
            deliver(&arena, id, &payload);
        });

        match self.scheduler.post(invocation) {
            Ok(()) => tracing::trace!(
                target: targets::ADAPTER,
                listener = ?self.id,
                kind = %self.kind,
                event = event.name(),
                "event posted"
            ),
            Err(err) => tracing::warn!(
                target: targets::ADAPTER,
                listener = ?self.id,
                kind = %self.kind,
                event = event.name(),
                %err,
                "consumer scheduler rejected event, dropped"
            ),
        }
    }

    /// Deliver on the consumer thread and wait for the callback's result.
    fn deliver_blocking(&self, event: NativeEvent) -> Option<Value> {
        let _in_flight = InFlight::enter(&self.in_flight);
        let payload = self.build(&event)?;

        let arena = self.arena.clone();
        let id = self.id;
        match call_blocking(&*self.scheduler, move || deliver(&arena, id, &payload)) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    target: targets::ADAPTER,
                    listener = ?self.id,
                    kind = %self.kind,
                    event = event.name(),
                    %err,
                    "blocking delivery failed, event dropped"
                );
                None
            }
        }
    }

    /// Ask the consumer whether to stop a close.
    fn intercept_close(&self) -> bool {
        if !self.accepts(&NativeEvent::CloseRequest) {
            return false;
        }
        let decision = self
            .deliver_blocking(NativeEvent::CloseRequest)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        tracing::debug!(
            target: targets::ADAPTER,
            listener = ?self.id,
            kind = %self.kind,
            terminate_close = decision,
            "close request answered"
        );
        decision
    }

    fn lifecycle(&self, event_type: LifeCycleEventType) {
        let event = NativeEvent::Lifecycle(event_type);
        if self.accepts(&event) {
            self.post(event);
        }
    }

    /// Apply a foreground/background transition.
    ///
    /// The state lock is released before posting: an inline scheduler runs
    /// the callback right away, and the callback may drive this adapter again.
    fn transition(&self, to: WindowState, event: NativeEvent) {
        if !self.accepts(&event) {
            return;
        }
        {
            let mut state = self.state.lock();
            let allowed = match to {
                WindowState::Shown => {
                    matches!(state.window, WindowState::Initial | WindowState::Hidden)
                }
                WindowState::Hidden => {
                    matches!(state.window, WindowState::Initial | WindowState::Shown)
                }
                WindowState::Initial => false,
            };
            if !allowed {
                tracing::debug!(
                    target: targets::ADAPTER,
                    listener = ?self.id,
                    state = ?state.window,
                    "window already {:?}, transition dropped",
                    to
                );
                return;
            }
            state.window = to;
        }
        self.post(event);
    }
}

/// Resolve the listener and run its callback. Runs on the consumer thread.
fn deliver(arena: &Weak<ListenerArena>, id: ListenerId, payload: &ConsumerPayload) -> Option<Value> {
    let Some(adapter) = arena.upgrade().and_then(|arena| arena.get(id)) else {
        tracing::trace!(target: targets::ADAPTER, listener = ?id, "listener gone, delivery skipped");
        return None;
    };
    if !adapter.handle.is_alive() {
        tracing::trace!(target: targets::ADAPTER, listener = ?id, "callback no longer alive");
        return None;
    }
    adapter.handle.invoke(&payload.args)
}

impl std::fmt::Debug for NativeListenerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeListenerAdapter")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl NativeListener for NativeListenerAdapter {
    fn listener_id(&self) -> ListenerId {
        self.id
    }
}

impl LifecycleListener for NativeListenerAdapter {
    fn after_foreground(&self) {
        self.transition(
            WindowState::Shown,
            NativeEvent::Lifecycle(LifeCycleEventType::Foreground),
        );
    }

    fn after_background(&self) {
        self.transition(
            WindowState::Hidden,
            NativeEvent::Lifecycle(LifeCycleEventType::Background),
        );
    }

    fn after_focused(&self) {
        self.lifecycle(LifeCycleEventType::Active);
    }

    fn after_unfocused(&self) {
        self.lifecycle(LifeCycleEventType::Inactive);
    }

    fn after_resumed(&self) {
        if self.category == ObjectCategory::WindowStage {
            self.lifecycle(LifeCycleEventType::Resumed);
        }
    }

    fn after_paused(&self) {
        if self.category == ObjectCategory::WindowStage {
            self.lifecycle(LifeCycleEventType::Paused);
        }
    }

    fn after_destroyed(&self) {
        if self.category == ObjectCategory::Window {
            self.lifecycle(LifeCycleEventType::Destroyed);
        }
    }
}

impl WindowStageLifecycleListener for NativeListenerAdapter {
    fn after_lifecycle_foreground(&self) {
        if self.category == ObjectCategory::WindowStage {
            self.transition(
                WindowState::Shown,
                NativeEvent::StageLifecycle(WindowStageLifecycleEventType::Shown),
            );
        }
    }

    fn after_lifecycle_background(&self) {
        if self.category == ObjectCategory::WindowStage {
            self.transition(
                WindowState::Hidden,
                NativeEvent::StageLifecycle(WindowStageLifecycleEventType::Hidden),
            );
        }
    }

    fn after_lifecycle_resumed(&self) {
        let event = NativeEvent::StageLifecycle(WindowStageLifecycleEventType::Resumed);
        if self.category == ObjectCategory::WindowStage && self.accepts(&event) {
            self.post(event);
        }
    }

    fn after_lifecycle_paused(&self) {
        let event = NativeEvent::StageLifecycle(WindowStageLifecycleEventType::Paused);
        if self.category == ObjectCategory::WindowStage && self.accepts(&event) {
            self.post(event);
        }
    }
}

impl WindowChangeListener for NativeListenerAdapter {
    fn on_size_change(&self, rect: Rect, reason: WindowSizeChangeReason) {
        let event = NativeEvent::SizeChange { rect, reason };
        if !self.accepts(&event) {
            return;
        }

        {
            let mut state = self.state.lock();
            if state.last_size.same_size(&rect)
                && !matches!(
                    reason,
                    WindowSizeChangeReason::DragEnd | WindowSizeChangeReason::Rotation
                )
            {
                tracing::debug!(
                    target: targets::ADAPTER,
                    listener = ?self.id,
                    width = rect.width,
                    height = rect.height,
                    ?reason,
                    "size unchanged, event dropped"
                );
                return;
            }
            state.last_size = rect;
        }

        if reason == WindowSizeChangeReason::Rotation {
            // A rotation commit has a deadline; deliver before returning.
            self.deliver_blocking(event);
        } else {
            self.post(event);
        }
    }
}

impl RectChangeListener for NativeListenerAdapter {
    fn on_rect_change(&self, rect: Rect, reason: WindowSizeChangeReason) {
        let event = NativeEvent::RectChange { rect, reason };
        if !self.accepts(&event) {
            return;
        }

        if self.state.lock().last_rect.replace(rect) == Some(rect) {
            tracing::debug!(target: targets::ADAPTER, listener = ?self.id, "rect unchanged, event dropped");
            return;
        }
        self.post(event);
    }
}

impl AvoidAreaChangedListener for NativeListenerAdapter {
    fn on_avoid_area_changed(&self, area: AvoidArea, area_type: AvoidAreaType) {
        let event = NativeEvent::AvoidAreaChange { area, area_type };
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl SystemBarChangedListener for NativeListenerAdapter {
    fn on_system_bar_property_change(&self, display_id: DisplayId, tints: &[SystemBarRegionTint]) {
        let event = NativeEvent::SystemBarChange {
            display_id,
            tints: tints.to_vec(),
        };
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl VisibilityChangedListener for NativeListenerAdapter {
    fn on_visibility_changed(&self, visible: bool) {
        let event = NativeEvent::VisibilityChange(visible);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl TouchOutsideListener for NativeListenerAdapter {
    fn on_touch_outside(&self) {
        if self.accepts(&NativeEvent::TouchOutside) {
            self.post(NativeEvent::TouchOutside);
        }
    }
}

impl ScreenshotListener for NativeListenerAdapter {
    fn on_screenshot(&self) {
        if self.accepts(&NativeEvent::Screenshot) {
            self.post(NativeEvent::Screenshot);
        }
    }
}

impl DialogTargetTouchListener for NativeListenerAdapter {
    fn on_dialog_target_touch(&self) {
        if self.accepts(&NativeEvent::DialogTargetTouch) {
            self.post(NativeEvent::DialogTargetTouch);
        }
    }
}

impl DialogDeathRecipientListener for NativeListenerAdapter {
    fn on_dialog_death_recipient(&self) {
        if self.accepts(&NativeEvent::DialogDeathRecipient) {
            self.post(NativeEvent::DialogDeathRecipient);
        }
    }
}

impl NoInteractionListener for NativeListenerAdapter {
    fn on_no_interaction_timeout(&self) {
        if self.accepts(&NativeEvent::NoInteractionTimeout) {
            self.post(NativeEvent::NoInteractionTimeout);
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.options.no_interaction_timeout_ms.unwrap_or_default()
    }
}

impl WindowWillCloseListener for NativeListenerAdapter {
    fn on_window_will_close(&self) -> bool {
        self.intercept_close()
    }
}

impl SubWindowCloseListener for NativeListenerAdapter {
    fn on_sub_window_close(&self) -> bool {
        self.intercept_close()
    }
}

impl MainWindowCloseListener for NativeListenerAdapter {
    fn on_main_window_close(&self) -> bool {
        self.intercept_close()
    }
}

impl ScreenListener for NativeListenerAdapter {
    fn on_connect(&self, id: ScreenId) {
        let event = NativeEvent::ScreenConnect(id);
        if self.accepts(&event) {
            self.post(event);
        }
    }

    fn on_disconnect(&self, id: ScreenId) {
        let event = NativeEvent::ScreenDisconnect(id);
        if self.accepts(&event) {
            self.post(event);
        }
    }

    fn on_change(&self, ids: &[ScreenId], event: ScreenChangeEvent) {
        if self.kind != EventKind::ScreenChange {
            return;
        }
        tracing::trace!(target: targets::ADAPTER, listener = ?self.id, ?event, count = ids.len(), "screens changed");
        for id in ids {
            self.post(NativeEvent::ScreenChange(*id));
        }
    }
}

impl OccupiedAreaChangeListener for NativeListenerAdapter {
    fn on_keyboard_height_change(&self, height: u32) {
        let event = NativeEvent::KeyboardHeightChange(height);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl WindowStatusChangeListener for NativeListenerAdapter {
    fn on_window_status_change(&self, status: WindowStatus) {
        let event = NativeEvent::WindowStatusChange(status);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl DisplayIdChangeListener for NativeListenerAdapter {
    fn on_display_id_changed(&self, display_id: DisplayId) {
        let event = NativeEvent::DisplayIdChange(display_id);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl SystemDensityChangeListener for NativeListenerAdapter {
    fn on_system_density_changed(&self, density: f32) {
        let event = NativeEvent::SystemDensityChange(density);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl GestureNavigationEnabledChangedListener for NativeListenerAdapter {
    fn on_gesture_navigation_enabled_change(&self, enabled: bool) {
        let event = NativeEvent::GestureNavigationEnabledChange(enabled);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl WaterMarkFlagChangedListener for NativeListenerAdapter {
    fn on_water_mark_flag_update(&self, show: bool) {
        let event = NativeEvent::WaterMarkFlagChange(show);
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl NativeListenerAdapter {
    /// Post `event` if it belongs to this adapter's kind.
    fn forward(&self, event: NativeEvent) {
        if self.accepts(&event) {
            self.post(event);
        }
    }
}

impl KeyboardTransitionListener for NativeListenerAdapter {
    fn on_keyboard_will_show(&self, info: KeyboardPanelInfo) {
        self.forward(NativeEvent::KeyboardWillShow(info));
    }

    fn on_keyboard_will_hide(&self, info: KeyboardPanelInfo) {
        self.forward(NativeEvent::KeyboardWillHide(info));
    }

    fn on_keyboard_did_show(&self, info: KeyboardPanelInfo) {
        self.forward(NativeEvent::KeyboardDidShow(info));
    }

    fn on_keyboard_did_hide(&self, info: KeyboardPanelInfo) {
        self.forward(NativeEvent::KeyboardDidHide(info));
    }
}

impl ScreenshotAppEventListener for NativeListenerAdapter {
    fn on_screenshot_app_event(&self, event: ScreenshotEventType) {
        self.forward(NativeEvent::ScreenshotAppEvent(event));
    }
}

impl WindowStatusDidChangeListener for NativeListenerAdapter {
    fn on_window_status_did_change(&self, status: WindowStatus) {
        self.forward(NativeEvent::WindowStatusDidChange(status));
    }
}

impl WindowTitleButtonRectChangedListener for NativeListenerAdapter {
    fn on_window_title_button_rect_changed(&self, rect: TitleButtonRect) {
        self.forward(NativeEvent::TitleButtonRectChange(rect));
    }
}

impl OcclusionStateChangedListener for NativeListenerAdapter {
    fn on_occlusion_state_changed(&self, state: OcclusionState) {
        self.forward(NativeEvent::OcclusionStateChange(state));
    }
}

impl FrameMetricsChangedListener for NativeListenerAdapter {
    fn on_frame_metrics_changed(&self, metrics: FrameMetrics) {
        self.forward(NativeEvent::FrameMetricsMeasured(metrics));
    }
}

impl AcrossDisplaysChangeListener for NativeListenerAdapter {
    fn on_across_displays_change(&self, across: bool) {
        self.forward(NativeEvent::AcrossDisplaysChange(across));
    }
}

impl RectChangeInGlobalDisplayListener for NativeListenerAdapter {
    fn on_rect_change_in_global_display(&self, rect: Rect, reason: WindowSizeChangeReason) {
        self.forward(NativeEvent::RectChangeInGlobalDisplay { rect, reason });
    }
}

impl ExtensionSecureLimitChangeListener for NativeListenerAdapter {
    fn on_secure_limit_change(&self, limited: bool) {
        self.forward(NativeEvent::ExtensionSecureLimitChange(limited));
    }
}

impl WindowHighlightChangeListener for NativeListenerAdapter {
    fn on_window_highlight_change(&self, highlighted: bool) {
        self.forward(NativeEvent::HighlightChange(highlighted));
    }
}

impl WindowRotationChangeListener for NativeListenerAdapter {
    fn on_rotation_change(&self, info: RotationChangeInfo) -> Option<RotationChangeResult> {
        let event = NativeEvent::RotationChange(info);
        if !self.accepts(&event) {
            return None;
        }
        let answer = self
            .deliver_blocking(event)
            .and_then(|value| RotationChangeResult::from_value(&value));
        tracing::debug!(
            target: targets::ADAPTER,
            listener = ?self.id,
            placed = answer.is_some(),
            "rotation change answered"
        );
        answer
    }
}

impl FreeWindowModeChangeListener for NativeListenerAdapter {
    fn on_free_window_mode_change(&self, enabled: bool) {
        self.forward(NativeEvent::FreeWindowModeChange(enabled));
    }
}

static_assertions::assert_impl_all!(NativeListenerAdapter: Send, Sync);
