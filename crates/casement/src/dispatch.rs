//! Event-type resolution and native subscription routing.
//!
//! An event name is resolved once, per [`ObjectCategory`], into an
//! [`EventKind`]. Each kind has a static [`EventRoute`] that knows which
//! native capability to install and how to validate the registration
//! parameter. Names outside a category's vocabulary are rejected.

use std::sync::Arc;

use serde_json::Value;

use crate::adapter::{ListenerOptions, NativeListenerAdapter};
use crate::error::{ListenerError, NativeResult, Result};
use crate::target::{ListenerCapability, NativeTarget};
use crate::types::ObjectCategory;
use casement_core::logging::targets;

/// Largest accepted no-interaction timeout in seconds.
pub const NO_INTERACTION_TIMEOUT_MAX_SECS: i64 = i64::MAX / 1000;

/// Every event a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    // Window manager
    SystemBarTintChange,
    GestureNavigationEnabledChange,
    WaterMarkFlagChange,
    // Window
    WindowSizeChange,
    SystemAvoidAreaChange,
    AvoidAreaChange,
    LifeCycleEvent,
    WindowEvent,
    KeyboardHeightChange,
    TouchOutside,
    Screenshot,
    DialogTargetTouch,
    DialogDeathRecipient,
    WindowStatusChange,
    WindowVisibilityChange,
    NoInteractionDetected,
    WindowRectChange,
    DisplayIdChange,
    SystemDensityChange,
    SubWindowClose,
    WindowWillClose,
    KeyboardWillShow,
    KeyboardWillHide,
    KeyboardDidShow,
    KeyboardDidHide,
    ScreenshotAppEvent,
    WindowStatusDidChange,
    WindowTitleButtonRectChange,
    OcclusionStateChange,
    FrameMetricsMeasuredChange,
    AcrossDisplaysChange,
    RectChangeInGlobalDisplay,
    ExtensionSecureLimitChange,
    WindowHighlightChange,
    WindowRotationChange,
    FreeWindowModeChange,
    // Window stage
    WindowStageEvent,
    WindowStageClose,
    WindowStageLifecycleEvent,
    // Screen manager
    ScreenConnect,
    ScreenDisconnect,
    ScreenChange,
}

const WINDOW_MANAGER_EVENTS: &[EventKind] = &[
    EventKind::SystemBarTintChange,
    EventKind::GestureNavigationEnabledChange,
    EventKind::WaterMarkFlagChange,
];

const WINDOW_EVENTS: &[EventKind] = &[
    EventKind::WindowSizeChange,
    EventKind::SystemAvoidAreaChange,
    EventKind::AvoidAreaChange,
    EventKind::LifeCycleEvent,
    EventKind::WindowEvent,
    EventKind::KeyboardHeightChange,
    EventKind::TouchOutside,
    EventKind::Screenshot,
    EventKind::DialogTargetTouch,
    EventKind::DialogDeathRecipient,
    EventKind::WindowStatusChange,
    EventKind::WindowVisibilityChange,
    EventKind::NoInteractionDetected,
    EventKind::WindowRectChange,
    EventKind::DisplayIdChange,
    EventKind::SystemDensityChange,
    EventKind::SubWindowClose,
    EventKind::WindowWillClose,
    EventKind::KeyboardWillShow,
    EventKind::KeyboardWillHide,
    EventKind::KeyboardDidShow,
    EventKind::KeyboardDidHide,
    EventKind::ScreenshotAppEvent,
    EventKind::WindowStatusDidChange,
    EventKind::WindowTitleButtonRectChange,
    EventKind::OcclusionStateChange,
    EventKind::FrameMetricsMeasuredChange,
    EventKind::AcrossDisplaysChange,
    EventKind::RectChangeInGlobalDisplay,
    EventKind::ExtensionSecureLimitChange,
    EventKind::WindowHighlightChange,
    EventKind::WindowRotationChange,
    EventKind::FreeWindowModeChange,
];

const WINDOW_STAGE_EVENTS: &[EventKind] = &[
    EventKind::WindowStageEvent,
    EventKind::WindowStageClose,
    EventKind::WindowStageLifecycleEvent,
];

const SCREEN_MANAGER_EVENTS: &[EventKind] = &[
    EventKind::ScreenConnect,
    EventKind::ScreenDisconnect,
    EventKind::ScreenChange,
];

impl EventKind {
    /// The event name consumers register with.
    pub fn name(self) -> &'static str {
        match self {
            Self::SystemBarTintChange => "systemBarTintChange",
            Self::GestureNavigationEnabledChange => "gestureNavigationEnabledChange",
            Self::WaterMarkFlagChange => "waterMarkFlagChange",
            Self::WindowSizeChange => "windowSizeChange",
            Self::SystemAvoidAreaChange => "systemAvoidAreaChange",
            Self::AvoidAreaChange => "avoidAreaChange",
            Self::LifeCycleEvent => "lifeCycleEvent",
            Self::WindowEvent => "windowEvent",
            Self::KeyboardHeightChange => "keyboardHeightChange",
            Self::TouchOutside => "touchOutside",
            Self::Screenshot => "screenshot",
            Self::DialogTargetTouch => "dialogTargetTouch",
            Self::DialogDeathRecipient => "dialogDeathRecipient",
            Self::WindowStatusChange => "windowStatusChange",
            Self::WindowVisibilityChange => "windowVisibilityChange",
            Self::NoInteractionDetected => "noInteractionDetected",
            Self::WindowRectChange => "rectChange",
            Self::DisplayIdChange => "displayIdChange",
            Self::SystemDensityChange => "systemDensityChange",
            Self::SubWindowClose => "subWindowClose",
            Self::WindowWillClose => "windowWillClose",
            Self::KeyboardWillShow => "keyboardWillShow",
            Self::KeyboardWillHide => "keyboardWillHide",
            Self::KeyboardDidShow => "keyboardDidShow",
            Self::KeyboardDidHide => "keyboardDidHide",
            Self::ScreenshotAppEvent => "screenshotAppEvent",
            Self::WindowStatusDidChange => "windowStatusDidChange",
            Self::WindowTitleButtonRectChange => "windowTitleButtonRectChange",
            Self::OcclusionStateChange => "occlusionStateChange",
            Self::FrameMetricsMeasuredChange => "frameMetricsMeasuredChange",
            Self::AcrossDisplaysChange => "acrossDisplaysChange",
            Self::RectChangeInGlobalDisplay => "rectChangeInGlobalDisplay",
            Self::ExtensionSecureLimitChange => "uiExtensionSecureLimitChange",
            Self::WindowHighlightChange => "windowHighlightChange",
            Self::WindowRotationChange => "windowRotationChange",
            Self::FreeWindowModeChange => "freeWindowModeChange",
            Self::WindowStageEvent => "windowStageEvent",
            Self::WindowStageClose => "windowStageClose",
            Self::WindowStageLifecycleEvent => "windowStageLifecycleEvent",
            Self::ScreenConnect => "connect",
            Self::ScreenDisconnect => "disconnect",
            Self::ScreenChange => "change",
        }
    }

    /// The category whose vocabulary contains this kind.
    pub fn category(self) -> ObjectCategory {
        ObjectCategory::ALL
            .into_iter()
            .find(|category| DispatchTable::events(*category).contains(&self))
            .unwrap_or(ObjectCategory::Window)
    }

    /// Whether this kind answers a close request.
    pub fn is_close(self) -> bool {
        matches!(
            self,
            Self::WindowWillClose | Self::SubWindowClose | Self::WindowStageClose
        )
    }

    /// Whether delivery blocks the native caller for a consumer decision.
    pub fn is_blocking(self) -> bool {
        self.is_close() || self == Self::WindowRotationChange
    }

    /// The route that installs listeners of this kind.
    pub fn route(self) -> &'static dyn EventRoute {
        match self {
            Self::SystemBarTintChange => &SYSTEM_BAR_CHANGED,
            Self::GestureNavigationEnabledChange => &GESTURE_NAVIGATION_ENABLED,
            Self::WaterMarkFlagChange => &WATER_MARK_FLAG,
            Self::WindowSizeChange => &WINDOW_CHANGE,
            Self::SystemAvoidAreaChange | Self::AvoidAreaChange => &AVOID_AREA_CHANGED,
            Self::LifeCycleEvent | Self::WindowEvent | Self::WindowStageEvent => &LIFECYCLE,
            Self::KeyboardHeightChange => &OCCUPIED_AREA_CHANGE,
            Self::TouchOutside => &TOUCH_OUTSIDE,
            Self::Screenshot => &SCREENSHOT,
            Self::DialogTargetTouch => &DIALOG_TARGET_TOUCH,
            Self::DialogDeathRecipient => &DialogDeathRoute,
            Self::WindowStatusChange => &WINDOW_STATUS_CHANGE,
            Self::WindowVisibilityChange => &VISIBILITY_CHANGED,
            Self::NoInteractionDetected => &NoInteractionRoute,
            Self::WindowRectChange => &RECT_CHANGE,
            Self::DisplayIdChange => &DISPLAY_ID_CHANGE,
            Self::SystemDensityChange => &SYSTEM_DENSITY_CHANGE,
            Self::SubWindowClose => &SUB_WINDOW_CLOSE,
            Self::WindowWillClose => &WINDOW_WILL_CLOSE,
            Self::WindowStageClose => &MAIN_WINDOW_CLOSE,
            Self::WindowStageLifecycleEvent => &WINDOW_STAGE_LIFECYCLE,
            Self::KeyboardWillShow => &KEYBOARD_WILL_SHOW,
            Self::KeyboardWillHide => &KEYBOARD_WILL_HIDE,
            Self::KeyboardDidShow => &KEYBOARD_DID_SHOW,
            Self::KeyboardDidHide => &KEYBOARD_DID_HIDE,
            Self::ScreenshotAppEvent => &SCREENSHOT_APP_EVENT,
            Self::WindowStatusDidChange => &WINDOW_STATUS_DID_CHANGE,
            Self::WindowTitleButtonRectChange => &WINDOW_TITLE_BUTTON_RECT,
            Self::OcclusionStateChange => &OCCLUSION_STATE,
            Self::FrameMetricsMeasuredChange => &FRAME_METRICS,
            Self::AcrossDisplaysChange => &ACROSS_DISPLAYS,
            Self::RectChangeInGlobalDisplay => &RECT_CHANGE_IN_GLOBAL_DISPLAY,
            Self::ExtensionSecureLimitChange => &EXTENSION_SECURE_LIMIT,
            Self::WindowHighlightChange => &WINDOW_HIGHLIGHT,
            Self::WindowRotationChange => &WINDOW_ROTATION,
            Self::FreeWindowModeChange => &FREE_WINDOW_MODE,
            Self::ScreenConnect | Self::ScreenDisconnect | Self::ScreenChange => &SCREEN,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static per-category event vocabulary.
pub struct DispatchTable;

impl DispatchTable {
    /// Resolve an event name for a category.
    ///
    /// `None` means the event is not supported for that category and must
    /// be reported as an error.
    pub fn lookup(category: ObjectCategory, event_type: &str) -> Option<EventKind> {
        Self::events(category)
            .iter()
            .copied()
            .find(|kind| kind.name() == event_type)
    }

    /// Resolve an event name or fail with [`ListenerError::UnsupportedEvent`].
    pub fn resolve(category: ObjectCategory, event_type: &str) -> Result<EventKind> {
        Self::lookup(category, event_type).ok_or_else(|| {
            tracing::debug!(target: targets::DISPATCH, %category, event_type, "unsupported event type");
            ListenerError::unsupported(category, event_type)
        })
    }

    /// All events supported for a category.
    pub fn events(category: ObjectCategory) -> &'static [EventKind] {
        match category {
            ObjectCategory::WindowManager => WINDOW_MANAGER_EVENTS,
            ObjectCategory::Window => WINDOW_EVENTS,
            ObjectCategory::WindowStage => WINDOW_STAGE_EVENTS,
            ObjectCategory::ScreenManager => SCREEN_MANAGER_EVENTS,
        }
    }
}

/// Installs and removes listeners of one event kind on a native target.
pub trait EventRoute: Send + Sync {
    /// Validate the registration parameter and derive listener options.
    fn configure(&self, _parameter: Option<&Value>) -> Result<ListenerOptions> {
        Ok(ListenerOptions::default())
    }

    /// Call the native registration API for this kind.
    fn subscribe(&self, target: &dyn NativeTarget, adapter: &Arc<NativeListenerAdapter>) -> NativeResult;

    /// The exact inverse of [`subscribe`](Self::subscribe).
    fn unsubscribe(
        &self,
        target: &dyn NativeTarget,
        adapter: &Arc<NativeListenerAdapter>,
    ) -> NativeResult;
}

type WrapFn = fn(Arc<NativeListenerAdapter>) -> ListenerCapability;

/// Installs the adapter as a single native capability.
pub struct CapabilityRoute {
    wrap: WrapFn,
}

impl CapabilityRoute {
    const fn new(wrap: WrapFn) -> Self {
        Self { wrap }
    }

    /// The capability this route installs for `adapter`.
    pub fn capability(&self, adapter: &Arc<NativeListenerAdapter>) -> ListenerCapability {
        (self.wrap)(adapter.clone())
    }
}

impl EventRoute for CapabilityRoute {
    fn subscribe(&self, target: &dyn NativeTarget, adapter: &Arc<NativeListenerAdapter>) -> NativeResult {
        target.subscribe(self.capability(adapter))
    }

    fn unsubscribe(
        &self,
        target: &dyn NativeTarget,
        adapter: &Arc<NativeListenerAdapter>,
    ) -> NativeResult {
        target.unsubscribe(self.capability(adapter))
    }
}

macro_rules! capability_routes {
    ($( $route:ident => $variant:ident; )*) => {
        $(
            static $route: CapabilityRoute = CapabilityRoute::new(|adapter| ListenerCapability::$variant(adapter));
        )*
    };
}

capability_routes! {
    LIFECYCLE => Lifecycle;
    WINDOW_STAGE_LIFECYCLE => WindowStageLifecycle;
    WINDOW_CHANGE => WindowChange;
    RECT_CHANGE => RectChange;
    AVOID_AREA_CHANGED => AvoidAreaChanged;
    SYSTEM_BAR_CHANGED => SystemBarChanged;
    VISIBILITY_CHANGED => VisibilityChanged;
    TOUCH_OUTSIDE => TouchOutside;
    SCREENSHOT => Screenshot;
    DIALOG_TARGET_TOUCH => DialogTargetTouch;
    WINDOW_WILL_CLOSE => WindowWillClose;
    SUB_WINDOW_CLOSE => SubWindowClose;
    MAIN_WINDOW_CLOSE => MainWindowClose;
    SCREEN => Screen;
    OCCUPIED_AREA_CHANGE => OccupiedAreaChange;
    WINDOW_STATUS_CHANGE => WindowStatusChange;
    DISPLAY_ID_CHANGE => DisplayIdChange;
    SYSTEM_DENSITY_CHANGE => SystemDensityChange;
    GESTURE_NAVIGATION_ENABLED => GestureNavigationEnabledChanged;
    WATER_MARK_FLAG => WaterMarkFlagChanged;
    KEYBOARD_WILL_SHOW => KeyboardWillShow;
    KEYBOARD_WILL_HIDE => KeyboardWillHide;
    KEYBOARD_DID_SHOW => KeyboardDidShow;
    KEYBOARD_DID_HIDE => KeyboardDidHide;
    SCREENSHOT_APP_EVENT => ScreenshotAppEvent;
    WINDOW_STATUS_DID_CHANGE => WindowStatusDidChange;
    WINDOW_TITLE_BUTTON_RECT => WindowTitleButtonRectChanged;
    OCCLUSION_STATE => OcclusionStateChanged;
    FRAME_METRICS => FrameMetricsChanged;
    ACROSS_DISPLAYS => AcrossDisplaysChange;
    RECT_CHANGE_IN_GLOBAL_DISPLAY => RectChangeInGlobalDisplay;
    EXTENSION_SECURE_LIMIT => ExtensionSecureLimitChange;
    WINDOW_HIGHLIGHT => WindowHighlightChange;
    WINDOW_ROTATION => WindowRotationChange;
    FREE_WINDOW_MODE => FreeWindowModeChange;
}

/// No-interaction listeners carry a timeout in seconds.
pub struct NoInteractionRoute;

impl NoInteractionRoute {
    fn capability(adapter: &Arc<NativeListenerAdapter>) -> ListenerCapability {
        ListenerCapability::NoInteraction(adapter.clone())
    }
}

impl EventRoute for NoInteractionRoute {
    fn configure(&self, parameter: Option<&Value>) -> Result<ListenerOptions> {
        let Some(parameter) = parameter else {
            return Err(ListenerError::invalid_param(
                "noInteractionDetected requires a timeout",
            ));
        };
        let Some(timeout) = parameter.as_i64() else {
            return Err(ListenerError::invalid_param(format!(
                "timeout must be an integer number of seconds, got {parameter}"
            )));
        };
        if timeout <= 0 || timeout > NO_INTERACTION_TIMEOUT_MAX_SECS {
            return Err(ListenerError::invalid_param(format!(
                "timeout {timeout} is out of range (0, {NO_INTERACTION_TIMEOUT_MAX_SECS}]"
            )));
        }
        Ok(ListenerOptions {
            // In range, so neither the product nor the cast can overflow.
            no_interaction_timeout_ms: Some(timeout as u64 * 1000),
        })
    }

    fn subscribe(&self, target: &dyn NativeTarget, adapter: &Arc<NativeListenerAdapter>) -> NativeResult {
        target.subscribe(Self::capability(adapter))
    }

    fn unsubscribe(
        &self,
        target: &dyn NativeTarget,
        adapter: &Arc<NativeListenerAdapter>,
    ) -> NativeResult {
        target.unsubscribe(Self::capability(adapter))
    }
}

/// Dialog death registration is fire-and-forget in both directions; the
/// native result is logged and discarded.
pub struct DialogDeathRoute;

impl DialogDeathRoute {
    fn capability(adapter: &Arc<NativeListenerAdapter>) -> ListenerCapability {
        ListenerCapability::DialogDeathRecipient(adapter.clone())
    }
}

impl EventRoute for DialogDeathRoute {
    fn subscribe(&self, target: &dyn NativeTarget, adapter: &Arc<NativeListenerAdapter>) -> NativeResult {
        if let Err(err) = target.subscribe(Self::capability(adapter)) {
            tracing::debug!(
                target: targets::DISPATCH,
                listener = ?adapter.id(),
                %err,
                "dialog death recipient subscribe result ignored"
            );
        }
        Ok(())
    }

    fn unsubscribe(
        &self,
        target: &dyn NativeTarget,
        adapter: &Arc<NativeListenerAdapter>,
    ) -> NativeResult {
        if let Err(err) = target.unsubscribe(Self::capability(adapter)) {
            tracing::debug!(
                target: targets::DISPATCH,
                listener = ?adapter.id(),
                %err,
                "dialog death recipient unsubscribe result ignored"
            );
        }
        Ok(())
    }
}
