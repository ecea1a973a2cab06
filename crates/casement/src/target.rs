//! Native listener capabilities and the target objects that accept them.
//!
//! A native window object exposes one subscribe/unsubscribe pair per
//! listener capability. Each capability is a trait; a target receives the
//! listener as a [`ListenerCapability`], stores it, and calls the trait
//! methods from whatever thread produces the event. Listeners are identified
//! by [`NativeListener::listener_id`], so a target can find the one to remove
//! on unsubscribe.
//!
//! All methods have empty default bodies, so a listener only implements what
//! it cares about.

use std::sync::Arc;

use crate::adapter::ListenerId;
use crate::error::NativeResult;
use crate::types::{
    AvoidArea, AvoidAreaType, DisplayId, FrameMetrics, KeyboardPanelInfo, OcclusionState, Rect,
    RotationChangeInfo, RotationChangeResult, ScreenChangeEvent, ScreenId, ScreenshotEventType,
    SystemBarRegionTint, TitleButtonRect, WindowSizeChangeReason, WindowStatus,
};

/// Common supertrait of all listener capabilities.
pub trait NativeListener: Send + Sync {
    /// Stable identity of this listener.
    fn listener_id(&self) -> ListenerId;
}

/// Window visibility and focus lifecycle.
pub trait LifecycleListener: NativeListener {
    fn after_foreground(&self) {}
    fn after_background(&self) {}
    fn after_focused(&self) {}
    fn after_unfocused(&self) {}
    fn after_resumed(&self) {}
    fn after_paused(&self) {}
    fn after_destroyed(&self) {}
}

/// Window stage lifecycle.
pub trait WindowStageLifecycleListener: NativeListener {
    fn after_lifecycle_foreground(&self) {}
    fn after_lifecycle_background(&self) {}
    fn after_lifecycle_resumed(&self) {}
    fn after_lifecycle_paused(&self) {}
}

/// Window size changes.
pub trait WindowChangeListener: NativeListener {
    fn on_size_change(&self, _rect: Rect, _reason: WindowSizeChangeReason) {}
}

/// Window rectangle changes.
pub trait RectChangeListener: NativeListener {
    fn on_rect_change(&self, _rect: Rect, _reason: WindowSizeChangeReason) {}
}

pub trait AvoidAreaChangedListener: NativeListener {
    fn on_avoid_area_changed(&self, _area: AvoidArea, _area_type: AvoidAreaType) {}
}

pub trait SystemBarChangedListener: NativeListener {
    fn on_system_bar_property_change(&self, _display_id: DisplayId, _tints: &[SystemBarRegionTint]) {}
}

pub trait VisibilityChangedListener: NativeListener {
    fn on_visibility_changed(&self, _visible: bool) {}
}

pub trait TouchOutsideListener: NativeListener {
    fn on_touch_outside(&self) {}
}

pub trait ScreenshotListener: NativeListener {
    fn on_screenshot(&self) {}
}

pub trait DialogTargetTouchListener: NativeListener {
    fn on_dialog_target_touch(&self) {}
}

pub trait DialogDeathRecipientListener: NativeListener {
    fn on_dialog_death_recipient(&self) {}
}

/// Fires after the window has seen no user input for a timeout.
pub trait NoInteractionListener: NativeListener {
    fn on_no_interaction_timeout(&self) {}

    /// Timeout in milliseconds the target should arm its timer with.
    fn timeout_ms(&self) -> u64;
}

/// Interceptable close of a window.
///
/// Returning `true` terminates the close process.
pub trait WindowWillCloseListener: NativeListener {
    fn on_window_will_close(&self) -> bool {
        false
    }
}

/// Interceptable close of a sub-window.
pub trait SubWindowCloseListener: NativeListener {
    fn on_sub_window_close(&self) -> bool {
        false
    }
}

/// Interceptable close of a stage's main window.
pub trait MainWindowCloseListener: NativeListener {
    fn on_main_window_close(&self) -> bool {
        false
    }
}

/// Screen hot-plug and configuration changes.
pub trait ScreenListener: NativeListener {
    fn on_connect(&self, _id: ScreenId) {}
    fn on_disconnect(&self, _id: ScreenId) {}
    fn on_change(&self, _ids: &[ScreenId], _event: ScreenChangeEvent) {}
}

/// Soft keyboard occupying part of the window.
pub trait OccupiedAreaChangeListener: NativeListener {
    fn on_keyboard_height_change(&self, _height: u32) {}
}

pub trait WindowStatusChangeListener: NativeListener {
    fn on_window_status_change(&self, _status: WindowStatus) {}
}

pub trait DisplayIdChangeListener: NativeListener {
    fn on_display_id_changed(&self, _display_id: DisplayId) {}
}

pub trait SystemDensityChangeListener: NativeListener {
    fn on_system_density_changed(&self, _density: f32) {}
}

pub trait GestureNavigationEnabledChangedListener: NativeListener {
    fn on_gesture_navigation_enabled_change(&self, _enabled: bool) {}
}

pub trait WaterMarkFlagChangedListener: NativeListener {
    fn on_water_mark_flag_update(&self, _show: bool) {}
}

/// Soft keyboard show and hide transitions.
///
/// A target installs one listener per transition, so the same trait backs
/// four capabilities.
pub trait KeyboardTransitionListener: NativeListener {
    fn on_keyboard_will_show(&self, _info: KeyboardPanelInfo) {}
    fn on_keyboard_will_hide(&self, _info: KeyboardPanelInfo) {}
    fn on_keyboard_did_show(&self, _info: KeyboardPanelInfo) {}
    fn on_keyboard_did_hide(&self, _info: KeyboardPanelInfo) {}
}

pub trait ScreenshotAppEventListener: NativeListener {
    fn on_screenshot_app_event(&self, _event: ScreenshotEventType) {}
}

/// Window status, reported after the transition has finished.
pub trait WindowStatusDidChangeListener: NativeListener {
    fn on_window_status_did_change(&self, _status: WindowStatus) {}
}

pub trait WindowTitleButtonRectChangedListener: NativeListener {
    fn on_window_title_button_rect_changed(&self, _rect: TitleButtonRect) {}
}

pub trait OcclusionStateChangedListener: NativeListener {
    fn on_occlusion_state_changed(&self, _state: OcclusionState) {}
}

pub trait FrameMetricsChangedListener: NativeListener {
    fn on_frame_metrics_changed(&self, _metrics: FrameMetrics) {}
}

pub trait AcrossDisplaysChangeListener: NativeListener {
    fn on_across_displays_change(&self, _across: bool) {}
}

/// Window rectangle in global display coordinates.
pub trait RectChangeInGlobalDisplayListener: NativeListener {
    fn on_rect_change_in_global_display(&self, _rect: Rect, _reason: WindowSizeChangeReason) {}
}

pub trait ExtensionSecureLimitChangeListener: NativeListener {
    fn on_secure_limit_change(&self, _limited: bool) {}
}

pub trait WindowHighlightChangeListener: NativeListener {
    fn on_window_highlight_change(&self, _highlighted: bool) {}
}

/// Interceptable display rotation.
///
/// The answer, if any, tells the target where to place the window once the
/// rotation completes.
pub trait WindowRotationChangeListener: NativeListener {
    fn on_rotation_change(&self, _info: RotationChangeInfo) -> Option<RotationChangeResult> {
        None
    }
}

pub trait FreeWindowModeChangeListener: NativeListener {
    fn on_free_window_mode_change(&self, _enabled: bool) {}
}

macro_rules! listener_capabilities {
    ($( $variant:ident($listener:ident) => $accessor:ident; )*) => {
        /// A listener handed to a native target, tagged by capability.
        #[derive(Clone)]
        pub enum ListenerCapability {
            $( $variant(Arc<dyn $listener>), )*
        }

        impl ListenerCapability {
            /// Name of the capability.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => stringify!($variant), )*
                }
            }

            /// Identity of the wrapped listener.
            pub fn listener_id(&self) -> ListenerId {
                match self {
                    $( Self::$variant(listener) => listener.listener_id(), )*
                }
            }

            $(
                #[doc = concat!("The listener, if this is a `", stringify!($variant), "` capability.")]
                pub fn $accessor(&self) -> Option<&Arc<dyn $listener>> {
                    match self {
                        Self::$variant(listener) => Some(listener),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            )*
        }
    };
}

listener_capabilities! {
    Lifecycle(LifecycleListener) => as_lifecycle;
    WindowStageLifecycle(WindowStageLifecycleListener) => as_window_stage_lifecycle;
    WindowChange(WindowChangeListener) => as_window_change;
    RectChange(RectChangeListener) => as_rect_change;
    AvoidAreaChanged(AvoidAreaChangedListener) => as_avoid_area_changed;
    SystemBarChanged(SystemBarChangedListener) => as_system_bar_changed;
    VisibilityChanged(VisibilityChangedListener) => as_visibility_changed;
    TouchOutside(TouchOutsideListener) => as_touch_outside;
    Screenshot(ScreenshotListener) => as_screenshot;
    DialogTargetTouch(DialogTargetTouchListener) => as_dialog_target_touch;
    DialogDeathRecipient(DialogDeathRecipientListener) => as_dialog_death_recipient;
    NoInteraction(NoInteractionListener) => as_no_interaction;
    WindowWillClose(WindowWillCloseListener) => as_window_will_close;
    SubWindowClose(SubWindowCloseListener) => as_sub_window_close;
    MainWindowClose(MainWindowCloseListener) => as_main_window_close;
    Screen(ScreenListener) => as_screen;
    OccupiedAreaChange(OccupiedAreaChangeListener) => as_occupied_area_change;
    WindowStatusChange(WindowStatusChangeListener) => as_window_status_change;
    DisplayIdChange(DisplayIdChangeListener) => as_display_id_change;
    SystemDensityChange(SystemDensityChangeListener) => as_system_density_change;
    GestureNavigationEnabledChanged(GestureNavigationEnabledChangedListener) => as_gesture_navigation_enabled_changed;
    WaterMarkFlagChanged(WaterMarkFlagChangedListener) => as_water_mark_flag_changed;
    KeyboardWillShow(KeyboardTransitionListener) => as_keyboard_will_show;
    KeyboardWillHide(KeyboardTransitionListener) => as_keyboard_will_hide;
    KeyboardDidShow(KeyboardTransitionListener) => as_keyboard_did_show;
    KeyboardDidHide(KeyboardTransitionListener) => as_keyboard_did_hide;
    ScreenshotAppEvent(ScreenshotAppEventListener) => as_screenshot_app_event;
    WindowStatusDidChange(WindowStatusDidChangeListener) => as_window_status_did_change;
    WindowTitleButtonRectChanged(WindowTitleButtonRectChangedListener) => as_window_title_button_rect_changed;
    OcclusionStateChanged(OcclusionStateChangedListener) => as_occlusion_state_changed;
    FrameMetricsChanged(FrameMetricsChangedListener) => as_frame_metrics_changed;
    AcrossDisplaysChange(AcrossDisplaysChangeListener) => as_across_displays_change;
    RectChangeInGlobalDisplay(RectChangeInGlobalDisplayListener) => as_rect_change_in_global_display;
    ExtensionSecureLimitChange(ExtensionSecureLimitChangeListener) => as_extension_secure_limit_change;
    WindowHighlightChange(WindowHighlightChangeListener) => as_window_highlight_change;
    WindowRotationChange(WindowRotationChangeListener) => as_window_rotation_change;
    FreeWindowModeChange(FreeWindowModeChangeListener) => as_free_window_mode_change;
}

impl std::fmt::Debug for ListenerCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(self.name()).field(&self.listener_id()).finish()
    }
}

/// A native object that listeners can be installed on.
///
/// Implementations are expected to be idempotent: unsubscribing a listener
/// that is not installed succeeds. Neither method may call back into the
/// registry that is subscribing; such calls are deferred until the registry
/// has left its critical section.
pub trait NativeTarget: Send + Sync {
    /// Install a listener.
    fn subscribe(&self, capability: ListenerCapability) -> NativeResult;

    /// Remove a listener.
    fn unsubscribe(&self, capability: ListenerCapability) -> NativeResult;

    /// Whether the underlying native object still exists.
    fn is_alive(&self) -> bool {
        true
    }
}

static_assertions::assert_obj_safe!(NativeTarget, LifecycleListener, ScreenListener);
