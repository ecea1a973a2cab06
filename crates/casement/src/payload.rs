//! Native events and the consumer payloads built from them.
//!
//! The adapter never shapes consumer values itself. It captures the native
//! arguments as a [`NativeEvent`] and asks a [`PayloadBuilder`] for the
//! argument list to call the consumer function with. [`JsonPayloadBuilder`]
//! is the stock builder and produces the object shapes script consumers
//! expect.

use serde_json::{Value, json};

use crate::dispatch::EventKind;
use crate::error::PayloadError;
use crate::types::{
    AvoidArea, AvoidAreaType, DisplayId, FrameMetrics, KeyboardPanelInfo, LifeCycleEventType,
    OcclusionState, Rect, RotationChangeInfo, ScreenId, ScreenshotEventType, SystemBarRegionTint,
    TitleButtonRect, WindowSizeChangeReason, WindowStageLifecycleEventType, WindowStatus,
};

/// Native arguments of one event.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    Lifecycle(LifeCycleEventType),
    StageLifecycle(WindowStageLifecycleEventType),
    SizeChange {
        rect: Rect,
        reason: WindowSizeChangeReason,
    },
    RectChange {
        rect: Rect,
        reason: WindowSizeChangeReason,
    },
    AvoidAreaChange {
        area: AvoidArea,
        area_type: AvoidAreaType,
    },
    SystemBarChange {
        display_id: DisplayId,
        tints: Vec<SystemBarRegionTint>,
    },
    VisibilityChange(bool),
    TouchOutside,
    Screenshot,
    DialogTargetTouch,
    DialogDeathRecipient,
    NoInteractionTimeout,
    /// A close request awaiting the consumer's decision.
    CloseRequest,
    KeyboardHeightChange(u32),
    WindowStatusChange(WindowStatus),
    DisplayIdChange(DisplayId),
    SystemDensityChange(f32),
    GestureNavigationEnabledChange(bool),
    WaterMarkFlagChange(bool),
    ScreenConnect(ScreenId),
    ScreenDisconnect(ScreenId),
    ScreenChange(ScreenId),
    KeyboardWillShow(KeyboardPanelInfo),
    KeyboardWillHide(KeyboardPanelInfo),
    KeyboardDidShow(KeyboardPanelInfo),
    KeyboardDidHide(KeyboardPanelInfo),
    ScreenshotAppEvent(ScreenshotEventType),
    WindowStatusDidChange(WindowStatus),
    TitleButtonRectChange(TitleButtonRect),
    OcclusionStateChange(OcclusionState),
    FrameMetricsMeasured(FrameMetrics),
    AcrossDisplaysChange(bool),
    RectChangeInGlobalDisplay {
        rect: Rect,
        reason: WindowSizeChangeReason,
    },
    ExtensionSecureLimitChange(bool),
    HighlightChange(bool),
    /// A rotation awaiting the consumer's placement answer.
    RotationChange(RotationChangeInfo),
    FreeWindowModeChange(bool),
}

impl NativeEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lifecycle(_) => "Lifecycle",
            Self::StageLifecycle(_) => "StageLifecycle",
            Self::SizeChange { .. } => "SizeChange",
            Self::RectChange { .. } => "RectChange",
            Self::AvoidAreaChange { .. } => "AvoidAreaChange",
            Self::SystemBarChange { .. } => "SystemBarChange",
            Self::VisibilityChange(_) => "VisibilityChange",
            Self::TouchOutside => "TouchOutside",
            Self::Screenshot => "Screenshot",
            Self::DialogTargetTouch => "DialogTargetTouch",
            Self::DialogDeathRecipient => "DialogDeathRecipient",
            Self::NoInteractionTimeout => "NoInteractionTimeout",
            Self::CloseRequest => "CloseRequest",
            Self::KeyboardHeightChange(_) => "KeyboardHeightChange",
            Self::WindowStatusChange(_) => "WindowStatusChange",
            Self::DisplayIdChange(_) => "DisplayIdChange",
            Self::SystemDensityChange(_) => "SystemDensityChange",
            Self::GestureNavigationEnabledChange(_) => "GestureNavigationEnabledChange",
            Self::WaterMarkFlagChange(_) => "WaterMarkFlagChange",
            Self::ScreenConnect(_) => "ScreenConnect",
            Self::ScreenDisconnect(_) => "ScreenDisconnect",
            Self::ScreenChange(_) => "ScreenChange",
            Self::KeyboardWillShow(_) => "KeyboardWillShow",
            Self::KeyboardWillHide(_) => "KeyboardWillHide",
            Self::KeyboardDidShow(_) => "KeyboardDidShow",
            Self::KeyboardDidHide(_) => "KeyboardDidHide",
            Self::ScreenshotAppEvent(_) => "ScreenshotAppEvent",
            Self::WindowStatusDidChange(_) => "WindowStatusDidChange",
            Self::TitleButtonRectChange(_) => "TitleButtonRectChange",
            Self::OcclusionStateChange(_) => "OcclusionStateChange",
            Self::FrameMetricsMeasured(_) => "FrameMetricsMeasured",
            Self::AcrossDisplaysChange(_) => "AcrossDisplaysChange",
            Self::RectChangeInGlobalDisplay { .. } => "RectChangeInGlobalDisplay",
            Self::ExtensionSecureLimitChange(_) => "ExtensionSecureLimitChange",
            Self::HighlightChange(_) => "HighlightChange",
            Self::RotationChange(_) => "RotationChange",
            Self::FreeWindowModeChange(_) => "FreeWindowModeChange",
        }
    }

    /// Whether this event can be delivered to a listener of `kind`.
    pub fn belongs_to(&self, kind: EventKind) -> bool {
        use EventKind as K;
        match self {
            Self::Lifecycle(_) => matches!(kind, K::WindowEvent | K::LifeCycleEvent | K::WindowStageEvent),
            Self::StageLifecycle(_) => kind == K::WindowStageLifecycleEvent,
            Self::SizeChange { .. } => kind == K::WindowSizeChange,
            Self::RectChange { .. } => kind == K::WindowRectChange,
            Self::AvoidAreaChange { .. } => {
                matches!(kind, K::AvoidAreaChange | K::SystemAvoidAreaChange)
            }
            Self::SystemBarChange { .. } => kind == K::SystemBarTintChange,
            Self::VisibilityChange(_) => kind == K::WindowVisibilityChange,
            Self::TouchOutside => kind == K::TouchOutside,
            Self::Screenshot => kind == K::Screenshot,
            Self::DialogTargetTouch => kind == K::DialogTargetTouch,
            Self::DialogDeathRecipient => kind == K::DialogDeathRecipient,
            Self::NoInteractionTimeout => kind == K::NoInteractionDetected,
            Self::CloseRequest => kind.is_close(),
            Self::KeyboardHeightChange(_) => kind == K::KeyboardHeightChange,
            Self::WindowStatusChange(_) => kind == K::WindowStatusChange,
            Self::DisplayIdChange(_) => kind == K::DisplayIdChange,
            Self::SystemDensityChange(_) => kind == K::SystemDensityChange,
            Self::GestureNavigationEnabledChange(_) => kind == K::GestureNavigationEnabledChange,
            Self::WaterMarkFlagChange(_) => kind == K::WaterMarkFlagChange,
            Self::ScreenConnect(_) => kind == K::ScreenConnect,
            Self::ScreenDisconnect(_) => kind == K::ScreenDisconnect,
            Self::ScreenChange(_) => kind == K::ScreenChange,
            Self::KeyboardWillShow(_) => kind == K::KeyboardWillShow,
            Self::KeyboardWillHide(_) => kind == K::KeyboardWillHide,
            Self::KeyboardDidShow(_) => kind == K::KeyboardDidShow,
            Self::KeyboardDidHide(_) => kind == K::KeyboardDidHide,
            Self::ScreenshotAppEvent(_) => kind == K::ScreenshotAppEvent,
            Self::WindowStatusDidChange(_) => kind == K::WindowStatusDidChange,
            Self::TitleButtonRectChange(_) => kind == K::WindowTitleButtonRectChange,
            Self::OcclusionStateChange(_) => kind == K::OcclusionStateChange,
            Self::FrameMetricsMeasured(_) => kind == K::FrameMetricsMeasuredChange,
            Self::AcrossDisplaysChange(_) => kind == K::AcrossDisplaysChange,
            Self::RectChangeInGlobalDisplay { .. } => kind == K::RectChangeInGlobalDisplay,
            Self::ExtensionSecureLimitChange(_) => kind == K::ExtensionSecureLimitChange,
            Self::HighlightChange(_) => kind == K::WindowHighlightChange,
            Self::RotationChange(_) => kind == K::WindowRotationChange,
            Self::FreeWindowModeChange(_) => kind == K::FreeWindowModeChange,
        }
    }
}

/// Arguments to call a consumer function with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumerPayload {
    pub args: Vec<Value>,
}

impl ConsumerPayload {
    /// A payload with no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A payload with a single argument.
    pub fn single(value: Value) -> Self {
        Self { args: vec![value] }
    }
}

/// Converts native event arguments into a consumer payload.
pub trait PayloadBuilder: Send + Sync {
    /// Build the payload for `event` delivered to a listener of `kind`.
    fn build(&self, kind: EventKind, event: &NativeEvent) -> Result<ConsumerPayload, PayloadError>;
}

/// Builds `serde_json` payloads in the shapes script consumers expect.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadBuilder;

impl PayloadBuilder for JsonPayloadBuilder {
    fn build(&self, kind: EventKind, event: &NativeEvent) -> Result<ConsumerPayload, PayloadError> {
        if !event.belongs_to(kind) {
            return Err(PayloadError::Mismatch {
                event_type: kind.name(),
                event: event.name(),
            });
        }

        let payload = match event {
            NativeEvent::Lifecycle(event_type) => ConsumerPayload::single(json!(event_type.code())),
            NativeEvent::StageLifecycle(event_type) => {
                ConsumerPayload::single(json!(event_type.code()))
            }
            NativeEvent::SizeChange { rect, .. } => ConsumerPayload::single(json!({
                "width": rect.width,
                "height": rect.height,
            })),
            NativeEvent::RectChange { rect, reason }
            | NativeEvent::RectChangeInGlobalDisplay { rect, reason } => ConsumerPayload::single(json!({
                "rect": serde_json::to_value(rect)?,
                "reason": reason.code(),
            })),
            NativeEvent::AvoidAreaChange { area, area_type } => {
                let area = serde_json::to_value(area)?;
                if kind == EventKind::SystemAvoidAreaChange {
                    ConsumerPayload::single(area)
                } else {
                    ConsumerPayload::single(json!({
                        "type": area_type.code(),
                        "area": area,
                    }))
                }
            }
            NativeEvent::SystemBarChange { display_id, tints } => {
                let region_tint = tints
                    .iter()
                    .map(tint_to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                ConsumerPayload::single(json!({
                    "displayId": display_id,
                    "regionTint": region_tint,
                }))
            }
            NativeEvent::VisibilityChange(visible) => ConsumerPayload::single(json!(visible)),
            NativeEvent::TouchOutside
            | NativeEvent::Screenshot
            | NativeEvent::DialogTargetTouch
            | NativeEvent::DialogDeathRecipient
            | NativeEvent::NoInteractionTimeout
            | NativeEvent::CloseRequest => ConsumerPayload::empty(),
            NativeEvent::KeyboardHeightChange(height) => ConsumerPayload::single(json!(height)),
            NativeEvent::WindowStatusChange(status) => ConsumerPayload::single(json!(status.code())),
            NativeEvent::DisplayIdChange(display_id) => ConsumerPayload::single(json!(display_id)),
            NativeEvent::SystemDensityChange(density) => {
                ConsumerPayload::single(json!(f64::from(*density)))
            }
            NativeEvent::GestureNavigationEnabledChange(flag)
            | NativeEvent::WaterMarkFlagChange(flag) => ConsumerPayload::single(json!(flag)),
            NativeEvent::ScreenConnect(id)
            | NativeEvent::ScreenDisconnect(id)
            | NativeEvent::ScreenChange(id) => ConsumerPayload::single(json!(id)),
            NativeEvent::KeyboardWillShow(info)
            | NativeEvent::KeyboardWillHide(info)
            | NativeEvent::KeyboardDidShow(info)
            | NativeEvent::KeyboardDidHide(info) => {
                ConsumerPayload::single(serde_json::to_value(info)?)
            }
            NativeEvent::ScreenshotAppEvent(event_type) => {
                ConsumerPayload::single(json!(event_type.code()))
            }
            NativeEvent::WindowStatusDidChange(status) => {
                ConsumerPayload::single(json!(status.code()))
            }
            NativeEvent::TitleButtonRectChange(rect) => {
                ConsumerPayload::single(serde_json::to_value(rect)?)
            }
            NativeEvent::OcclusionStateChange(state) => ConsumerPayload::single(json!(state.code())),
            NativeEvent::FrameMetricsMeasured(metrics) => {
                ConsumerPayload::single(serde_json::to_value(metrics)?)
            }
            NativeEvent::AcrossDisplaysChange(flag)
            | NativeEvent::ExtensionSecureLimitChange(flag)
            | NativeEvent::HighlightChange(flag)
            | NativeEvent::FreeWindowModeChange(flag) => ConsumerPayload::single(json!(flag)),
            NativeEvent::RotationChange(info) => ConsumerPayload::single(json!({
                "type": info.change_type.code(),
                "orientation": info.orientation,
                "displayId": info.display_id,
                "displayRect": serde_json::to_value(info.display_rect)?,
            })),
        };
        Ok(payload)
    }
}

fn tint_to_value(tint: &SystemBarRegionTint) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "type": tint.bar_type,
        "isEnable": tint.is_enabled,
        "region": serde_json::to_value(tint.region)?,
        "backgroundColor": format_argb(tint.background_color),
        "contentColor": format_argb(tint.content_color),
    }))
}

fn format_argb(color: u32) -> String {
    format!("#{color:08X}")
}
