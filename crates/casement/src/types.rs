//! Value types carried by native window events.
//!
//! Enumerations carry the numeric codes consumers see; `code()` returns the
//! value placed into payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a display.
pub type DisplayId = u64;

/// Identifier of a physical or virtual screen.
pub type ScreenId = u64;

/// The class of target object a registry serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectCategory {
    /// The window manager singleton.
    WindowManager,
    /// A single window.
    Window,
    /// A window stage (the main window of an ability plus its lifecycle).
    WindowStage,
    /// The screen manager singleton.
    ScreenManager,
}

impl ObjectCategory {
    /// All categories.
    pub const ALL: [ObjectCategory; 4] = [
        Self::WindowManager,
        Self::Window,
        Self::WindowStage,
        Self::ScreenManager,
    ];

    /// Whether targets of this category are process-wide singletons.
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::WindowManager | Self::ScreenManager)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::WindowManager => "windowManager",
            Self::Window => "window",
            Self::WindowStage => "windowStage",
            Self::ScreenManager => "screenManager",
        }
    }
}

impl std::fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A window rectangle in display coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(rename = "left")]
    pub pos_x: i32,
    #[serde(rename = "top")]
    pub pos_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(pos_x: i32, pos_y: i32, width: u32, height: u32) -> Self {
        Self {
            pos_x,
            pos_y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether width and height match `other`, ignoring position.
    pub fn same_size(&self, other: &Rect) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Why a window changed size or position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WindowSizeChangeReason {
    #[default]
    Undefined = 0,
    Maximize,
    Recover,
    Rotation,
    Drag,
    DragStart,
    DragEnd,
    Resize,
    ResizeWithAnimation,
    Move,
    MoveWithAnimation,
    Hide,
    Transform,
}

impl WindowSizeChangeReason {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Region category of an avoid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AvoidAreaType {
    System = 0,
    Cutout,
    SystemGesture,
    Keyboard,
    NavigationIndicator,
}

impl AvoidAreaType {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Screen regions a window's content should keep clear of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvoidArea {
    pub visible: bool,
    pub top_rect: Rect,
    pub left_rect: Rect,
    pub right_rect: Rect,
    pub bottom_rect: Rect,
}

/// System bar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemBarType {
    StatusBar,
    NavigationBar,
}

/// Tint and geometry of one system bar region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemBarRegionTint {
    pub bar_type: SystemBarType,
    pub is_enabled: bool,
    pub region: Rect,
    /// ARGB background color.
    pub background_color: u32,
    /// ARGB content color.
    pub content_color: u32,
}

/// Window lifecycle events as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LifeCycleEventType {
    Foreground = 1,
    Active,
    Inactive,
    Background,
    Resumed,
    Paused,
    Destroyed,
}

impl LifeCycleEventType {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Window stage lifecycle events as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WindowStageLifecycleEventType {
    Shown = 1,
    Resumed,
    Paused,
    Hidden,
}

impl WindowStageLifecycleEventType {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Presentation status of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WindowStatus {
    #[default]
    Undefined = 0,
    FullScreen,
    Maximize,
    Minimize,
    Floating,
    SplitScreen,
}

impl WindowStatus {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Soft keyboard geometry for a show or hide transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardPanelInfo {
    pub begin_rect: Rect,
    pub end_rect: Rect,
    pub animated: bool,
}

/// Screenshot activity reported to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ScreenshotEventType {
    SystemScreenshot = 0,
    SystemScreenshotAbort,
    ScrollShotStart,
    ScrollShotEnd,
    ScrollShotAbort,
}

impl ScreenshotEventType {
    /// Numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Area of the title buttons, relative to the window's upper right corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TitleButtonRect {
    pub right: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// How much of a window is covered by other windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OcclusionState {
    #[default]
    NoOcclusion = 0,
    PartialOcclusion,
    FullOcclusion,
}

impl OcclusionState {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Timing of one measured frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    pub first_draw_frame: bool,
    pub input_handling_duration: u64,
    pub layout_measure_duration: u64,
    pub vsync_timestamp: u64,
}

/// Phase of a display rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RotationChangeType {
    WindowWillRotate = 0,
    WindowDidRotate,
}

impl RotationChangeType {
    /// Numeric code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// A display rotation a window may respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationChangeInfo {
    pub change_type: RotationChangeType,
    pub orientation: u32,
    pub display_id: DisplayId,
    pub display_rect: Rect,
}

/// Coordinate space of a [`RotationChangeResult`] rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RectType {
    RelativeToScreen = 0,
    RelativeToParentWindow,
}

/// Where the consumer wants the window placed after a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationChangeResult {
    pub rect_type: RectType,
    pub window_rect: Rect,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRotationChangeResult {
    rect_type: u32,
    window_rect: Rect,
}

impl RotationChangeResult {
    /// Parse a consumer's answer to a rotation change.
    ///
    /// Anything other than `{rectType, windowRect}` with a known rect type
    /// means the consumer has no placement to request.
    pub fn from_value(value: &Value) -> Option<Self> {
        let raw: RawRotationChangeResult = serde_json::from_value(value.clone()).ok()?;
        let rect_type = match raw.rect_type {
            0 => RectType::RelativeToScreen,
            1 => RectType::RelativeToParentWindow,
            _ => return None,
        };
        Some(Self {
            rect_type,
            window_rect: raw.window_rect,
        })
    }
}

/// Why a screen's configuration changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScreenChangeEvent {
    #[default]
    Update,
    AddToGroup,
    RemoveFromGroup,
    ChangeGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_size_ignores_position() {
        let a = Rect::new(0, 0, 100, 200);
        let b = Rect::new(40, 40, 100, 200);
        assert!(a.same_size(&b));
        assert_ne!(a, b);
        assert!(!a.same_size(&Rect::sized(100, 201)));
    }

    #[test]
    fn test_rect_serializes_with_consumer_names() {
        let value = serde_json::to_value(Rect::new(1, 2, 3, 4)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"left": 1, "top": 2, "width": 3, "height": 4})
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(WindowSizeChangeReason::DragEnd.code(), 6);
        assert_eq!(WindowSizeChangeReason::Rotation.code(), 3);
        assert_eq!(LifeCycleEventType::Foreground.code(), 1);
        assert_eq!(LifeCycleEventType::Destroyed.code(), 7);
        assert_eq!(WindowStageLifecycleEventType::Hidden.code(), 4);
        assert_eq!(AvoidAreaType::Keyboard.code(), 3);
    }

    #[test]
    fn test_rotation_result_parsing() {
        let value = serde_json::json!({
            "rectType": 1,
            "windowRect": {"left": 10, "top": 20, "width": 300, "height": 400},
        });
        assert_eq!(
            RotationChangeResult::from_value(&value),
            Some(RotationChangeResult {
                rect_type: RectType::RelativeToParentWindow,
                window_rect: Rect::new(10, 20, 300, 400),
            })
        );

        assert_eq!(RotationChangeResult::from_value(&Value::Null), None);
        let unknown_type = serde_json::json!({
            "rectType": 7,
            "windowRect": {"left": 0, "top": 0, "width": 1, "height": 1},
        });
        assert_eq!(RotationChangeResult::from_value(&unknown_type), None);
        let negative = serde_json::json!({
            "rectType": 0,
            "windowRect": {"left": 0, "top": 0, "width": -1, "height": 1},
        });
        assert_eq!(RotationChangeResult::from_value(&negative), None);
    }

    #[test]
    fn test_singleton_categories() {
        assert!(ObjectCategory::WindowManager.is_singleton());
        assert!(ObjectCategory::ScreenManager.is_singleton());
        assert!(!ObjectCategory::Window.is_singleton());
        assert!(!ObjectCategory::WindowStage.is_singleton());
    }
}
