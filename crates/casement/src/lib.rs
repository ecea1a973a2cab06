//! Casement - window event listener registration.
//!
//! Casement is the layer between native window objects and a single-threaded
//! consumer runtime. Consumers register callbacks by event name; Casement
//! installs a listener on the native object, converts native callbacks into
//! consumer payloads, and delivers them in order on the consumer thread.
//!
//! # Components
//!
//! - [`CallbackHandle`]: identity of a consumer callback
//! - [`NativeListenerAdapter`]: one listener per registration, implementing
//!   every native listener capability
//! - [`DispatchTable`] and [`EventRoute`]: per-category event vocabulary and
//!   the native subscribe/unsubscribe call for each event
//! - [`ListenerRegistry`]: the record of registrations, guarded by one mutex
//! - [`RegistrationFacade`]: `on`/`off` for a window, window stage, window
//!   manager or screen manager
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use casement::{
//!     ConsumerFunction, ListenerCapability, NativeResult, NativeTarget, PumpedScheduler,
//!     Rect, RegistrationFacade, WindowChangeListener, WindowSizeChangeReason,
//! };
//! use parking_lot::Mutex;
//! use serde_json::{Value, json};
//!
//! #[derive(Default)]
//! struct Window {
//!     listeners: Mutex<Vec<ListenerCapability>>,
//! }
//!
//! impl NativeTarget for Window {
//!     fn subscribe(&self, capability: ListenerCapability) -> NativeResult {
//!         self.listeners.lock().push(capability);
//!         Ok(())
//!     }
//!
//!     fn unsubscribe(&self, capability: ListenerCapability) -> NativeResult {
//!         let id = capability.listener_id();
//!         self.listeners.lock().retain(|l| l.listener_id() != id);
//!         Ok(())
//!     }
//! }
//!
//! let window = Arc::new(Window::default());
//! let scheduler = Arc::new(PumpedScheduler::new());
//! let facade = RegistrationFacade::for_window(window.clone(), scheduler.clone());
//!
//! let sizes = Arc::new(Mutex::new(Vec::new()));
//! let seen = sizes.clone();
//! let on_resize = ConsumerFunction::new(move |args| {
//!     seen.lock().push(args[0].clone());
//!     Value::Null
//! });
//! facade.on("windowSizeChange", &on_resize.into(), None).unwrap();
//!
//! // The native side fires from its own thread; here we call it directly.
//! for listener in window.listeners.lock().iter() {
//!     if let Some(listener) = listener.as_window_change() {
//!         listener.on_size_change(Rect::sized(800, 600), WindowSizeChangeReason::Resize);
//!     }
//! }
//!
//! scheduler.process_pending();
//! assert_eq!(*sizes.lock(), vec![json!({"width": 800, "height": 600})]);
//! ```

pub mod adapter;
pub mod dispatch;
mod error;
pub mod facade;
pub mod handle;
pub mod payload;
pub mod registry;
pub mod target;
pub mod types;

pub use adapter::{ListenerArena, ListenerId, ListenerOptions, NativeListenerAdapter, WindowState};
pub use dispatch::{DispatchTable, EventKind, EventRoute, NO_INTERACTION_TIMEOUT_MAX_SECS};
pub use error::{ListenerError, NativeError, NativeResult, PayloadError, Result};
pub use facade::RegistrationFacade;
pub use handle::{CallbackHandle, ConsumerFunction, ConsumerValue};
pub use payload::{ConsumerPayload, JsonPayloadBuilder, NativeEvent, PayloadBuilder};
pub use registry::{
    BucketSnapshot, DuplicatePolicy, ListenerRegistry, ListenerRegistryBuilder, ListenerSnapshot,
    RegisterOutcome, RegistryConfig, RegistrySnapshot, UnregisterOutcome,
};
pub use target::*;
pub use types::{
    AvoidArea, AvoidAreaType, DisplayId, FrameMetrics, KeyboardPanelInfo, LifeCycleEventType,
    ObjectCategory, OcclusionState, Rect, RectType, RotationChangeInfo, RotationChangeResult,
    RotationChangeType, ScreenChangeEvent, ScreenId, ScreenshotEventType, SystemBarRegionTint,
    SystemBarType, TitleButtonRect, WindowSizeChangeReason, WindowStageLifecycleEventType,
    WindowStatus,
};

// Consumer-side runtime, re-exported for convenience.
pub use casement_core::{
    ConsumerLoop, ConsumerLoopBuilder, ConsumerLoopConfig, ConsumerScheduler, InlineScheduler,
    PumpedScheduler, SchedulerError, call_blocking,
};
