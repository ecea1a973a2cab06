//! Error types for listener registration.

use crate::types::ObjectCategory;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, ListenerError>;

/// Normalized result codes reported by a native target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    /// The target object no longer exists.
    #[error("native target is gone")]
    TargetGone,

    /// The target is in a state that does not allow the operation.
    #[error("native target state is abnormal")]
    StateAbnormal,

    /// The target rejected an argument.
    #[error("native target rejected the parameter")]
    InvalidParam,

    /// The capability is not available on this device.
    #[error("capability not supported on this device")]
    DeviceNotSupported,

    /// The native service failed.
    #[error("native system error")]
    SystemAbnormal,

    /// Any other native result code.
    #[error("native error code {0}")]
    Code(i32),
}

impl NativeError {
    /// Whether this error means the target has already been destroyed.
    pub fn is_target_gone(&self) -> bool {
        matches!(self, Self::TargetGone)
    }
}

/// Result of a native subscribe or unsubscribe call.
pub type NativeResult = std::result::Result<(), NativeError>;

/// Errors returned by listener registration and removal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListenerError {
    /// The event name is not in the category's vocabulary.
    #[error("event type '{event_type}' is not supported for {category}")]
    UnsupportedEvent {
        category: ObjectCategory,
        event_type: String,
    },

    /// The supplied callback value is not callable.
    #[error("callback is not a callable function")]
    InvalidCallback,

    /// An auxiliary parameter is missing or malformed.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The callback is already registered and the registry rejects duplicates.
    #[error("callback already registered for '{event_type}'")]
    AlreadyRegistered { event_type: &'static str },

    /// A blocking call for the listener is in flight.
    #[error("listener for '{event_type}' has a blocking call in flight")]
    Busy { event_type: &'static str },

    /// The native target rejected the subscription.
    #[error("native subscribe for '{event_type}' failed: {source}")]
    NativeSubscribeFailed {
        event_type: &'static str,
        #[source]
        source: NativeError,
    },

    /// The native target rejected the unsubscription.
    #[error("native unsubscribe for '{event_type}' failed: {source}")]
    NativeUnsubscribeFailed {
        event_type: &'static str,
        #[source]
        source: NativeError,
    },
}

impl ListenerError {
    /// Create an unsupported-event error.
    pub fn unsupported(category: ObjectCategory, event_type: impl Into<String>) -> Self {
        Self::UnsupportedEvent {
            category,
            event_type: event_type.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParam(message.into())
    }

    /// Create a subscribe failure.
    pub fn subscribe_failed(event_type: &'static str, source: NativeError) -> Self {
        Self::NativeSubscribeFailed { event_type, source }
    }

    /// Create an unsubscribe failure.
    pub fn unsubscribe_failed(event_type: &'static str, source: NativeError) -> Self {
        Self::NativeUnsubscribeFailed { event_type, source }
    }
}

/// Errors raised while turning a native event into a consumer payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The event does not belong to the listener's event kind.
    #[error("event {event} cannot be delivered as '{event_type}'")]
    Mismatch {
        event_type: &'static str,
        event: &'static str,
    },

    /// A native value could not be serialized.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ListenerError::unsupported(ObjectCategory::Window, "bogusEvent");
        assert_eq!(
            err.to_string(),
            "event type 'bogusEvent' is not supported for window"
        );

        let err = ListenerError::subscribe_failed("windowSizeChange", NativeError::StateAbnormal);
        assert_eq!(
            err.to_string(),
            "native subscribe for 'windowSizeChange' failed: native target state is abnormal"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = ListenerError::unsubscribe_failed("screenshot", NativeError::Code(-3));
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("native error code -3"));
    }
}
