//! Logging facilities for Casement.
//!
//! Casement uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("casement::registry=debug,casement::adapter=trace")
//!     .init();
//! ```

/// Span names used throughout Casement for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Listener registration span.
    pub const REGISTER: &str = "casement::register";
    /// Listener removal span.
    pub const UNREGISTER: &str = "casement::unregister";
    /// Registry teardown span.
    pub const TEARDOWN: &str = "casement::teardown";
    /// Blocking hand-off span.
    pub const BLOCKING_CALL: &str = "casement::blocking_call";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core runtime target.
    pub const CORE: &str = "casement_core";
    /// Consumer scheduler target.
    pub const SCHEDULER: &str = "casement_core::scheduler";
    /// Listener registry target.
    pub const REGISTRY: &str = "casement::registry";
    /// Native listener adapter target.
    pub const ADAPTER: &str = "casement::adapter";
    /// Event dispatch table target.
    pub const DISPATCH: &str = "casement::dispatch";
    /// Payload building target.
    pub const PAYLOAD: &str = "casement::payload";
}
