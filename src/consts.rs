pub mod cli_consts {
    //! Console Configuration Constants
    //!
    //! Tunables for the UI loop, notifications and the realtime transport,
    //! organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity log.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the application event channel.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Buffer size of a panel's result channel.
    pub const PANEL_QUEUE_SIZE: usize = 64;

    /// Buffer size of a realtime subscription.
    pub const CHANGE_QUEUE_SIZE: usize = 32;

    // =============================================================================
    // UI CONFIGURATION
    // =============================================================================

    pub mod ui {
        use std::time::Duration;

        /// How long the UI waits for a key press before redrawing (milliseconds).
        pub const TICK_MS: u64 = 100;

        /// How long a toast stays on screen (milliseconds).
        pub const TOAST_TTL_MS: u64 = 4_000;

        /// Maximum number of toasts stacked at once.
        pub const MAX_TOASTS: usize = 4;

        /// Placeholder character used when a secret is masked.
        pub const MASK_CHAR: char = '•';

        pub const fn tick() -> Duration {
            Duration::from_millis(TICK_MS)
        }

        pub const fn toast_ttl() -> Duration {
            Duration::from_millis(TOAST_TTL_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client configuration
    pub mod http {
        use std::time::Duration;

        /// Connection establishment timeout (seconds).
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }
    }

    /// Realtime socket configuration
    pub mod realtime {
        use std::time::Duration;

        /// Interval between Phoenix heartbeats (milliseconds).
        pub const HEARTBEAT_INTERVAL_MS: u64 = 25_000;

        /// Delay before reconnecting a dropped socket (milliseconds).
        pub const RECONNECT_DELAY_MS: u64 = 5_000;

        pub const fn heartbeat_interval() -> Duration {
            Duration::from_millis(HEARTBEAT_INTERVAL_MS)
        }

        pub const fn reconnect_delay() -> Duration {
            Duration::from_millis(RECONNECT_DELAY_MS)
        }
    }
}
