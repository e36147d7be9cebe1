//! Clock configuration and stock presets.

/// Configuration for a [`Clock`](crate::Clock).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockConfig {
    /// Simulation tick rate in cycles per second (default: 60)
    pub tick_rate_hz: u16,
    /// Initial time scale (default: 1.0, 0.0 starts paused)
    pub time_scale: f64,
}

impl ClockConfig {
    /// Creates a new configuration with custom settings.
    pub const fn new(tick_rate_hz: u16, time_scale: f64) -> Self {
        Self {
            tick_rate_hz,
            time_scale,
        }
    }

    /// Sets the tick rate.
    pub const fn with_tick_rate(mut self, tick_rate_hz: u16) -> Self {
        self.tick_rate_hz = tick_rate_hz;
        self
    }

    /// Sets the initial time scale.
    pub const fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Starts the clock frozen (time scale 0).
    pub const fn paused(self) -> Self {
        self.with_time_scale(0.0)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        FIXED_60HZ_CONFIG
    }
}

/// 30 ticks per second, real-time speed
pub const FIXED_30HZ_CONFIG: ClockConfig = ClockConfig::new(30, 1.0);

/// 60 ticks per second, real-time speed
pub const FIXED_60HZ_CONFIG: ClockConfig = ClockConfig::new(60, 1.0);

/// 120 ticks per second, real-time speed (high refresh-rate simulation)
pub const FIXED_120HZ_CONFIG: ClockConfig = ClockConfig::new(120, 1.0);
