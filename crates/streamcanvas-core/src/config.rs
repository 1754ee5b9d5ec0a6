use crate::profiling::ProfilingBackend;

/// Process-wide settings for streamcanvas.
#[derive(Debug, Clone)]
pub struct Config {
    pub profiling: ProfilingMode,
    /// Override for the display's device pixel ratio. `None` uses whatever the
    /// host reports.
    pub device_pixel_ratio: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            profiling: ProfilingMode::Off,
            device_pixel_ratio: None,
        }
    }
}

impl Config {
    /// Resolve the effective device pixel ratio. Ratios below 1 are treated as 1.
    pub fn effective_pixel_ratio(&self, reported: f32) -> f32 {
        let ratio = self.device_pixel_ratio.unwrap_or(reported);
        if ratio.is_finite() { ratio.max(1.0) } else { 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Scopes are collected in-process
    On,
    /// Scopes are collected and served to 'puffin_viewer'
    WithWebserver,
}

impl ProfilingMode {
    /// Backend to pass to [`init_profiling`](crate::profiling::init_profiling),
    /// or `None` when profiling is off.
    ///
    /// Without the `profiling` feature the webserver falls back to in-process.
    pub fn backend(self) -> Option<ProfilingBackend> {
        match self {
            ProfilingMode::Off => None,
            ProfilingMode::On => Some(ProfilingBackend::InProcess),
            #[cfg(feature = "profiling")]
            ProfilingMode::WithWebserver => Some(ProfilingBackend::PuffinHttp),
            #[cfg(not(feature = "profiling"))]
            ProfilingMode::WithWebserver => Some(ProfilingBackend::InProcess),
        }
    }
}
