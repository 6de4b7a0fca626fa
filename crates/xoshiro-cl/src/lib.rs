// ─── Feature‑Module ───────────────────────────────────────────────────
#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::{drain_stats, record, summary};

// ─── Module ───────────────────────────────────────────────────────────
pub mod backend;
pub mod config;
pub mod kernels;
pub mod logger;
pub mod mock;
pub mod opencl;
pub mod platform;
pub mod program;

pub use backend::{Backend, PlatformId, PlatformInfo};
pub use config::Config;
pub use opencl::OpenClBackend;
pub use platform::{
    activate_first, describe_platform, describe_platforms, find_compatible_platforms,
    is_compatible_version, ActivePlatform,
};
pub use program::{format_log, BuildLog, BuildOutcome, DeviceLog, ProgramBuilder};

// ─── Fehler‑Typ ───────────────────────────────────────────────────────
#[derive(thiserror::Error, Debug)]
pub enum ClError {
    #[error("OpenCL API error: {0}")]
    Api(i32),
    #[error("platform has no devices")]
    NoDevices,
    #[error("no compatible platform (OpenCL 2.x or 3.x) found")]
    NoCompatiblePlatform,
    #[error("could not activate platform {requested}, context reports {reported}")]
    PlatformActivation {
        requested: PlatformId,
        reported: PlatformId,
    },
    #[error("program build failed:\n{0}")]
    Build(String),
    #[error("invalid configuration value {value:?} for {key}")]
    Config { key: &'static str, value: String },
    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl From<opencl3::error_codes::ClError> for ClError {
    #[inline]
    fn from(err: opencl3::error_codes::ClError) -> Self {
        ClError::Api(err.0)
    }
}

impl From<i32> for ClError {
    #[inline]
    fn from(code: i32) -> Self {
        ClError::Api(code)
    }
}
