pub mod cli;
pub mod config;
pub mod demo;
pub mod driver;
pub mod runtime;
pub mod stdlib;

// Re-export main types
pub use config::Config;
pub use driver::{DriveReport, Driver};
pub use runtime::{
    CallStack, CallStatus, FrameScope, LatentError, ResumableCall, ResumePoint, Step, UsageError,
    Var,
};
