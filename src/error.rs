//! Error types for the scanner.
//!
//! Only adapter and scan failures are fatal to a run. Name lookups and
//! malformed operator input are absorbed where they happen, so they have no
//! variant in the crate-wide [`Error`].

use thiserror::Error;

/// Failure of a single request to the local controller.
#[derive(Error, Debug)]
pub enum ControllerError {
   #[error("Bluetooth error: {0}")]
   Bluetooth(#[from] bluer::Error),

   #[error("Request timeout")]
   RequestTimeout,

   #[error("Remote name not available")]
   NameUnavailable,
}

/// Failure to open the local controller.
#[derive(Error, Debug)]
pub enum AdapterError {
   #[error("No Bluetooth controller found")]
   NoController,

   #[error("Failed to connect to controller: {0}")]
   ConnectionFailed(#[source] ControllerError),
}

/// Failure of the discovery phase.
#[derive(Error, Debug)]
pub enum ScanError {
   #[error("Scan capacity must be at least one device")]
   InvalidCapacity,

   #[error("Inquiry failed: {0}")]
   InquiryFailed(#[source] ControllerError),

   #[error("No devices found")]
   NoDevicesFound,
}

/// Failure to obtain a selection from the operator.
#[derive(Error, Debug)]
pub enum PromptError {
   #[error("Nothing to choose from")]
   NoChoices,

   #[error("Input closed before a device was chosen")]
   InputClosed,

   #[error("I/O error: {0}")]
   Io(#[from] std::io::Error),
}

/// Main error type for a scanner run.
#[derive(Error, Debug)]
pub enum Error {
   #[error(transparent)]
   Adapter(#[from] AdapterError),

   #[error(transparent)]
   Scan(#[from] ScanError),

   #[error(transparent)]
   Prompt(#[from] PromptError),

   #[error("I/O error: {0}")]
   Io(#[from] std::io::Error),

   #[error("TOML parsing error: {0}")]
   TomlParse(#[from] toml::de::Error),

   #[error("Invalid configuration: {0}")]
   InvalidConfig(String),
}

/// Convenience type alias for Results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
