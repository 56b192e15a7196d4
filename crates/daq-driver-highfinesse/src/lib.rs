//! Driver for HighFinesse wavemeters (WLM).
//!
//! This crate wraps the runtime bindings from `wlm-sys` with typed results,
//! vendor error-code translation and a simulation mode that needs no vendor
//! software at all.
//!
//! # Architecture
//!
//! - [`WlmBinding`] - narrow, typed method set over the vendor library,
//!   implemented by [`NativeWlm`]
//! - [`connection`] - server handshake and identity read
//! - [`HighFinesse`] - the controller session exposed to remote clients
//!
//! Per-channel measurement faults are data, not errors: [`get_frequency`]
//! always returns a [`FrequencyReading`] whose [`MeasurementStatus`] says
//! whether the value is usable.
//!
//! [`get_frequency`]: HighFinesse::get_frequency
//!
//! # Example
//!
//! ```
//! use daq_driver_highfinesse::{HighFinesse, MeasurementStatus};
//!
//! # async fn example() -> daq_driver_highfinesse::Result<()> {
//! let wlm = HighFinesse::new(true, None)?;
//! assert_eq!(wlm.id().await, "WLM simulator");
//!
//! let reading = wlm.get_frequency(1).await;
//! assert_eq!(reading.status, MeasurementStatus::Okay);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod connection;
pub mod control;
pub mod driver;
pub mod error;
pub mod identity;
pub mod status;

pub use binding::{NativeWlm, VersionField, WlmBinding};
pub use control::ControlFlags;
pub use driver::{decode_frequency, HighFinesse};
pub use error::{Quantity, Result, WlmError};
pub use identity::{InstrumentIdentity, SIMULATOR_ID};
pub use status::{describe_error, FrequencyReading, MeasurementError, MeasurementStatus, OperationState};
