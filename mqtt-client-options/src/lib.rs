//! Connection options for MQTT clients.
//!
//! [ClientOptions] bundles everything a client needs to open and keep a session with a broker:
//! identity, credentials, last will, keep-alive and flow-control limits, plus the embedded
//! [TransportOptions] block (host, port, TLS and socket settings).
//!
//! Options are mutated through chainable setters. Setters guarding a numeric invariant return a
//! [Result] and leave the options untouched on failure:
//!
//! ```
//! use mqtt_client_options::ClientOptions;
//!
//! let mut options = ClientOptions::new();
//! options
//!     .set_client_id("sensor-1")
//!     .set_keep_alive_time_seconds(60)
//!     .set_max_message_size(4096)?
//!     .set_receive_buffer_size(8192)?
//!     .set_ssl(true);
//! assert_eq!(options.max_message_size(), 4096);
//! # Ok::<(), mqtt_client_options::OptionsError>(())
//! ```
//!
//! Options can also be loaded from, and dumped to, a flat JSON document. See [ClientOptions::from_json].

pub mod constants;

mod error;
mod options;
mod qos;
mod transport;

pub use error::OptionsError;
pub use options::ClientOptions;
pub use qos::QoS;
pub use transport::*;
