//! Part of [mqtt-client-options](https://crates.io/crates/mqtt-client-options).
//!
//! Builds [rumqttc] clients from a [ClientOptions](mqtt_client_options::ClientOptions).
//!
//! rumqttc has no equivalent for some options (ack timeout, manual keep-alive, trust-all, CRLs,
//! cipher suite and protocol allow-lists). These are logged at `warn` level and otherwise ignored.

mod client;
mod error;
mod options;

pub use client::connect;
pub use error::ConversionError;
pub use options::{mqtt_options, network_options};
pub use rumqttc::{AsyncClient, EventLoop, MqttOptions, NetworkOptions};
