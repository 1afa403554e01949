use mqtt_client_options::OptionsError;
use thiserror::Error;

/// Reasons a [ClientOptions](mqtt_client_options::ClientOptions) cannot be turned into rumqttc options.
#[derive(Error, Debug)]
pub enum ConversionError {
  #[error("Invalid options: {0}")]
  Options(#[from] OptionsError),
  #[error("A persistent session requires a client id")]
  EmptyClientId,
  #[error("Max inflight queue must fit in 1..=65535, got {0}")]
  Inflight(i32),
  #[error("Keep-alive must fit in 0..=65535 seconds, got {0}")]
  KeepAlive(i32),
  #[error("{0} stores are not supported by rumqttc, use PEM")]
  UnsupportedStore(&'static str),
  #[error("Unable to read {path}: {source}")]
  Io {
    path: String,
    source: std::io::Error,
  },
}
