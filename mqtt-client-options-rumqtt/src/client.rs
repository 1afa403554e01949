use mqtt_client_options::ClientOptions;
use rumqttc::{AsyncClient, EventLoop};

use crate::{mqtt_options, network_options, ConversionError};

/// Create a rumqttc client and its event loop from `options`.
///
/// `cap` specifies the capacity of the bounded async channel for the client handle.
/// Nothing is sent until the event loop is polled.
pub fn connect(options: &ClientOptions, cap: usize) -> Result<(AsyncClient, EventLoop), ConversionError> {
  let mqtt = mqtt_options(options)?;
  let (client, mut eventloop) = AsyncClient::new(mqtt, cap);
  eventloop.set_network_options(network_options(options));
  Ok((client, eventloop))
}
