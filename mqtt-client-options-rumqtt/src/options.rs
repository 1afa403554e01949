use log::{trace, warn};
use mqtt_client_options::{
  constants::DEFAULT_SECURE_TRANSPORT_PROTOCOLS, ClientOptions, KeyCertOptions, QoS, TrustOptions,
};
use rumqttc::{LastWill, MqttOptions, NetworkOptions, Transport};

use crate::ConversionError;

fn qos_to_mqtt_qos(qos: QoS) -> rumqttc::QoS {
  match qos {
    QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
    QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
    QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
  }
}

/// Concatenate PEM files and inline PEM values into one bundle
fn pem_bundle(paths: &[String], values: &[Vec<u8>]) -> Result<Vec<u8>, ConversionError> {
  let mut bundle = Vec::new();
  for path in paths {
    let pem = std::fs::read(path).map_err(|source| ConversionError::Io { path: path.clone(), source })?;
    bundle.extend_from_slice(&pem);
    bundle.push(b'\n');
  }
  for value in values {
    bundle.extend_from_slice(value);
    bundle.push(b'\n');
  }
  Ok(bundle)
}

fn tls_transport(options: &ClientOptions) -> Result<Transport, ConversionError> {
  let transport = options.transport();

  let client_auth = match transport.key_cert_options() {
    None => None,
    Some(KeyCertOptions::Pem(pem)) => Some((
      pem_bundle(&pem.cert_paths, &pem.cert_values)?,
      pem_bundle(&pem.key_paths, &pem.key_values)?,
    )),
    Some(KeyCertOptions::Jks(_)) => return Err(ConversionError::UnsupportedStore("JKS")),
    Some(KeyCertOptions::Pfx(_)) => return Err(ConversionError::UnsupportedStore("PFX")),
  };

  match transport.trust_options() {
    Some(TrustOptions::Pem(pem)) => {
      let ca = pem_bundle(&pem.cert_paths, &pem.cert_values)?;
      Ok(Transport::tls(ca, client_auth, None))
    },
    Some(TrustOptions::Jks(_)) => Err(ConversionError::UnsupportedStore("JKS")),
    Some(TrustOptions::Pfx(_)) => Err(ConversionError::UnsupportedStore("PFX")),
    None => {
      if client_auth.is_some() {
        warn!("Client certificate ignored: it requires PEM trust options");
      }
      Ok(Transport::tls_with_default_config())
    }
  }
}

fn warn_unsupported(options: &ClientOptions) {
  if let Some(timeout) = options.ack_timeout_duration() {
    warn!("rumqttc has no ack timeout, ignoring ackTimeout = {}s", timeout.as_secs());
  }
  if !options.is_auto_keep_alive() {
    warn!("rumqttc always sends PINGREQs, ignoring isAutoKeepAlive = false");
  }

  let transport = options.transport();
  if !transport.is_ssl() {
    return;
  }
  if transport.is_trust_all() {
    warn!("rumqttc cannot skip certificate verification, ignoring trustAll");
  }
  if !transport.crl_paths().is_empty() || !transport.crl_values().is_empty() {
    warn!("rumqttc does not check revocation lists, ignoring CRLs");
  }
  if !transport.enabled_cipher_suites().is_empty() {
    warn!("rumqttc uses its own cipher suites, ignoring enabledCipherSuites");
  }
  let default_protocols = transport
    .enabled_secure_transport_protocols()
    .iter()
    .map(String::as_str)
    .eq(DEFAULT_SECURE_TRANSPORT_PROTOCOLS.iter().copied());
  if !default_protocols {
    warn!("rumqttc uses its own protocol versions, ignoring enabledSecureTransportProtocols");
  }
}

/// Build the [MqttOptions] for one connection attempt.
///
/// The options are [validated](ClientOptions::validate) first. A missing client id is generated
/// when auto generation is enabled.
pub fn mqtt_options(options: &ClientOptions) -> Result<MqttOptions, ConversionError> {
  options.validate()?;

  let client_id = options.resolve_client_id();
  /* rumqttc panics on a persistent session without an id */
  if client_id.is_empty() && !options.is_clean_session() {
    return Err(ConversionError::EmptyClientId);
  }
  let inflight = u16::try_from(options.max_inflight_queue())
    .map_err(|_| ConversionError::Inflight(options.max_inflight_queue()))?;
  /* CONNECT carries the keep-alive in 16 bits */
  if u16::try_from(options.keep_alive_time_seconds()).is_err() {
    return Err(ConversionError::KeepAlive(options.keep_alive_time_seconds()));
  }

  let transport = options.transport();
  let mut mqtt = MqttOptions::new(client_id, transport.host(), transport.port());
  mqtt
    .set_keep_alive(options.keep_alive())
    .set_clean_session(options.is_clean_session())
    .set_inflight(inflight);

  match (options.username(), options.password()) {
    (Some(username), password) => {
      mqtt.set_credentials(username, password.unwrap_or_default());
    },
    (None, Some(_)) => warn!("Password ignored: MQTT requires a username alongside a password"),
    (None, None) => (),
  }

  if options.is_will_flag() {
    let qos = QoS::try_from(options.will_qos())?;
    let will = LastWill::new(
      options.will_topic().unwrap_or_default(),
      options.will_message().unwrap_or_default().to_owned(),
      qos_to_mqtt_qos(qos),
      options.is_will_retain(),
    );
    mqtt.set_last_will(will);
  }

  if let Some(limit) = options.max_message_size_limit() {
    mqtt.set_max_packet_size(limit, limit);
  }

  if transport.is_ssl() {
    mqtt.set_transport(tls_transport(options)?);
  }

  warn_unsupported(options);
  trace!("{mqtt:?}");
  Ok(mqtt)
}

/// Socket settings for the rumqttc [EventLoop](rumqttc::EventLoop). Unset buffer sizes are left to the OS.
///
/// A connect timeout of 0 means no timeout, which rumqttc cannot express; its default applies.
pub fn network_options(options: &ClientOptions) -> NetworkOptions {
  let transport = options.transport();
  let mut network = NetworkOptions::new();
  if transport.receive_buffer_size() > 0 {
    network.set_tcp_recv_buffer_size(transport.receive_buffer_size() as u32);
  }
  if transport.send_buffer_size() > 0 {
    network.set_tcp_send_buffer_size(transport.send_buffer_size() as u32);
  }
  if transport.connect_timeout() > 0 {
    network.set_connection_timeout(transport.connect_timeout().div_ceil(1000));
  }
  network
}
