use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RECEIVE_BUFFER_SIZE,
        DEFAULT_SECURE_TRANSPORT_PROTOCOLS, DEFAULT_SEND_BUFFER_SIZE, UNLIMITED,
    },
    OptionsError,
};

/// A password protected key or trust store (JKS or PKCS#12), given either as a file path or as raw bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl StoreOptions {
    pub fn from_path<S: Into<String>>(path: S) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// PEM encoded client certificate chains and their private keys.
///
/// The n-th key belongs to the n-th certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PemKeyCertOptions {
    pub cert_paths: Vec<String>,
    pub key_paths: Vec<String>,
    pub cert_values: Vec<Vec<u8>>,
    pub key_values: Vec<Vec<u8>>,
}

impl PemKeyCertOptions {
    pub fn with_cert_path<S: Into<String>>(mut self, path: S) -> Self {
        self.cert_paths.push(path.into());
        self
    }

    pub fn with_key_path<S: Into<String>>(mut self, path: S) -> Self {
        self.key_paths.push(path.into());
        self
    }

    pub fn with_cert_value<B: Into<Vec<u8>>>(mut self, value: B) -> Self {
        self.cert_values.push(value.into());
        self
    }

    pub fn with_key_value<B: Into<Vec<u8>>>(mut self, value: B) -> Self {
        self.key_values.push(value.into());
        self
    }
}

/// PEM encoded certificate authorities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PemTrustOptions {
    pub cert_paths: Vec<String>,
    pub cert_values: Vec<Vec<u8>>,
}

impl PemTrustOptions {
    pub fn with_cert_path<S: Into<String>>(mut self, path: S) -> Self {
        self.cert_paths.push(path.into());
        self
    }

    pub fn with_cert_value<B: Into<Vec<u8>>>(mut self, value: B) -> Self {
        self.cert_values.push(value.into());
        self
    }
}

/// Where the client certificate and private key come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyCertOptions {
    Jks(StoreOptions),
    Pfx(StoreOptions),
    Pem(PemKeyCertOptions),
}

/// Where the trusted certificate authorities come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrustOptions {
    Jks(StoreOptions),
    Pfx(StoreOptions),
    Pem(PemTrustOptions),
}

/// Network level settings: broker address, TLS and socket options.
///
/// [ClientOptions](crate::ClientOptions) embeds one of these and forwards every setter, so
/// most callers never touch this type directly. Deserializing applies the setter checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTransportOptions")]
pub struct TransportOptions {
    host: String,
    port: u16,
    ssl: bool,
    trust_all: bool,
    receive_buffer_size: i32,
    send_buffer_size: i32,
    connect_timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_cert_options: Option<KeyCertOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trust_options: Option<TrustOptions>,
    enabled_cipher_suites: BTreeSet<String>,
    enabled_secure_transport_protocols: BTreeSet<String>,
    crl_paths: Vec<String>,
    crl_values: Vec<Vec<u8>>,
}

/// Unchecked document form, every key optional
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawTransportOptions {
    host: String,
    port: u16,
    ssl: bool,
    trust_all: bool,
    receive_buffer_size: i32,
    send_buffer_size: i32,
    connect_timeout: u64,
    key_cert_options: Option<KeyCertOptions>,
    trust_options: Option<TrustOptions>,
    enabled_cipher_suites: BTreeSet<String>,
    enabled_secure_transport_protocols: BTreeSet<String>,
    crl_paths: Vec<String>,
    crl_values: Vec<Vec<u8>>,
}

impl Default for RawTransportOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            ssl: false,
            trust_all: false,
            receive_buffer_size: DEFAULT_RECEIVE_BUFFER_SIZE,
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            key_cert_options: None,
            trust_options: None,
            enabled_cipher_suites: BTreeSet::new(),
            enabled_secure_transport_protocols: DEFAULT_SECURE_TRANSPORT_PROTOCOLS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            crl_paths: Vec::new(),
            crl_values: Vec::new(),
        }
    }
}

impl RawTransportOptions {
    pub(crate) fn into_unchecked(self) -> TransportOptions {
        TransportOptions {
            host: self.host,
            port: self.port,
            ssl: self.ssl,
            trust_all: self.trust_all,
            receive_buffer_size: self.receive_buffer_size,
            send_buffer_size: self.send_buffer_size,
            connect_timeout: self.connect_timeout,
            key_cert_options: self.key_cert_options,
            trust_options: self.trust_options,
            enabled_cipher_suites: self.enabled_cipher_suites,
            enabled_secure_transport_protocols: self.enabled_secure_transport_protocols,
            crl_paths: self.crl_paths,
            crl_values: self.crl_values,
        }
    }
}

impl TryFrom<RawTransportOptions> for TransportOptions {
    type Error = OptionsError;

    fn try_from(raw: RawTransportOptions) -> Result<Self, Self::Error> {
        let transport = raw.into_unchecked();
        transport.check()?;
        Ok(transport)
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        RawTransportOptions::default().into_unchecked()
    }
}

fn check_buffer_size(name: &str, size: i32) -> Result<(), OptionsError> {
    if size <= 0 && size != UNLIMITED {
        return Err(OptionsError::invalid(format!(
            "{name} must be > 0 or equal to -1"
        )));
    }
    Ok(())
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ssl(&self) -> bool {
        self.ssl
    }

    pub fn is_trust_all(&self) -> bool {
        self.trust_all
    }

    /// Socket receive buffer size in bytes, -1 when left to the operating system
    pub fn receive_buffer_size(&self) -> i32 {
        self.receive_buffer_size
    }

    /// Socket send buffer size in bytes, -1 when left to the operating system
    pub fn send_buffer_size(&self) -> i32 {
        self.send_buffer_size
    }

    /// Connect timeout in milliseconds
    pub fn connect_timeout(&self) -> u64 {
        self.connect_timeout
    }

    pub fn key_cert_options(&self) -> Option<&KeyCertOptions> {
        self.key_cert_options.as_ref()
    }

    pub fn trust_options(&self) -> Option<&TrustOptions> {
        self.trust_options.as_ref()
    }

    pub fn enabled_cipher_suites(&self) -> &BTreeSet<String> {
        &self.enabled_cipher_suites
    }

    pub fn enabled_secure_transport_protocols(&self) -> &BTreeSet<String> {
        &self.enabled_secure_transport_protocols
    }

    pub fn crl_paths(&self) -> &[String] {
        &self.crl_paths
    }

    pub fn crl_values(&self) -> &[Vec<u8>] {
        &self.crl_values
    }

    pub fn set_host<S: Into<String>>(&mut self, host: S) -> &mut Self {
        self.host = host.into();
        self
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn set_ssl(&mut self, ssl: bool) -> &mut Self {
        self.ssl = ssl;
        self
    }

    pub fn set_trust_all(&mut self, trust_all: bool) -> &mut Self {
        self.trust_all = trust_all;
        self
    }

    /// Fails unless `size` is positive or -1.
    pub fn set_receive_buffer_size(&mut self, size: i32) -> Result<&mut Self, OptionsError> {
        check_buffer_size("receiveBufferSize", size)?;
        self.receive_buffer_size = size;
        Ok(self)
    }

    /// Fails unless `size` is positive or -1.
    pub fn set_send_buffer_size(&mut self, size: i32) -> Result<&mut Self, OptionsError> {
        check_buffer_size("sendBufferSize", size)?;
        self.send_buffer_size = size;
        Ok(self)
    }

    pub fn set_connect_timeout(&mut self, millis: u64) -> &mut Self {
        self.connect_timeout = millis;
        self
    }

    pub fn set_key_cert_options(&mut self, options: KeyCertOptions) -> &mut Self {
        self.key_cert_options = Some(options);
        self
    }

    pub fn set_key_store_options(&mut self, options: StoreOptions) -> &mut Self {
        self.set_key_cert_options(KeyCertOptions::Jks(options))
    }

    pub fn set_pfx_key_cert_options(&mut self, options: StoreOptions) -> &mut Self {
        self.set_key_cert_options(KeyCertOptions::Pfx(options))
    }

    pub fn set_pem_key_cert_options(&mut self, options: PemKeyCertOptions) -> &mut Self {
        self.set_key_cert_options(KeyCertOptions::Pem(options))
    }

    pub fn set_trust_options(&mut self, options: TrustOptions) -> &mut Self {
        self.trust_options = Some(options);
        self
    }

    pub fn set_trust_store_options(&mut self, options: StoreOptions) -> &mut Self {
        self.set_trust_options(TrustOptions::Jks(options))
    }

    pub fn set_pfx_trust_options(&mut self, options: StoreOptions) -> &mut Self {
        self.set_trust_options(TrustOptions::Pfx(options))
    }

    pub fn set_pem_trust_options(&mut self, options: PemTrustOptions) -> &mut Self {
        self.set_trust_options(TrustOptions::Pem(options))
    }

    pub fn add_enabled_cipher_suite<S: Into<String>>(&mut self, suite: S) -> &mut Self {
        self.enabled_cipher_suites.insert(suite.into());
        self
    }

    pub fn add_enabled_secure_transport_protocol<S: Into<String>>(
        &mut self,
        protocol: S,
    ) -> &mut Self {
        self.enabled_secure_transport_protocols
            .insert(protocol.into());
        self
    }

    pub fn add_crl_path<S: Into<String>>(&mut self, path: S) -> &mut Self {
        self.crl_paths.push(path.into());
        self
    }

    pub fn add_crl_value<B: Into<Vec<u8>>>(&mut self, value: B) -> &mut Self {
        self.crl_values.push(value.into());
        self
    }

    /// The setter checks, re-run on deserialized values
    pub(crate) fn check(&self) -> Result<(), OptionsError> {
        check_buffer_size("receiveBufferSize", self.receive_buffer_size)?;
        check_buffer_size("sendBufferSize", self.send_buffer_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = TransportOptions::new();
        assert_eq!(t.host(), "localhost");
        assert_eq!(t.port(), 1883);
        assert!(!t.is_ssl());
        assert_eq!(t.receive_buffer_size(), -1);
        assert_eq!(t.send_buffer_size(), -1);
        assert!(t.enabled_secure_transport_protocols().contains("TLSv1.3"));
        assert!(t.key_cert_options().is_none());
    }

    #[test]
    fn test_buffer_size_range() {
        let mut t = TransportOptions::new();
        assert!(t.set_receive_buffer_size(0).is_err());
        assert!(t.set_send_buffer_size(-7).is_err());
        assert_eq!(t.receive_buffer_size(), -1);
        t.set_receive_buffer_size(1024).unwrap();
        t.set_send_buffer_size(-1).unwrap();
        assert_eq!(t.receive_buffer_size(), 1024);
    }

    #[test]
    fn test_deserialize_applies_buffer_checks() {
        let err = serde_json::from_value::<TransportOptions>(serde_json::json!({ "receiveBufferSize": 0 }));
        assert!(err.is_err());

        let t: TransportOptions = serde_json::from_value(serde_json::json!({ "sendBufferSize": 512 })).unwrap();
        assert_eq!(t.send_buffer_size(), 512);
        assert_eq!(t.host(), "localhost");
    }

    #[test]
    fn test_store_setters_share_slot() {
        let mut t = TransportOptions::new();
        t.set_key_store_options(StoreOptions::from_path("client.jks"));
        t.set_pem_key_cert_options(PemKeyCertOptions::default().with_cert_path("client.pem"));
        assert!(matches!(t.key_cert_options(), Some(KeyCertOptions::Pem(_))));

        t.set_pem_trust_options(PemTrustOptions::default().with_cert_path("ca.pem"));
        t.set_trust_store_options(StoreOptions::from_path("trust.jks").with_password("secret"));
        match t.trust_options() {
            Some(TrustOptions::Jks(store)) => assert_eq!(store.password.as_deref(), Some("secret")),
            other => panic!("unexpected trust options {other:?}"),
        }
    }

    #[test]
    fn test_allow_lists_are_sets() {
        let mut t = TransportOptions::new();
        t.add_enabled_cipher_suite("TLS_AES_128_GCM_SHA256")
            .add_enabled_cipher_suite("TLS_AES_128_GCM_SHA256")
            .add_crl_path("a.crl")
            .add_crl_path("a.crl");
        assert_eq!(t.enabled_cipher_suites().len(), 1);
        assert_eq!(t.crl_paths().len(), 2);
    }
}
