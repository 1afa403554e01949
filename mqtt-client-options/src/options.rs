use std::{fmt, str::FromStr, time::Duration};

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{
        DEFAULT_ACK_TIMEOUT, DEFAULT_AUTO_GENERATED_CLIENT_ID, DEFAULT_AUTO_KEEP_ALIVE,
        DEFAULT_CLEAN_SESSION, DEFAULT_KEEP_ALIVE_TIME_SECONDS, DEFAULT_MAX_INFLIGHT_QUEUE,
        DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_WILL_FLAG, DEFAULT_WILL_QOS, DEFAULT_WILL_RETAIN,
        UNLIMITED,
    },
    transport::RawTransportOptions,
    KeyCertOptions, OptionsError, PemKeyCertOptions, PemTrustOptions, QoS, StoreOptions,
    TransportOptions, TrustOptions,
};

fn check_ack_timeout(seconds: i32) -> Result<(), OptionsError> {
    if seconds == 0 || seconds < UNLIMITED {
        return Err(OptionsError::invalid("timeout must be > 0 or equal to -1"));
    }
    Ok(())
}

fn check_max_message_size(size: i32) -> Result<(), OptionsError> {
    if size <= 0 && size != UNLIMITED {
        return Err(OptionsError::invalid("maxMessageSize must be > 0 or equal to -1"));
    }
    Ok(())
}

/// Both limits only constrain each other when both are positive.
fn check_fits_receive_buffer(max_message_size: i32, receive_buffer_size: i32) -> Result<(), OptionsError> {
    if max_message_size > 0 && receive_buffer_size > 0 && receive_buffer_size < max_message_size {
        return Err(OptionsError::invalid(
            "Receiver buffer size can't be lower than max message size",
        ));
    }
    Ok(())
}

/// Options used by an MQTT client to connect to a broker.
///
/// Cloning produces an independent copy of every field, transport settings included.
///
/// The JSON form is a single flat object holding both the MQTT keys (`clientId`, `willQoS`,
/// `keepAliveTimeSeconds`, ...) and the transport keys (`host`, `port`, `ssl`, ...).
/// Deserializing applies the same checks as the setters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawClientOptions")]
pub struct ClientOptions {
    #[serde(flatten)]
    transport: TransportOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    will_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    will_message: Option<String>,
    clean_session: bool,
    will_flag: bool,
    #[serde(rename = "willQoS")]
    will_qos: i32,
    will_retain: bool,
    keep_alive_time_seconds: i32,
    #[serde(rename = "isAutoKeepAlive")]
    auto_keep_alive: bool,
    #[serde(rename = "isAutoGeneratedClientId")]
    auto_generated_client_id: bool,
    max_inflight_queue: i32,
    max_message_size: i32,
    ack_timeout: i32,
}

/// Unchecked document form, every key optional
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawClientOptions {
    #[serde(flatten)]
    transport: RawTransportOptions,
    client_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
    will_topic: Option<String>,
    will_message: Option<String>,
    clean_session: bool,
    will_flag: bool,
    #[serde(rename = "willQoS")]
    will_qos: i32,
    will_retain: bool,
    keep_alive_time_seconds: i32,
    #[serde(rename = "isAutoKeepAlive", alias = "autoKeepAlive")]
    auto_keep_alive: bool,
    #[serde(rename = "isAutoGeneratedClientId", alias = "autoGeneratedClientId")]
    auto_generated_client_id: bool,
    max_inflight_queue: i32,
    max_message_size: i32,
    ack_timeout: i32,
}

impl Default for RawClientOptions {
    fn default() -> Self {
        Self {
            transport: RawTransportOptions::default(),
            client_id: None,
            username: None,
            password: None,
            will_topic: None,
            will_message: None,
            clean_session: DEFAULT_CLEAN_SESSION,
            will_flag: DEFAULT_WILL_FLAG,
            will_qos: DEFAULT_WILL_QOS,
            will_retain: DEFAULT_WILL_RETAIN,
            keep_alive_time_seconds: DEFAULT_KEEP_ALIVE_TIME_SECONDS,
            auto_keep_alive: DEFAULT_AUTO_KEEP_ALIVE,
            auto_generated_client_id: DEFAULT_AUTO_GENERATED_CLIENT_ID,
            max_inflight_queue: DEFAULT_MAX_INFLIGHT_QUEUE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
        }
    }
}

impl RawClientOptions {
    fn into_unchecked(self) -> ClientOptions {
        ClientOptions {
            transport: self.transport.into_unchecked(),
            client_id: self.client_id,
            username: self.username,
            password: self.password,
            will_topic: self.will_topic,
            will_message: self.will_message,
            clean_session: self.clean_session,
            will_flag: self.will_flag,
            will_qos: self.will_qos,
            will_retain: self.will_retain,
            keep_alive_time_seconds: self.keep_alive_time_seconds,
            auto_keep_alive: self.auto_keep_alive,
            auto_generated_client_id: self.auto_generated_client_id,
            max_inflight_queue: self.max_inflight_queue,
            max_message_size: self.max_message_size,
            ack_timeout: self.ack_timeout,
        }
    }
}

impl TryFrom<RawClientOptions> for ClientOptions {
    type Error = OptionsError;

    fn try_from(raw: RawClientOptions) -> Result<Self, Self::Error> {
        let options = raw.into_unchecked();
        options.check()?;
        Ok(options)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        RawClientOptions::default().into_unchecked()
    }
}

impl ClientOptions {
    /// Creates options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON object.
    ///
    /// Absent keys keep their defaults and unknown keys are ignored. A value of the wrong type
    /// fails with [OptionsError::Deserialization]; a value the setters would refuse fails with
    /// [OptionsError::InvalidArgument].
    pub fn from_json(document: &serde_json::Value) -> Result<Self, OptionsError> {
        let raw = RawClientOptions::deserialize(document)?;
        let options = ClientOptions::try_from(raw)?;
        debug!("Loaded client options {options}");
        Ok(options)
    }

    /// Dump the options, transport settings included, as a JSON object.
    pub fn to_json(&self) -> Result<serde_json::Value, OptionsError> {
        Ok(serde_json::to_value(self)?)
    }

    fn check(&self) -> Result<(), OptionsError> {
        self.transport.check()?;
        check_ack_timeout(self.ack_timeout)?;
        check_max_message_size(self.max_message_size)?;
        check_fits_receive_buffer(self.max_message_size, self.transport.receive_buffer_size())
    }

    /// Checks the values the setters accept verbatim.
    ///
    /// Fails when the will QoS is not 0, 1 or 2, the keep-alive is negative, the in-flight limit
    /// is not positive or the will flag is set without a will topic. Connection components should
    /// call this before using the options.
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.check()?;
        QoS::try_from(self.will_qos)?;
        if self.keep_alive_time_seconds < 0 {
            return Err(OptionsError::invalid("keepAliveTimeSeconds must be >= 0"));
        }
        if self.max_inflight_queue <= 0 {
            return Err(OptionsError::invalid("maxInflightQueue must be > 0"));
        }
        if self.will_flag && self.will_topic.is_none() {
            return Err(OptionsError::invalid("willFlag is set but no willTopic was provided"));
        }
        Ok(())
    }

    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }

    pub fn has_username(&self) -> bool {
        self.username.is_some()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn will_topic(&self) -> Option<&str> {
        self.will_topic.as_deref()
    }

    pub fn will_message(&self) -> Option<&str> {
        self.will_message.as_deref()
    }

    pub fn is_clean_session(&self) -> bool {
        self.clean_session
    }

    pub fn is_will_flag(&self) -> bool {
        self.will_flag
    }

    pub fn will_qos(&self) -> i32 {
        self.will_qos
    }

    pub fn is_will_retain(&self) -> bool {
        self.will_retain
    }

    pub fn keep_alive_time_seconds(&self) -> i32 {
        self.keep_alive_time_seconds
    }

    /// Keep-alive interval, zero when pings are disabled
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_time_seconds.max(0) as u64)
    }

    pub fn is_auto_keep_alive(&self) -> bool {
        self.auto_keep_alive
    }

    pub fn is_auto_generated_client_id(&self) -> bool {
        self.auto_generated_client_id
    }

    pub fn max_inflight_queue(&self) -> i32 {
        self.max_inflight_queue
    }

    pub fn max_message_size(&self) -> i32 {
        self.max_message_size
    }

    /// `None` when message size is unlimited
    pub fn max_message_size_limit(&self) -> Option<usize> {
        (self.max_message_size > 0).then_some(self.max_message_size as usize)
    }

    /// Seconds to wait for a PUBACK, PUBREC or PUBCOMP. -1 waits forever.
    pub fn ack_timeout(&self) -> i32 {
        self.ack_timeout
    }

    /// `None` when acknowledgements are awaited forever
    pub fn ack_timeout_duration(&self) -> Option<Duration> {
        (self.ack_timeout > 0).then(|| Duration::from_secs(self.ack_timeout as u64))
    }

    pub fn receive_buffer_size(&self) -> i32 {
        self.transport.receive_buffer_size()
    }

    /// The identifier to connect with.
    ///
    /// Falls back to a random UUID when no id is configured and auto generation is enabled, and
    /// to an empty id (assigned by the broker) otherwise.
    pub fn resolve_client_id(&self) -> String {
        match &self.client_id {
            Some(id) => id.clone(),
            None if self.auto_generated_client_id => Uuid::new_v4().to_string(),
            None => String::new(),
        }
    }

    pub fn set_client_id<S: Into<String>>(&mut self, client_id: S) -> &mut Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn set_username<S: Into<String>>(&mut self, username: S) -> &mut Self {
        self.username = Some(username.into());
        self
    }

    pub fn set_password<S: Into<String>>(&mut self, password: S) -> &mut Self {
        self.password = Some(password.into());
        self
    }

    pub fn set_will_topic<S: Into<String>>(&mut self, will_topic: S) -> &mut Self {
        self.will_topic = Some(will_topic.into());
        self
    }

    pub fn set_will_message<S: Into<String>>(&mut self, will_message: S) -> &mut Self {
        self.will_message = Some(will_message.into());
        self
    }

    pub fn set_clean_session(&mut self, clean_session: bool) -> &mut Self {
        self.clean_session = clean_session;
        self
    }

    pub fn set_will_flag(&mut self, will_flag: bool) -> &mut Self {
        self.will_flag = will_flag;
        self
    }

    /// Not range checked, see [ClientOptions::validate].
    pub fn set_will_qos(&mut self, will_qos: i32) -> &mut Self {
        self.will_qos = will_qos;
        self
    }

    pub fn set_will_retain(&mut self, will_retain: bool) -> &mut Self {
        self.will_retain = will_retain;
        self
    }

    /// 0 disables keep-alive pings. Not range checked, see [ClientOptions::validate].
    pub fn set_keep_alive_time_seconds(&mut self, seconds: i32) -> &mut Self {
        self.keep_alive_time_seconds = seconds;
        self
    }

    /// Set whether the client answers keep-alive on its own. When disabled the caller sends PINGREQs.
    pub fn set_auto_keep_alive(&mut self, auto_keep_alive: bool) -> &mut Self {
        self.auto_keep_alive = auto_keep_alive;
        self
    }

    pub fn set_auto_generated_client_id(&mut self, auto_generated_client_id: bool) -> &mut Self {
        self.auto_generated_client_id = auto_generated_client_id;
        self
    }

    pub fn set_max_inflight_queue(&mut self, max_inflight_queue: i32) -> &mut Self {
        self.max_inflight_queue = max_inflight_queue;
        self
    }

    /// Fails when `seconds` is 0 or below -1.
    pub fn set_ack_timeout(&mut self, seconds: i32) -> Result<&mut Self, OptionsError> {
        check_ack_timeout(seconds)?;
        self.ack_timeout = seconds;
        Ok(self)
    }

    /// Fails unless `size` is positive or -1, or when it exceeds a positive receive buffer size.
    pub fn set_max_message_size(&mut self, size: i32) -> Result<&mut Self, OptionsError> {
        check_max_message_size(size)?;
        check_fits_receive_buffer(size, self.transport.receive_buffer_size())?;
        self.max_message_size = size;
        Ok(self)
    }

    /// Fails when `size` is below a positive max message size, or is neither positive nor -1.
    pub fn set_receive_buffer_size(&mut self, size: i32) -> Result<&mut Self, OptionsError> {
        check_fits_receive_buffer(self.max_message_size, size)?;
        self.transport.set_receive_buffer_size(size)?;
        Ok(self)
    }

    #[deprecated(note = "use set_keep_alive_time_seconds")]
    pub fn set_idle_timeout(&mut self, seconds: i32) -> &mut Self {
        self.set_keep_alive_time_seconds(seconds)
    }

    pub fn set_host<S: Into<String>>(&mut self, host: S) -> &mut Self {
        self.transport.set_host(host);
        self
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.transport.set_port(port);
        self
    }

    pub fn set_send_buffer_size(&mut self, size: i32) -> Result<&mut Self, OptionsError> {
        self.transport.set_send_buffer_size(size)?;
        Ok(self)
    }

    /// Milliseconds
    pub fn set_connect_timeout(&mut self, millis: u64) -> &mut Self {
        self.transport.set_connect_timeout(millis);
        self
    }

    pub fn set_ssl(&mut self, ssl: bool) -> &mut Self {
        self.transport.set_ssl(ssl);
        self
    }

    pub fn set_trust_all(&mut self, trust_all: bool) -> &mut Self {
        self.transport.set_trust_all(trust_all);
        self
    }

    pub fn set_key_cert_options(&mut self, options: KeyCertOptions) -> &mut Self {
        self.transport.set_key_cert_options(options);
        self
    }

    pub fn set_key_store_options(&mut self, options: StoreOptions) -> &mut Self {
        self.transport.set_key_store_options(options);
        self
    }

    pub fn set_pfx_key_cert_options(&mut self, options: StoreOptions) -> &mut Self {
        self.transport.set_pfx_key_cert_options(options);
        self
    }

    pub fn set_pem_key_cert_options(&mut self, options: PemKeyCertOptions) -> &mut Self {
        self.transport.set_pem_key_cert_options(options);
        self
    }

    pub fn set_trust_options(&mut self, options: TrustOptions) -> &mut Self {
        self.transport.set_trust_options(options);
        self
    }

    pub fn set_trust_store_options(&mut self, options: StoreOptions) -> &mut Self {
        self.transport.set_trust_store_options(options);
        self
    }

    pub fn set_pfx_trust_options(&mut self, options: StoreOptions) -> &mut Self {
        self.transport.set_pfx_trust_options(options);
        self
    }

    pub fn set_pem_trust_options(&mut self, options: PemTrustOptions) -> &mut Self {
        self.transport.set_pem_trust_options(options);
        self
    }

    pub fn add_enabled_cipher_suite<S: Into<String>>(&mut self, suite: S) -> &mut Self {
        self.transport.add_enabled_cipher_suite(suite);
        self
    }

    pub fn add_enabled_secure_transport_protocol<S: Into<String>>(&mut self, protocol: S) -> &mut Self {
        self.transport.add_enabled_secure_transport_protocol(protocol);
        self
    }

    pub fn add_crl_path<S: Into<String>>(&mut self, path: S) -> &mut Self {
        self.transport.add_crl_path(path);
        self
    }

    pub fn add_crl_value<B: Into<Vec<u8>>>(&mut self, value: B) -> &mut Self {
        self.transport.add_crl_value(value);
        self
    }
}

impl TryFrom<&serde_json::Value> for ClientOptions {
    type Error = OptionsError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        ClientOptions::from_json(value)
    }
}

impl FromStr for ClientOptions {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let document: serde_json::Value = serde_json::from_str(s)?;
        ClientOptions::from_json(&document)
    }
}

struct Quoted<'a>(Option<&'a str>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(s) => write!(f, "'{s}'"),
            None => write!(f, "'null'"),
        }
    }
}

/// Summary of the MQTT settings for logs. The password is masked and transport settings are left out.
impl fmt::Display for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = self.password.as_ref().map(|_| "****");
        write!(
            f,
            "Options {{clientId={}, username={}, password={}, willTopic={}, willMessage={}, \
             cleanSession={}, willFlag={}, willQoS={}, willRetain={}, keepAliveTimeSeconds={}, \
             isAutoKeepAlive={}, isAutoGeneratedClientId={}, maxInflightQueue={}, \
             maxMessageSize={}, ackTimeout={}}}",
            Quoted(self.client_id()),
            Quoted(self.username()),
            Quoted(password),
            Quoted(self.will_topic()),
            Quoted(self.will_message()),
            self.clean_session,
            self.will_flag,
            self.will_qos,
            self.will_retain,
            self.keep_alive_time_seconds,
            self.auto_keep_alive,
            self.auto_generated_client_id,
            self.max_inflight_queue,
            self.max_message_size,
            self.ack_timeout,
        )
    }
}
