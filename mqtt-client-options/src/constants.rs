pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TLS_PORT: u16 = 8883;
pub const DEFAULT_HOST: &str = "localhost";

pub const DEFAULT_WILL_QOS: i32 = 0;
pub const DEFAULT_KEEP_ALIVE_TIME_SECONDS: i32 = 30;
pub const DEFAULT_MAX_INFLIGHT_QUEUE: i32 = 10;
pub const DEFAULT_CLEAN_SESSION: bool = true;
pub const DEFAULT_WILL_FLAG: bool = false;
pub const DEFAULT_WILL_RETAIN: bool = false;
pub const DEFAULT_AUTO_KEEP_ALIVE: bool = true;
pub const DEFAULT_AUTO_GENERATED_CLIENT_ID: bool = true;

/// Sentinel for "no limit" on sizes and timeouts
pub const UNLIMITED: i32 = -1;

pub const DEFAULT_MAX_MESSAGE_SIZE: i32 = UNLIMITED;
pub const DEFAULT_ACK_TIMEOUT: i32 = UNLIMITED;

/// Socket buffer sizes left to the operating system
pub const DEFAULT_RECEIVE_BUFFER_SIZE: i32 = UNLIMITED;
pub const DEFAULT_SEND_BUFFER_SIZE: i32 = UNLIMITED;

/// Milliseconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 60_000;

pub const DEFAULT_SECURE_TRANSPORT_PROTOCOLS: &[&str] = &["TLSv1.2", "TLSv1.3"];
