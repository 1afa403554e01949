use std::str::FromStr;

use mqtt_client_options::{
    ClientOptions, KeyCertOptions, OptionsError, PemKeyCertOptions, PemTrustOptions, StoreOptions,
    TrustOptions,
};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn configured() -> ClientOptions {
    let mut options = ClientOptions::new();
    options
        .set_client_id("node-7")
        .set_username("user")
        .set_password("")
        .set_will_flag(true)
        .set_will_topic("clients/node-7/status")
        .set_will_message("offline")
        .set_will_qos(1)
        .set_will_retain(true)
        .set_clean_session(false)
        .set_keep_alive_time_seconds(15)
        .set_auto_keep_alive(false)
        .set_auto_generated_client_id(false)
        .set_max_inflight_queue(32)
        .set_host("broker.example.com")
        .set_port(8883)
        .set_ssl(true)
        .set_pem_trust_options(PemTrustOptions::default().with_cert_value("-----BEGIN CERTIFICATE-----"))
        .set_pem_key_cert_options(
            PemKeyCertOptions::default()
                .with_cert_path("client.pem")
                .with_key_path("client.key"),
        )
        .add_enabled_cipher_suite("TLS_AES_128_GCM_SHA256")
        .add_crl_path("revoked.crl");
    options
        .set_max_message_size(2048)
        .unwrap()
        .set_receive_buffer_size(4096)
        .unwrap()
        .set_ack_timeout(20)
        .unwrap();
    options
}

#[test]
fn test_round_trip_through_document() {
    init_logging();
    let options = configured();
    let document = options.to_json().unwrap();
    let restored = ClientOptions::from_json(&document).unwrap();
    assert_eq!(restored, options);
    assert_eq!(restored.password(), Some(""));
}

#[test]
fn test_document_uses_field_names() {
    let document = configured().to_json().unwrap();
    assert_eq!(document["clientId"], "node-7");
    assert_eq!(document["willQoS"], 1);
    assert_eq!(document["keepAliveTimeSeconds"], 15);
    assert_eq!(document["isAutoKeepAlive"], false);
    assert_eq!(document["isAutoGeneratedClientId"], false);
    assert_eq!(document["maxInflightQueue"], 32);
    assert_eq!(document["maxMessageSize"], 2048);
    assert_eq!(document["ackTimeout"], 20);
    assert_eq!(document["host"], "broker.example.com");
    assert_eq!(document["receiveBufferSize"], 4096);
    assert!(document.get("transport").is_none());
}

#[test]
fn test_absent_keys_keep_defaults() {
    init_logging();
    let options = ClientOptions::from_json(&json!({ "clientId": "abc", "unknownKey": [1, 2] })).unwrap();
    let mut expected = ClientOptions::new();
    expected.set_client_id("abc");
    assert_eq!(options, expected);

    let empty = ClientOptions::from_json(&json!({})).unwrap();
    assert_eq!(empty, ClientOptions::new());
}

#[test]
fn test_transport_keys_are_parsed() {
    let options = ClientOptions::from_json(&json!({
        "host": "10.0.0.2",
        "port": 1884,
        "trustAll": true,
        "keyCertOptions": { "jks": { "path": "client.jks", "password": "changeit" } },
        "trustOptions": { "pfx": { "path": "trust.p12" } },
        "enabledSecureTransportProtocols": ["TLSv1.3"]
    }))
    .unwrap();
    let t = options.transport();
    assert_eq!(t.host(), "10.0.0.2");
    assert_eq!(t.port(), 1884);
    assert!(t.is_trust_all());
    assert_eq!(
        t.key_cert_options(),
        Some(&KeyCertOptions::Jks(StoreOptions::from_path("client.jks").with_password("changeit")))
    );
    assert_eq!(t.trust_options(), Some(&TrustOptions::Pfx(StoreOptions::from_path("trust.p12"))));
    assert_eq!(t.enabled_secure_transport_protocols().len(), 1);
}

#[test]
fn test_setter_style_aliases_accepted() {
    let options = ClientOptions::from_json(&json!({
        "autoKeepAlive": false,
        "autoGeneratedClientId": false
    }))
    .unwrap();
    assert!(!options.is_auto_keep_alive());
    assert!(!options.is_auto_generated_client_id());
}

#[test]
fn test_type_mismatch_is_deserialization_error() {
    let err = ClientOptions::from_json(&json!({ "keepAliveTimeSeconds": "thirty" })).unwrap_err();
    assert!(matches!(err, OptionsError::Deserialization(_)));

    let err = ClientOptions::from_json(&json!({ "cleanSession": 1 })).unwrap_err();
    assert!(matches!(err, OptionsError::Deserialization(_)));

    let err = ClientOptions::from_str("{ not json").unwrap_err();
    assert!(matches!(err, OptionsError::Deserialization(_)));
}

#[test]
fn test_out_of_range_document_is_invalid_argument() {
    let err = ClientOptions::from_json(&json!({ "ackTimeout": 0 })).unwrap_err();
    assert!(matches!(err, OptionsError::InvalidArgument(_)));

    let err = ClientOptions::from_json(&json!({ "maxMessageSize": 0 })).unwrap_err();
    assert!(matches!(err, OptionsError::InvalidArgument(_)));

    let err = ClientOptions::from_json(&json!({ "maxMessageSize": 1000, "receiveBufferSize": 500 })).unwrap_err();
    assert!(matches!(err, OptionsError::InvalidArgument(_)));

    let ok = ClientOptions::from_json(&json!({ "maxMessageSize": 500, "receiveBufferSize": 1000 })).unwrap();
    assert_eq!(ok.max_message_size(), 500);
}

#[test]
fn test_from_str_and_try_from() {
    let options = ClientOptions::from_str(r#"{"username": "", "willQoS": 2}"#).unwrap();
    assert!(options.has_username());
    assert!(!options.has_password());
    assert_eq!(options.will_qos(), 2);

    let document = json!({ "ackTimeout": 9 });
    let options = ClientOptions::try_from(&document).unwrap();
    assert_eq!(options.ack_timeout(), 9);
}

#[test]
fn test_serde_deserialize_applies_setter_checks() {
    let direct = serde_json::from_value::<ClientOptions>(json!({
        "ackTimeout": 0,
        "maxMessageSize": 1000,
        "receiveBufferSize": 500
    }));
    assert!(direct.is_err());

    let conflicting = serde_json::from_value::<ClientOptions>(json!({ "maxMessageSize": 1000, "receiveBufferSize": 500 }));
    assert!(conflicting.is_err());

    #[derive(serde::Deserialize)]
    struct AppConfig {
        #[allow(dead_code)]
        name: String,
        mqtt: ClientOptions,
    }
    let nested = serde_json::from_value::<AppConfig>(json!({ "name": "gateway", "mqtt": { "receiveBufferSize": 0 } }));
    assert!(nested.is_err());

    let config: AppConfig = serde_json::from_value(json!({ "name": "gateway", "mqtt": { "ackTimeout": 3 } })).unwrap();
    assert_eq!(config.mqtt.ack_timeout(), 3);
}

#[test]
fn test_document_transport_range_is_invalid_argument() {
    let err = ClientOptions::from_json(&json!({ "receiveBufferSize": 0 })).unwrap_err();
    assert!(matches!(err, OptionsError::InvalidArgument(_)));
}
