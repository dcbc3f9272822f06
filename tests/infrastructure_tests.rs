//! Infrastructure layer tests
//!
//! PhishTank response decoding and configuration, and the frame log
//! replay adapters.

use qrtrust::domain::entities::{DecodeErrorKind, ReputationVerdict, UnknownReason};
use qrtrust::domain::repositories::{
    CameraError, CameraProvider, DecodeEvent, DecodeFailure, Frame, FrameConstraints, FrameFeed,
    FrameStream, TransportError,
};
use qrtrust::domain::services::VerdictInterpreter;
use qrtrust::infrastructure::phishtank::{
    classify_status, decode_body, parse_xml, ConfigError, PhishTankConfig, DEFAULT_ENDPOINT,
    DEFAULT_USER_AGENT,
};
use qrtrust::infrastructure::replay::{
    parse_frame, parse_log, FrameLogError, ReplayCamera, ReplayDecoder,
};
use rstest::*;
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// ============================================================================
// Status classification
// ============================================================================

#[rstest]
#[case(200, None)]
#[case(204, None)]
#[case(509, Some(TransportError::RateLimited))]
#[case(429, Some(TransportError::RateLimited))]
#[case(500, Some(TransportError::Status { status: 500, reason: "Internal Server Error".into() }))]
#[case(403, Some(TransportError::Status { status: 403, reason: "Forbidden".into() }))]
fn test_classify_status(#[case] status: u16, #[case] expected: Option<TransportError>) {
    assert_eq!(classify_status(status), expected);
}

// ============================================================================
// Body decoding
// ============================================================================

const XML_LISTED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<response>
  <meta><timestamp>2024-01-01T00:00:00+00:00</timestamp></meta>
  <results>
    <url0>
      <url>http://phish.example/</url>
      <in_database>true</in_database>
      <phish_id>1234</phish_id>
      <verified>true</verified>
      <valid>true</valid>
    </url0>
  </results>
</response>"#;

#[rstest]
fn test_decode_json_body() {
    let body = decode_body(
        "application/json; charset=utf-8",
        r#"{"results":{"in_database":true,"verified":"y"}}"#,
    )
    .unwrap();
    assert_eq!(body, json!({"results": {"in_database": true, "verified": "y"}}));
}

#[rstest]
fn test_decode_invalid_json_is_malformed() {
    let err = decode_body("application/json", "{not json").unwrap_err();
    assert!(matches!(err, TransportError::Malformed(_)));
}

#[rstest]
#[case("text/xml")]
#[case("application/xml; charset=utf-8")]
#[case("text/html")]
#[case("")]
fn test_decode_xml_body(#[case] content_type: &str) {
    let body = decode_body(content_type, XML_LISTED).unwrap();
    assert_eq!(
        body,
        json!({"results": {
            "url": "http://phish.example/",
            "in_database": "true",
            "verified": "true",
            "valid": "true",
            "phish_id": 1234
        }})
    );
}

#[rstest]
fn test_unknown_content_type_prefers_json() {
    let body = decode_body("text/plain", r#"{"results":{"in_database":false}}"#).unwrap();
    assert_eq!(body, json!({"results": {"in_database": false}}));
}

#[rstest]
fn test_unknown_content_type_garbage_is_malformed() {
    let err = decode_body("text/html", "<html><body>Service unavailable</body></html>").unwrap_err();
    match err {
        TransportError::Malformed(detail) => assert!(detail.contains("text/html")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[rstest]
#[case("application/json", r#"{"errortext":"You must supply a URL to use this function."}"#)]
#[case("text/xml", "<response><errortext>You must supply a URL to use this function.</errortext></response>")]
#[case("", "<response><errortext>You must supply a URL to use this function.</errortext></response>")]
fn test_errortext_is_service_error(#[case] content_type: &str, #[case] text: &str) {
    assert_eq!(
        decode_body(content_type, text),
        Err(TransportError::Service(
            "You must supply a URL to use this function.".into()
        ))
    );
}

#[rstest]
fn test_xml_keeps_missing_flags_missing() {
    let body = parse_xml("<results><url>http://a</url><in_database>false</in_database></results>")
        .unwrap();
    assert_eq!(body, json!({"results": {"url": "http://a", "in_database": "false"}}));
}

fn xml_flags(in_database: &str, verified: &str) -> String {
    format!(
        "<response><results><url>http://p</url><in_database>{}</in_database>\
         <verified>{}</verified></results></response>",
        in_database, verified
    )
}

#[rstest]
#[case("true", "y", ReputationVerdict::Suspicious)]
#[case("y", " Y ", ReputationVerdict::Suspicious)]
#[case("true", "true", ReputationVerdict::Suspicious)]
#[case("true", "n", ReputationVerdict::Safe)]
#[case("false", "false", ReputationVerdict::Safe)]
#[case(
    "true",
    "garbage",
    ReputationVerdict::Unknown(UnknownReason::UnrecognizedFlag {
        field: "verified",
        value: "\"garbage\"".into()
    })
)]
#[case(
    "maybe",
    "y",
    ReputationVerdict::Unknown(UnknownReason::UnrecognizedFlag {
        field: "in_database",
        value: "\"maybe\"".into()
    })
)]
fn test_xml_flags_resolve_like_json(
    #[case] in_database: &str,
    #[case] verified: &str,
    #[case] expected: ReputationVerdict,
) {
    let body = decode_body("text/xml", &xml_flags(in_database, verified)).unwrap();
    assert_eq!(VerdictInterpreter::interpret(&body), expected);
}

// ============================================================================
// Configuration
// ============================================================================

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[rstest]
fn test_config_defaults() {
    let config = PhishTankConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, PhishTankConfig::default());
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(config.app_key, None);
}

#[rstest]
fn test_config_overrides() {
    let config = PhishTankConfig::from_lookup(lookup(&[
        ("QRTRUST_ENDPOINT", "https://proxy.example/.netlify/functions/checkurl"),
        ("QRTRUST_APP_KEY", "abc123"),
        ("QRTRUST_TIMEOUT_MS", "2500"),
    ]))
    .unwrap();

    assert_eq!(
        config.endpoint,
        "https://proxy.example/.netlify/functions/checkurl"
    );
    assert_eq!(config.app_key.as_deref(), Some("abc123"));
    assert_eq!(config.timeout, Duration::from_millis(2500));
}

#[rstest]
fn test_config_blank_values_keep_defaults() {
    let config = PhishTankConfig::from_lookup(lookup(&[("QRTRUST_APP_KEY", "   ")])).unwrap();
    assert_eq!(config.app_key, None);
}

#[rstest]
#[case("soon")]
#[case("0")]
#[case("-5")]
fn test_config_rejects_bad_timeout(#[case] raw: &str) {
    let err = PhishTankConfig::from_lookup(lookup(&[("QRTRUST_TIMEOUT_MS", raw)])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidTimeout(raw.to_string()));
}

#[rstest]
fn test_config_rejects_non_http_endpoint() {
    let err =
        PhishTankConfig::from_lookup(lookup(&[("QRTRUST_ENDPOINT", "ftp://x")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
}

// ============================================================================
// Frame log
// ============================================================================

#[rstest]
#[case("none", DecodeEvent::Failed(DecodeFailure::no_detection()))]
#[case("  NONE  ", DecodeEvent::Failed(DecodeFailure::no_detection()))]
#[case("checksum", DecodeEvent::Failed(DecodeFailure::checksum_mismatch()))]
#[case("error lens fogged", DecodeEvent::Failed(DecodeFailure::new(DecodeErrorKind::Other, "lens fogged")))]
#[case("code https://a.example/?q=1 2", DecodeEvent::Decoded("https://a.example/?q=1 2".into()))]
fn test_parse_frame(#[case] record: &str, #[case] expected: DecodeEvent) {
    assert_eq!(parse_frame(record), Ok(expected));
}

#[rstest]
#[case("code")]
#[case("blink")]
fn test_parse_frame_rejects(#[case] record: &str) {
    assert!(parse_frame(record).is_err());
}

#[rstest]
fn test_parse_log_skips_comments_and_blanks() {
    let records = parse_log("# warm-up\nnone\n\n  checksum\ncode https://a.example\n").unwrap();
    assert_eq!(records, vec!["none", "checksum", "code https://a.example"]);
}

#[rstest]
fn test_parse_log_reports_line_number() {
    let err = parse_log("none\nnone\nwobble\n").unwrap_err();
    match err {
        FrameLogError::Syntax { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[rstest]
fn test_replay_camera_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "none\nnone\ncode https://a.example").unwrap();

    let camera = ReplayCamera::from_path(file.path()).unwrap();
    assert_eq!(camera.frame_count(), 3);
}

#[rstest]
fn test_replay_camera_missing_file() {
    let err = ReplayCamera::from_path(std::path::Path::new("/nonexistent/frames.log"))
        .err()
        .expect("missing file");
    assert!(matches!(err, FrameLogError::Io(_)));
}

#[rstest]
fn test_empty_recording_has_no_device() {
    let camera = ReplayCamera::from_records("empty", vec![]);
    let err = camera
        .acquire(&FrameConstraints::default())
        .err()
        .expect("no frames");
    assert_eq!(err, CameraError::NoDevice);
}

#[rstest]
fn test_replay_stream_stops_feeding_after_release() {
    let camera = ReplayCamera::from_records("rec", vec!["none".into(), "none".into()]);
    let mut stream = camera.acquire(&FrameConstraints::default()).unwrap();
    let feed = stream.feed();

    let first = feed.next_frame().unwrap();
    assert_eq!(first.sequence, 0);
    assert_eq!((first.width, first.height), (1280, 720));

    stream.stop_tracks();
    stream.detach();
    stream.reset_target();
    assert_eq!(feed.next_frame(), None);
}

#[rstest]
fn test_replay_decoder_decodes_frames() {
    let frame = |data: &str| Frame {
        sequence: 4,
        width: 1,
        height: 1,
        data: data.as_bytes().to_vec(),
    };

    assert_eq!(
        ReplayDecoder::decode_frame(&frame("code https://a.example")),
        DecodeEvent::Decoded("https://a.example".into())
    );
    match ReplayDecoder::decode_frame(&frame("garbage")) {
        DecodeEvent::Failed(failure) => {
            assert_eq!(failure.kind, DecodeErrorKind::Other);
            assert!(failure.message.starts_with("frame 4"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}
