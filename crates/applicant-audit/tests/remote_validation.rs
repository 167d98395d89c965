use std::time::Duration;

use applicant_audit::config::EconConfig;
use applicant_audit::remote::wire::{
    self, RemoteAttribute, ValidationVerdict, WireError, PROTOCOL_VERSION, STATUS_OK,
};
use applicant_audit::remote::{
    EconClient, RemoteValidationError, RemoteValidator, ValidationRequest,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn bound_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let endpoint = listener.local_addr().expect("local addr").to_string();
    (listener, endpoint)
}

fn client(endpoint: &str) -> EconClient {
    EconClient::new(&EconConfig {
        endpoint: endpoint.to_string(),
        timeout: Duration::from_millis(500),
    })
}

/// Accept one connection, read the request frame, reply with the raw bytes
/// given. Returns the decoded request for assertions.
async fn serve_once(listener: TcpListener, response: Vec<u8>) -> ValidationRequest {
    let (mut stream, _) = listener.accept().await.expect("accept");

    let mut len_bytes = [0u8; 4];
    stream.read_exact(&mut len_bytes).await.expect("frame len");
    let len = u32::from_be_bytes(len_bytes) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await.expect("frame body");
    let request = wire::decode_request(&body).expect("well-formed request");

    stream.write_all(&response).await.expect("write response");
    request
}

#[tokio::test]
async fn clean_response_round_trips_over_tcp() {
    let (listener, endpoint) = bound_listener().await;
    let response = wire::encode_response(STATUS_OK, &ValidationVerdict::clean());
    let server = tokio::spawn(serve_once(listener, response));

    let verdict = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect("validation succeeds");
    assert_eq!(verdict.flagged_attributes().count(), 0);

    let seen = server.await.expect("server task");
    assert_eq!(seen.reference(RemoteAttribute::Passport), "123/passport");
    assert_eq!(seen.reference(RemoteAttribute::Saving), "123/saving");
}

#[tokio::test]
async fn flagged_attributes_survive_the_transport() {
    let (listener, endpoint) = bound_listener().await;
    let mut verdict = ValidationVerdict::clean();
    verdict.set(RemoteAttribute::Job, true);
    verdict.set(RemoteAttribute::BridePrice, true);
    let response = wire::encode_response(STATUS_OK, &verdict);
    let server = tokio::spawn(serve_once(listener, response));

    let received = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect("validation succeeds");
    server.await.expect("server task");

    assert_eq!(
        received.flagged_attributes().collect::<Vec<_>>(),
        [RemoteAttribute::Job, RemoteAttribute::BridePrice]
    );
}

#[tokio::test]
async fn non_ok_status_is_reported_as_rejection() {
    let (listener, endpoint) = bound_listener().await;
    let response = wire::encode_response(0x42, &ValidationVerdict::clean());
    let server = tokio::spawn(serve_once(listener, response));

    let err = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect_err("rejection expected");
    server.await.expect("server task");

    assert!(matches!(err, RemoteValidationError::Rejected(0x42)));
}

#[tokio::test]
async fn wrong_protocol_version_is_malformed() {
    let (listener, endpoint) = bound_listener().await;
    let mut response = wire::encode_response(STATUS_OK, &ValidationVerdict::clean());
    response[4] = PROTOCOL_VERSION + 1;
    let server = tokio::spawn(serve_once(listener, response));

    let err = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect_err("malformed frame expected");
    server.await.expect("server task");

    assert!(matches!(
        err,
        RemoteValidationError::Malformed(WireError::Version { .. })
    ));
}

#[tokio::test]
async fn oversized_length_prefix_is_malformed() {
    let (listener, endpoint) = bound_listener().await;
    let response = u32::MAX.to_be_bytes().to_vec();
    let server = tokio::spawn(serve_once(listener, response));

    let err = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect_err("oversized frame expected");
    server.await.expect("server task");

    assert!(matches!(
        err,
        RemoteValidationError::Malformed(WireError::Oversized { .. })
    ));
}

#[tokio::test]
async fn silent_peer_times_out_as_unavailable() {
    let (listener, endpoint) = bound_listener().await;
    // Accept but never answer; the per-call deadline has to fire.
    let server = tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let err = EconClient::new(&EconConfig {
        endpoint,
        timeout: Duration::from_millis(100),
    })
    .validate(ValidationRequest::for_applicant("123"))
    .await
    .expect_err("timeout expected");
    server.abort();

    assert!(matches!(err, RemoteValidationError::Unavailable(_)));
}

#[tokio::test]
async fn closed_port_is_unavailable() {
    let (listener, endpoint) = bound_listener().await;
    drop(listener);

    let err = client(&endpoint)
        .validate(ValidationRequest::for_applicant("123"))
        .await
        .expect_err("refused connection expected");

    assert!(matches!(err, RemoteValidationError::Unavailable(_)));
}
