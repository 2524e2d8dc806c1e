//! End-to-end submission tests against a mock gateway.

use linkpoint::{GatewayClient, TransactionKind};
use mockito::{Matcher, ServerGuard};

const APPROVED_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:fdggwsapi="http://secure.linkpt.net/fdggwsapi/schemas_us/fdggwsapi">
<SOAP-ENV:Body>
<fdggwsapi:FDGGWSApiOrderResponse>
<fdggwsapi:TransactionResult>APPROVED</fdggwsapi:TransactionResult>
<fdggwsapi:ApprovalCode>ACC000123</fdggwsapi:ApprovalCode>
<fdggwsapi:OrderId>A-1</fdggwsapi:OrderId>
<fdggwsapi:TDate>1767100000</fdggwsapi:TDate>
<fdggwsapi:ErrorMessage></fdggwsapi:ErrorMessage>
</fdggwsapi:FDGGWSApiOrderResponse>
</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

const DECLINED_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:fdggwsapi="http://secure.linkpt.net/fdggwsapi/schemas_us/fdggwsapi">
<SOAP-ENV:Body>
<fdggwsapi:FDGGWSApiOrderResponse>
<fdggwsapi:TransactionResult>DECLINED</fdggwsapi:TransactionResult>
<fdggwsapi:ErrorMessage>insufficient funds</fdggwsapi:ErrorMessage>
</fdggwsapi:FDGGWSApiOrderResponse>
</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

const FAULT_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
<SOAP-ENV:Body>
<SOAP-ENV:Fault>
<faultcode>SOAP-ENV:Client</faultcode>
<faultstring>bad auth</faultstring>
</SOAP-ENV:Fault>
</SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

/// Capture crate logs during tests; `RUST_LOG=linkpoint=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client_for(server: &ServerGuard) -> GatewayClient {
    init_tracing();
    GatewayClient::builder()
        .username("WSTEST._.1")
        .password("apipassword")
        .base_url_override(server.url())
        .build()
        .expect("client should build")
}

#[tokio::test]
async fn approved_sale_is_success_and_clears_the_bag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "text/xml")
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .match_body(Matcher::Regex(
            "<v1:CardNumber>4111111111111111</v1:CardNumber>".into(),
        ))
        .with_status(200)
        .with_body(APPROVED_BODY)
        .create_async()
        .await;

    let mut client = client_for(&server);
    client
        .order()
        .set_transaction_kind(TransactionKind::Sale)
        .set_charge_total(10.0)
        .set_card_number("4111111111111111");
    client.order().set_card_expiration_month("07").unwrap();
    client.order().set_card_expiration_year("29").unwrap();

    let response = client.submit().await;
    mock.assert_async().await;

    assert!(response.is_success());
    assert_eq!(response.error_message(), None);
    let order = response.order().expect("order payload should be parsed");
    assert_eq!(order.approval_code.as_deref(), Some("ACC000123"));
    assert_eq!(order.tdate.as_deref(), Some("1767100000"));
    assert!(client.order().is_empty());
}

#[tokio::test]
async fn declined_sale_reports_the_business_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(DECLINED_BODY)
        .create_async()
        .await;

    let mut client = client_for(&server);
    client.order().set_card_number("4000000000000002");

    let response = client.submit().await;
    assert!(response.is_error());
    assert_eq!(
        response.error_message().as_deref(),
        Some("DECLINED: insufficient funds")
    );
    // The bag is cleared on failure too.
    assert!(client.order().is_empty());
}

#[tokio::test]
async fn soap_fault_reports_the_faultstring() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(FAULT_BODY)
        .create_async()
        .await;

    let mut client = client_for(&server);
    let response = client.submit().await;
    assert!(response.is_error());
    assert_eq!(response.error_message().as_deref(), Some("bad auth"));
}

#[tokio::test]
async fn server_error_is_classified_without_a_body_parse() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let mut client = client_for(&server);
    let response = client.submit().await;
    assert!(response.is_error());
    assert_eq!(response.http_status(), 500);
    assert_eq!(
        response.error_message().as_deref(),
        Some("no valid HTTP status (500)")
    );
}

#[tokio::test]
async fn empty_body_is_classified_as_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let mut client = client_for(&server);
    let response = client.submit().await;
    assert!(response.is_error());
    assert_eq!(
        response.error_message().as_deref(),
        Some("empty response from gateway")
    );
}

#[tokio::test]
async fn second_submission_renders_only_forced_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("<v1:CreditCardData>".into()))
        .with_status(200)
        .with_body(APPROVED_BODY)
        .create_async()
        .await;
    let bare = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(
            "<v1:ChargeTotal>0.00</v1:ChargeTotal>".into(),
        ))
        .with_status(200)
        .with_body(APPROVED_BODY)
        .create_async()
        .await;

    let mut client = client_for(&server);
    client
        .order()
        .set_card_number("4111111111111111")
        .set_charge_total(25.0);
    let first = client.submit().await;
    assert!(first.is_success());

    // Nothing set between calls: only derived/default fields go out.
    let second = client.submit().await;
    assert!(second.is_success());
    bare.assert_async().await;
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error_not_a_panic() {
    init_tracing();
    // Nothing listens on this port; connection must be refused.
    let mut client = GatewayClient::builder()
        .username("WSTEST._.1")
        .password("apipassword")
        .base_url_override("http://127.0.0.1:1/")
        .connect_timeout_secs(2)
        .build()
        .expect("client should build");

    let response = client.submit().await;
    assert!(response.is_error());
    assert!(response.transport_error_code() > 0);
    assert!(response.error_message().is_some());
}
