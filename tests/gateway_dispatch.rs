//! HTTP-level tests for request signing and response pass-through.

use coinpayments::core::GatewayConfig;
use coinpayments::gateway_api::{CreateTransaction, RequestMethod};
use coinpayments::{Command, Error, GatewayClient, ParameterSet, signer};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

const PRIVATE_KEY: &str = "private key";

fn client_for(server: &MockServer, ipn_url: Option<&str>) -> GatewayClient {
    let mut config = GatewayConfig::new("public key", PRIVATE_KEY);
    config.api_url = format!("{}/api.php", server.uri());
    config.ipn_url = ipn_url.map(str::to_string);
    config.timeout_secs = Some(5);
    GatewayClient::from_config(&config).unwrap()
}

fn withdrawal_params() -> ParameterSet {
    ParameterSet::new()
        .with("amount", Decimal::from(10))
        .with("currency1", "BTC")
        .with("currency2", "USD")
        .with("address", "DepositBitcoinAddress")
        .with("note", "The note")
        .with("ipn_url", "https://example.com")
}

#[tokio::test]
async fn test_post_sends_signed_form_body() {
    let mock_server = MockServer::start().await;
    let params = withdrawal_params();
    let expected_body = signer::encode(&params);
    let expected_sig = signer::sign(PRIVATE_KEY, &params);

    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(header("Hmac", expected_sig.as_str()))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "ok",
            "result": {"id": "hex string", "status": 0, "amount": 1.00}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let response = client.dispatch(RequestMethod::Post, &params).await.unwrap();

    assert_eq!(response["error"], "ok");
    assert_eq!(response["result"]["id"], "hex string");
}

#[tokio::test]
async fn test_error_status_body_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid API key",
            "result": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let response = client.rates(ParameterSet::new()).await.unwrap();

    assert_eq!(response, json!({"error": "Invalid API key", "result": []}));
    assert_eq!(coinpayments::gateway_api::remote_error(&response), Some("Invalid API key"));
}

#[tokio::test]
async fn test_get_sends_signature_without_body() {
    let mock_server = MockServer::start().await;
    let params = ParameterSet::new().with("cmd", "rates");

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(header("Hmac", signer::sign(PRIVATE_KEY, &params).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "ok", "result": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    client.dispatch(RequestMethod::Get, &params).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].body.is_empty());
    assert!(received[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_invoke_packages_params_and_command() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string(
            "currency=BTC&key=public+key&version=1&format=json&cmd=get_deposit_address",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "ok", "result": {"address": "1abc"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Some("https://example.com/ipn"));
    let response = client
        .get_deposit_address(ParameterSet::new().with("currency", "BTC"))
        .await
        .unwrap();
    assert_eq!(response["result"]["address"], "1abc");
}

#[tokio::test]
async fn test_create_transaction_injects_configured_ipn_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string(
            "amount=10&currency1=USD&currency2=BTC&buyer_email=johndoe%40example.com\
             &ipn_url=https%3A%2F%2Fexample.com%2Fipn&key=public+key&version=1&format=json\
             &cmd=create_transaction",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "ok", "result": {"txn_id": "CP1"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Some("https://example.com/ipn"));
    let request = CreateTransaction::new(Decimal::from(10), "USD", "BTC", "johndoe@example.com")
        .ipn_url("https://attacker.example");
    let response = client.create_transaction(request).await.unwrap();
    assert_eq!(response["result"]["txn_id"], "CP1");
}

#[tokio::test]
async fn test_invoke_without_ipn_url_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string("currency=LTC&key=public+key&version=1&format=json&cmd=get_callback_address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "ok", "result": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    client
        .invoke(Command::GetCallbackAddress, ParameterSet::new().with("currency", "LTC"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_repeated_invocations_send_identical_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "ok", "result": {}})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    client.balances(ParameterSet::new().with("all", 1)).await.unwrap();
    client.balances(ParameterSet::new().with("all", 1)).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].body, received[1].body);
    assert_eq!(received[0].headers.get("hmac"), received[1].headers.get("hmac"));
    assert_eq!(
        String::from_utf8_lossy(&received[0].body),
        "all=1&key=public+key&version=1&format=json&cmd=balances"
    );
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = client.get_basic_info(ParameterSet::new()).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let mut config = GatewayConfig::new("public key", PRIVATE_KEY);
    config.api_url = "http://127.0.0.1:1/api.php".to_string();
    config.timeout_secs = Some(5);
    let client = GatewayClient::from_config(&config).unwrap();

    let err = client.rates(ParameterSet::new()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
