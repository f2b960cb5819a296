//! JSON-RPC gateway tests against an in-process HTTP server.
//!
//! The server answers each accepted connection with the next canned
//! response, closes it, and forwards the parsed request body to the test.

use std::time::Duration;

use chain_gateway::{ChainGateway, Connection, GatewayError, JsonRpcGateway};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

struct Canned {
    status: u16,
    body: String,
}

fn ok(result: Value) -> Canned {
    Canned {
        status: 200,
        body: json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string(),
    }
}

fn rpc_error(code: i64, message: &str) -> Canned {
    Canned {
        status: 200,
        body: json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": message}})
            .to_string(),
    }
}

fn raw(status: u16, body: &str) -> Canned {
    Canned {
        status,
        body: body.to_string(),
    }
}

async fn read_request_body(stream: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending body");
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap()
}

/// Starts a server that serves `responses` in order; returns its URL and a
/// receiver of the request bodies it saw.
async fn serve(responses: Vec<Canned>) -> (String, mpsc::UnboundedReceiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for canned in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request_body(&mut stream).await;
            let _ = tx.send(request);

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.status,
                canned.body.len(),
                canned.body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
    });

    (url, rx)
}

fn gateway() -> JsonRpcGateway {
    JsonRpcGateway::new(Duration::from_secs(5)).unwrap()
}

const ADDRESS: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

#[tokio::test]
async fn connect_records_chain_id() {
    let (url, mut requests) = serve(vec![ok(json!("0xaa36a7"))]).await;

    let conn = gateway().connect(&url).await.unwrap();
    assert_eq!(conn.chain_id(), 11_155_111);
    assert_eq!(conn.endpoint(), url);

    let request = requests.recv().await.unwrap();
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "eth_chainId");
    assert_eq!(request["params"], json!([]));
}

#[tokio::test]
async fn balance_queries_latest_block() {
    let (url, mut requests) = serve(vec![ok(json!("0xde0b6b3a7640000"))]).await;
    let conn = Connection::new(url, 1);

    let balance = gateway().get_balance(&conn, ADDRESS).await.unwrap();
    assert_eq!(balance, 1_000_000_000_000_000_000);

    let request = requests.recv().await.unwrap();
    assert_eq!(request["method"], "eth_getBalance");
    assert_eq!(request["params"], json!([ADDRESS, "latest"]));
}

#[tokio::test]
async fn nonce_counts_pending_transactions() {
    let (url, mut requests) = serve(vec![ok(json!("0x9"))]).await;
    let conn = Connection::new(url, 1);

    assert_eq!(gateway().get_nonce(&conn, ADDRESS).await.unwrap(), 9);

    let request = requests.recv().await.unwrap();
    assert_eq!(request["method"], "eth_getTransactionCount");
    assert_eq!(request["params"], json!([ADDRESS, "pending"]));
}

#[tokio::test]
async fn gas_price_is_parsed() {
    let (url, mut requests) = serve(vec![ok(json!("0x4a817c800"))]).await;
    let conn = Connection::new(url, 1);

    assert_eq!(gateway().get_gas_price(&conn).await.unwrap(), 20_000_000_000);
    assert_eq!(requests.recv().await.unwrap()["method"], "eth_gasPrice");
}

#[tokio::test]
async fn broadcast_sends_hex_and_returns_hash() {
    let tx_hash = format!("0x{}", "33".repeat(32));
    let (url, mut requests) = serve(vec![ok(json!(tx_hash))]).await;
    let conn = Connection::new(url, 1);

    let returned = gateway().broadcast(&conn, &[0xf8, 0x6c, 0x09]).await.unwrap();
    assert_eq!(returned, tx_hash);

    let request = requests.recv().await.unwrap();
    assert_eq!(request["method"], "eth_sendRawTransaction");
    assert_eq!(request["params"], json!(["0xf86c09"]));
}

#[tokio::test]
async fn rejected_broadcast_is_broadcast_error() {
    let (url, _requests) = serve(vec![rpc_error(-32000, "nonce too low")]).await;
    let conn = Connection::new(url, 1);

    match gateway().broadcast(&conn, &[0x01]).await {
        Err(GatewayError::Broadcast(msg)) => assert!(msg.contains("nonce too low")),
        other => panic!("expected Broadcast error, got {other:?}"),
    }
}

#[tokio::test]
async fn rpc_error_on_query_is_connection_error() {
    let (url, _requests) = serve(vec![rpc_error(-32602, "invalid argument")]).await;
    let conn = Connection::new(url, 1);

    match gateway().get_balance(&conn, ADDRESS).await {
        Err(GatewayError::Connection(msg)) => assert!(msg.contains("invalid argument")),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_quantity_is_invalid_response() {
    let (url, _requests) = serve(vec![ok(json!("0xnothex"))]).await;
    let conn = Connection::new(url, 1);

    assert!(matches!(
        gateway().get_gas_price(&conn).await,
        Err(GatewayError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let (url, _requests) = serve(vec![raw(200, "<html>hello</html>")]).await;
    let conn = Connection::new(url, 1);

    assert!(matches!(
        gateway().get_nonce(&conn, ADDRESS).await,
        Err(GatewayError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn http_error_status_is_connection_error() {
    let (url, _requests) = serve(vec![raw(502, "bad gateway")]).await;

    match gateway().connect(&url).await {
        Err(GatewayError::Connection(msg)) => assert!(msg.contains("502")),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_node_is_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    assert!(matches!(
        gateway().connect(&url).await,
        Err(GatewayError::Connection(_))
    ));
}

#[tokio::test]
async fn transport_errors_do_not_echo_api_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v2/sEcReTkEy123", listener.local_addr().unwrap());
    drop(listener);

    match gateway().connect(&url).await {
        Err(GatewayError::Connection(msg)) => assert!(!msg.contains("sEcReTkEy123"), "{msg}"),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_endpoint_is_connection_error() {
    for endpoint in ["not a url", "ftp://localhost:8545"] {
        assert!(
            matches!(
                gateway().connect(endpoint).await,
                Err(GatewayError::Connection(_))
            ),
            "{endpoint} should be rejected"
        );
    }
}

#[tokio::test]
async fn each_call_is_a_single_request() {
    // One canned reply only: a retry would hang on accept and time out.
    let (url, mut requests) = serve(vec![rpc_error(-32000, "boom")]).await;
    let conn = Connection::new(url, 1);

    assert!(gateway().get_gas_price(&conn).await.is_err());
    assert!(requests.recv().await.is_some());
    assert!(requests.recv().await.is_none());
}
