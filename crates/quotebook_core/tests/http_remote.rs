use quotebook_core::db::open_db_in_memory;
use quotebook_core::{
    HttpQuoteSource, NotificationKind, Notifier, Quote, QuoteRepository, QuoteService,
    RemoteQuoteSource, SlotStore, SqliteSlotStore, SyncEngine, SyncError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned HTTP response and returns the raw request it received.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/posts", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (endpoint, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        let text = String::from_utf8_lossy(&buffer).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).to_string()
}

fn source(endpoint: &str) -> HttpQuoteSource {
    HttpQuoteSource::new(endpoint, Duration::from_secs(5), 10).unwrap()
}

fn service_with(quotes_json: &str) -> QuoteService<SqliteSlotStore, SqliteSlotStore> {
    let durable = SqliteSlotStore::new(open_db_in_memory().unwrap());
    durable.set_slot("quotes", quotes_json).unwrap();
    let repo = QuoteRepository::load(durable).unwrap();
    QuoteService::new(repo, SqliteSlotStore::new(open_db_in_memory().unwrap())).unwrap()
}

#[tokio::test]
async fn fetch_maps_post_titles_to_server_quotes() {
    let (endpoint, server) =
        serve_once("200 OK", r#"[{"id":1,"title":"New thought"},{"id":2,"body":"x"}]"#).await;

    let quotes = source(&endpoint).fetch_quotes().await.unwrap();
    assert_eq!(quotes, vec![Quote::unchecked("New thought", "Server")]);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /posts HTTP/1.1"));
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let (endpoint, _server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;

    let result = source(&endpoint).fetch_quotes().await;
    assert!(matches!(result, Err(SyncError::Api { status: 503, .. })));
}

#[tokio::test]
async fn non_list_body_fails_sync_and_keeps_repository() {
    let (endpoint, _server) = serve_once("200 OK", r#"{"error":"rate limited"}"#).await;
    let (notifier, mut inbox) = Notifier::channel();
    let engine = SyncEngine::new(Arc::new(source(&endpoint)), notifier, Duration::from_secs(5));
    let mut service = service_with(r#"[{"text":"Life is short","category":"Life"}]"#);

    let result = engine.sync_once(&mut service).await;
    assert!(matches!(result, Err(SyncError::Json(_))));
    assert_eq!(
        service.repo().all(),
        &[Quote::unchecked("Life is short", "Life")]
    );

    let notifications = inbox.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert!(notifications[0].message.starts_with("Failed to sync with the server"));
}

#[tokio::test]
async fn push_posts_quote_json_and_returns_echo() {
    let (endpoint, server) = serve_once(
        "201 Created",
        r#"{"id":101,"text":"Ship it","category":"Work"}"#,
    )
    .await;

    let echo = source(&endpoint)
        .push_quote(&Quote::unchecked("Ship it", "Work"))
        .await
        .unwrap();
    assert_eq!(echo["id"], 101);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /posts HTTP/1.1"));
    assert!(request.ends_with(r#"{"text":"Ship it","category":"Work"}"#));
}
