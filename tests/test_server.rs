use std::fs;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use revalidate::config::Config;
use revalidate::server::{app, listener};

async fn start(name: &str) -> (SocketAddr, std::path::PathBuf) {
    let root = std::env::temp_dir().join(format!("revalidate-e2e-{name}-{}", std::process::id()));
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.html"), "<h1>hello</h1>").unwrap();

    let cfg = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        root_dir: root.clone(),
        ..Config::default()
    };

    let socket = TcpListener::bind(&cfg.listen_addr).await.unwrap();
    let addr = socket.local_addr().unwrap();
    tokio::spawn(listener::serve(socket, app::build(&cfg)));

    (addr, root)
}

async fn roundtrip(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8(raw).unwrap()
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[tokio::test]
async fn test_revalidation_over_the_wire() {
    let (addr, root) = start("revalidate").await;

    let first = roundtrip(addr, "GET / HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n").await;
    assert!(first.starts_with("HTTP/1.1 200 OK\r\n"), "{first}");
    assert!(first.ends_with("<h1>hello</h1>"));
    assert!(header(&first, "Last-Modified").is_some());
    let etag = header(&first, "ETag").unwrap().to_string();

    let second = roundtrip(
        addr,
        &format!("GET / HTTP/1.1\r\nHost: test\r\nIf-None-Match: {etag}\r\nConnection: close\r\n\r\n"),
    )
    .await;
    assert!(second.starts_with("HTTP/1.1 304 Not Modified\r\n"), "{second}");
    assert!(second.ends_with("\r\n\r\n"));
    assert_eq!(header(&second, "ETag"), Some(etag.as_str()));

    let stale = roundtrip(
        addr,
        "GET / HTTP/1.1\r\nHost: test\r\nIf-None-Match: \"stale\"\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(stale.starts_with("HTTP/1.1 200 OK\r\n"), "{stale}");

    fs::remove_dir_all(root).unwrap();
}

#[tokio::test]
async fn test_if_modified_since_over_the_wire() {
    let (addr, root) = start("since").await;

    let first = roundtrip(addr, "GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    let modified = header(&first, "Last-Modified").unwrap().to_string();

    let second = roundtrip(
        addr,
        &format!("GET / HTTP/1.1\r\nIf-Modified-Since: {modified}\r\nConnection: close\r\n\r\n"),
    )
    .await;
    assert!(second.starts_with("HTTP/1.1 304 Not Modified\r\n"), "{second}");

    fs::remove_dir_all(root).unwrap();
}

#[tokio::test]
async fn test_missing_file_and_bad_request() {
    let (addr, root) = start("errors").await;

    let missing = roundtrip(addr, "GET /nope HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");
    assert!(header(&missing, "ETag").is_none());

    let garbage = roundtrip(addr, "this is not http\r\n\r\n").await;
    assert!(garbage.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{garbage}");

    fs::remove_dir_all(root).unwrap();
}

#[tokio::test]
async fn test_head_omits_body() {
    let (addr, root) = start("head").await;

    let response = roundtrip(addr, "HEAD / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert_eq!(header(&response, "Content-Length"), Some("14"));
    assert!(response.ends_with("\r\n\r\n"));

    fs::remove_dir_all(root).unwrap();
}
