use revalidate::http::headers::Headers;
use revalidate::http::request::{Method, Request, RequestBuilder};

fn request_with(version: &str, headers: &[(&str, &str)]) -> Request {
    Request {
        method: Method::GET,
        path: "/".to_string(),
        version: version.to_string(),
        headers: headers.iter().copied().collect(),
        body: vec![],
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request_with("HTTP/1.1", &[("Host", "example.com"), ("If-None-Match", "\"x\"")]);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("if-none-match"), Some("\"x\""));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    assert_eq!(request_with("HTTP/1.1", &[("Content-Length", "42")]).content_length(), 42);
    assert_eq!(request_with("HTTP/1.1", &[("Content-Length", "nope")]).content_length(), 0);
    assert_eq!(request_with("HTTP/1.1", &[]).content_length(), 0);
}

#[test]
fn test_request_keep_alive() {
    assert!(request_with("HTTP/1.1", &[]).keep_alive());
    assert!(request_with("HTTP/1.1", &[("Connection", "Keep-Alive")]).keep_alive());
    assert!(!request_with("HTTP/1.1", &[("Connection", "close")]).keep_alive());
    assert!(!request_with("HTTP/1.0", &[]).keep_alive());
    assert!(request_with("HTTP/1.0", &[("Connection", "keep-alive")]).keep_alive());
}

#[test]
fn test_request_method_from_token() {
    assert_eq!(Method::from_token("GET"), Some(Method::GET));
    assert_eq!(Method::from_token("HEAD"), Some(Method::HEAD));
    assert_eq!(Method::from_token("INVALID"), None);
    assert_eq!(Method::from_token("get"), None);
    assert_eq!(Method::PATCH.as_str(), "PATCH");
}

#[test]
fn test_request_builder_defaults() {
    let req = RequestBuilder::new().build();

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path, "/");
    assert_eq!(req.version, "HTTP/1.1");
    assert!(req.headers.is_empty());
}

#[test]
fn test_request_builder_replaces_repeated_header() {
    let req = RequestBuilder::new()
        .method(Method::HEAD)
        .path("/index.html")
        .header("If-None-Match", "\"a\"")
        .header("if-none-match", "\"b\"")
        .build();

    assert!(req.is_head());
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.header("If-None-Match"), Some("\"b\""));
}

#[test]
fn test_headers_set_append_remove() {
    let mut headers = Headers::new();
    headers.append("Vary", "Accept");
    headers.append("vary", "Accept-Encoding");
    headers.append("ETag", "\"1\"");
    assert_eq!(headers.len(), 3);

    headers.set("VARY", "Origin");
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("Vary"), Some("Origin"));

    assert_eq!(headers.remove("etag"), Some("\"1\"".to_string()));
    assert_eq!(headers.remove("etag"), None);
    assert_eq!(headers.len(), 1);
}

#[test]
fn test_headers_empty_value_is_not_a_validator() {
    let headers: Headers = [("If-None-Match", "")].into_iter().collect();

    assert_eq!(headers.get("If-None-Match"), Some(""));
    assert_eq!(headers.get_non_empty("If-None-Match"), None);
}
