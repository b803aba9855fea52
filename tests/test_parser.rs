use revalidate::http::parser::{parse_http_request, ParseError, MAX_BODY_BYTES};
use revalidate::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host"), Some("example.com"));
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_conditional_headers() {
    let req = b"GET /app.js HTTP/1.1\r\n\
                If-None-Match: W/\"5-abc\"\r\n\
                If-Modified-Since: Sun, 06 Nov 1994 08:49:37 GMT\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.header("If-None-Match"), Some("W/\"5-abc\""));
    assert_eq!(
        parsed.header("if-modified-since"),
        Some("Sun, 06 Nov 1994 08:49:37 GMT")
    );
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_pipelined_requests_consume_one_at_a_time() {
    let req = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
    let (first, consumed) = parse_http_request(req).unwrap();
    let (second, _) = parse_http_request(&req[consumed..]).unwrap();

    assert_eq!(first.path, "/a");
    assert_eq!(second.path, "/b");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";

    assert!(matches!(parse_http_request(req), Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";

    assert!(matches!(parse_http_request(req), Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_invalid_http_method() {
    let req = b"INVALID / HTTP/1.1\r\n\r\n";

    assert!(matches!(parse_http_request(req), Err(ParseError::InvalidMethod)));
}

#[test]
fn test_parse_malformed_header() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n";

    assert!(matches!(parse_http_request(req), Err(ParseError::InvalidHeader)));
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";

    assert!(matches!(
        parse_http_request(req),
        Err(ParseError::InvalidContentLength)
    ));
}

#[test]
fn test_parse_header_lookup_ignores_case() {
    let req = b"GET / HTTP/1.1\r\nContent-Type: application/json\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert!(parsed.headers.contains("content-type"));
    assert_eq!(parsed.headers.iter().next(), Some(("Content-Type", "application/json")));
}

#[test]
fn test_parse_rejects_oversized_content_length() {
    // Rejected from the head alone, before any body bytes arrive.
    let req = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
    assert!(matches!(parse_http_request(req.as_bytes()), Err(ParseError::BodyTooLarge)));

    let huge = b"POST / HTTP/1.1\r\nContent-Length: 10000000000\r\n\r\n";
    assert!(matches!(parse_http_request(huge), Err(ParseError::BodyTooLarge)));
}

#[test]
fn test_parse_accepts_body_at_limit() {
    let mut req = format!("POST / HTTP/1.1\r\nContent-Length: {MAX_BODY_BYTES}\r\n\r\n").into_bytes();
    let head_len = req.len();
    assert_eq!(parse_http_request(&req).unwrap_err(), ParseError::Incomplete);

    req.resize(head_len + MAX_BODY_BYTES, b'x');
    let (parsed, consumed) = parse_http_request(&req).unwrap();
    assert_eq!(parsed.body.len(), MAX_BODY_BYTES);
    assert_eq!(consumed, req.len());
}
