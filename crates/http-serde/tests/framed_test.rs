use futures::{SinkExt, StreamExt};
use http::Method;
use micro_http_serde::codec::{RequestDecoder, RequestEncoder};
use micro_http_serde::protocol::{ParseError, WireRequest};
use tokio_util::codec::{FramedRead, FramedWrite};

fn requests() -> Vec<WireRequest> {
    vec![
        WireRequest::get("http://test.test/first?page=1").unwrap(),
        WireRequest::post("http://test.test/second", "payload").unwrap(),
        WireRequest::builder().method(Method::DELETE).uri("http://test.test/third").header("X-Reason", "cleanup").build().unwrap(),
    ]
}

#[tokio::test]
async fn write_then_replay_many_dumps() {
    let mut log = Vec::new();
    {
        let mut writer = FramedWrite::new(&mut log, RequestEncoder::new());
        for mut request in requests() {
            writer.send(&mut request).await.unwrap();
        }
    }

    let mut reader = FramedRead::new(&log[..], RequestDecoder::new());

    let first = reader.next().await.unwrap().unwrap();
    assert_eq!(first.method(), &Method::GET);
    assert_eq!(first.query_param("page").as_deref(), Some("1"));

    let second = reader.next().await.unwrap().unwrap();
    assert_eq!(second.path(), "/second");
    assert_eq!(&second.body().as_bytes().unwrap()[..], b"payload");

    let third = reader.next().await.unwrap().unwrap();
    assert_eq!(third.method(), &Method::DELETE);
    assert_eq!(third.headers().get("x-reason"), Some("cleanup"));

    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn truncated_log_reports_error() {
    let dump = b"POST /x HTTP/1.1\r\nHost: test.test\r\nContent-Length: 10\r\n\r\nshort";
    let mut reader = FramedRead::new(&dump[..], RequestDecoder::new());

    let err: ParseError = reader.next().await.unwrap().unwrap_err();
    assert!(err.is_truncated());
}

#[tokio::test]
async fn garbage_log_reports_malformed() {
    let mut reader = FramedRead::new(&b"INVALID"[..], RequestDecoder::new());

    let err = reader.next().await.unwrap().unwrap_err();
    assert!(err.is_malformed());
}
