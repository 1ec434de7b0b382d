use std::io::Cursor;

use micro_http_serde::protocol::{ReqBody, WireRequest};
use micro_http_serde::{Deserializer, Serializer};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let serde = micro_http_serde::new();

    let mut request = WireRequest::builder()
        .method("POST")
        .uri("http://localhost:8080/serialize?source=demo")
        .header("Content-Type", "text/plain")
        .body(ReqBody::from_reader(Cursor::new(b"hello from the past".to_vec())))
        .build()
        .expect("request should be valid");

    let dumped = match serde.serialize(Some(&mut request)) {
        Ok(dumped) => dumped,
        Err(e) => {
            error!(cause = %e, "failed to dump request");
            return;
        }
    };
    info!(size = dumped.len(), dump = %String::from_utf8_lossy(&dumped), "dumped request");

    let mut replayed = match serde.deserialize(&dumped) {
        Ok(replayed) => replayed,
        Err(e) => {
            error!(cause = %e, "failed to load request");
            return;
        }
    };

    match replayed.absolute_uri("http") {
        Ok(uri) => info!(%uri, method = %replayed.method(), "would replay request"),
        Err(e) => error!(cause = %e, "target can't be resolved"),
    }

    match serde.serialize(Some(&mut replayed)) {
        Ok(again) => info!(identical = (again == dumped), "re-dumped replayed request"),
        Err(e) => error!(cause = %e, "failed to dump replayed request"),
    }
}
