//! Tests d'intégration du fetcher d'images HTTP

use image::{DynamicImage, ImageFormat};
use skycache::{FetchError, FetchOnceCache, Fetcher, HttpImageFetcher};
use skytelemetry::{MemorySink, Telemetry, TelemetryEvent};
use std::io::Cursor;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgba8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn fetcher_with_sink() -> (HttpImageFetcher, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let fetcher = HttpImageFetcher::builder()
        .telemetry(Telemetry::new(sink.clone()))
        .build()
        .unwrap();
    (fetcher, sink)
}

#[tokio::test]
async fn test_fetch_decodes_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/800/600"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_bytes(8, 6)),
        )
        .mount(&mock_server)
        .await;

    let (fetcher, sink) = fetcher_with_sink();
    let url = format!("{}/800/600", mock_server.uri());

    let texture = fetcher.fetch(&url).await.unwrap();
    assert_eq!((texture.width(), texture.height()), (8, 6));

    assert_eq!(
        sink.events(),
        vec![TelemetryEvent::ImageDownload {
            image_url: url,
            success: true,
            error_message: None,
        }]
    );
}

#[tokio::test]
async fn test_fetch_reports_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (fetcher, sink) = fetcher_with_sink();
    let url = format!("{}/missing.png", mock_server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));

    match sink.events().as_slice() {
        [TelemetryEvent::ImageDownload {
            success: false,
            error_message: Some(msg),
            ..
        }] => assert!(msg.contains("404")),
        other => panic!("unexpected events: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_rejects_undecodable_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-an-image"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let (fetcher, sink) = fetcher_with_sink();
    let err = fetcher
        .fetch(&format!("{}/not-an-image", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_fetch_transport_error() {
    let fetcher = HttpImageFetcher::new().unwrap();
    let err = fetcher
        .fetch("http://127.0.0.1:9/unreachable.png")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_cache_downloads_once_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/billboard.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(2, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (fetcher, sink) = fetcher_with_sink();
    let cache = FetchOnceCache::new(fetcher);
    let url = format!("{}/billboard.png", mock_server.uri());

    let (a, b, c) = tokio::join!(cache.get(&url), cache.get(&url), cache.get(&url));
    assert!(a.is_ready() && b.is_ready() && c.is_ready());
    assert!(cache.get(&url).await.is_ready());

    assert_eq!(sink.len(), 1);
}
