
use std::{net::TcpListener, time::Duration};

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use image_manager::{
    AppState,
    background_task::refresh_on_upload,
    entities::{
        image::ImageRecord,
        upload::{UploadSessionState, UploadUrlRequest},
    },
    errors::GatewayError,
    gateway::ApiGateway,
    http::gateway::HttpApiGateway,
    notifications::{Notification, Notifier},
    use_cases::listing::DeleteOutcome,
};
use test_images::*;
use test_utils::*;
use url::Url;

#[actix_rt::test]
async fn list_images_decodes_backend_items() {
    let backend = TestBackend::spawn().await;
    let items = image_items(&["img-1", "img-2"]);
    backend.seed(items.clone());

    let listed = backend.gateway().list_images().await.unwrap();

    assert_eq!(listed, items);
}

#[actix_rt::test]
async fn missing_items_field_means_empty_listing() {
    let backend = TestBackend::spawn().await;
    *backend.state.omit_items.lock() = true;

    let listed = backend.gateway().list_images().await.unwrap();

    assert!(listed.is_empty());
}

#[actix_rt::test]
async fn loosely_typed_items_do_not_fail_the_listing() {
    let backend = TestBackend::spawn().await;
    *backend.state.raw_listing.lock() = Some(serde_json::json!({
        "items": [
            {
                "imageId": "img-1",
                "createdAt": "2025-03-14T09:26:53.123456",
                "status": "ready",
                "originalKey": "abc/photo.png",
                "originalWidth": 1920.0,
                "originalSizeBytes": 12.0,
                "thumbnailSizeBytes": "unknown",
                "thumbnailQuality": null
            },
            {
                "imageId": "img-2",
                "createdAt": "yesterday",
                "originalSizeBytes": -3.7
            }
        ]
    }));

    let listed = backend.gateway().list_images().await.unwrap();
    let records: Vec<ImageRecord> = listed.into_iter().map(ImageRecord::from).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].display_name, "photo.png");
    assert_eq!(records[0].original.width, Some(1920));
    assert_eq!(records[0].original.size_bytes, 12);
    assert_eq!(records[0].thumbnail.size_bytes, 0);
    assert_eq!(
        records[0].created_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap() + chrono::Duration::microseconds(123_456))
    );
    assert_eq!(records[1].created_at, None);
    assert_eq!(records[1].original.size_bytes, 0);
}

#[actix_rt::test]
async fn error_status_maps_to_server_error() {
    let backend = TestBackend::spawn().await;
    *backend.state.fail_listing.lock() = true;

    let result = backend.gateway().list_images().await;

    match result {
        Err(GatewayError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "listing unavailable");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[actix_rt::test]
async fn unreachable_backend_is_a_transient_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap();
    let gateway = HttpApiGateway::new(&base_url, Duration::from_secs(2)).unwrap();

    let error = gateway.list_images().await.unwrap_err();

    assert!(error.is_transient(), "unexpected error: {}", error);
}

#[actix_rt::test]
async fn upload_location_then_transfer_with_declared_type() {
    let backend = TestBackend::spawn().await;
    let gateway = backend.gateway();
    let request = UploadUrlRequest {
        file_name: "photo.png".into(),
        content_type: "image/png".into(),
    };

    let location = gateway.request_upload_location(&request).await.unwrap();
    gateway
        .transfer_bytes(&location.write_location, Bytes::from(vec![7u8; 4096]), &request.content_type)
        .await
        .unwrap();

    assert_eq!(location.storage_key, "up1/photo.png");
    assert_eq!(location.image_id.as_deref(), Some("img-up1"));
    assert_eq!(
        backend.state.location_requests.lock().clone(),
        vec![("photo.png".to_string(), "image/png".to_string())]
    );
    assert_eq!(
        backend.state.uploads.lock().clone(),
        vec![ReceivedUpload {
            key: "up1/photo.png".into(),
            content_type: Some("image/png".into()),
            bytes: 4096,
        }]
    );
}

#[actix_rt::test]
async fn invalid_location_request_never_leaves_the_client() {
    let backend = TestBackend::spawn().await;
    let request = UploadUrlRequest {
        file_name: String::new(),
        content_type: "image/png".into(),
    };

    let result = backend.gateway().request_upload_location(&request).await;

    assert!(matches!(result, Err(GatewayError::InvalidRequest(ref msg)) if msg.contains("file_name")));
    assert!(backend.state.location_requests.lock().is_empty());
}

#[actix_rt::test]
async fn delete_percent_encodes_the_id() {
    let backend = TestBackend::spawn().await;
    backend.seed(vec![image_item("img 7", "p/seven.png")]);

    backend.gateway().delete_image("img 7").await.unwrap();

    assert_eq!(backend.state.deleted.lock().clone(), vec!["img 7".to_string()]);
}

#[actix_rt::test]
async fn delete_of_unknown_image_is_a_server_rejection() {
    let backend = TestBackend::spawn().await;

    let result = backend.gateway().delete_image("missing").await;

    assert!(matches!(result, Err(GatewayError::Server { status: 404, .. })));
}

#[actix_rt::test]
async fn upload_refreshes_listing_and_delete_removes_it() {
    let backend = TestBackend::spawn().await;
    let (notifier, mut notifications) = Notifier::channel();
    let AppState { uploader, listing } = AppState::new(backend.gateway(), notifier);

    listing.refresh().await.unwrap();
    assert!(listing.is_empty());

    let refresher = tokio::spawn(refresh_on_upload(listing.clone(), uploader.subscribe()));

    uploader.select(candidate("sunset.png", "image/png", 2 * MIB));
    uploader.submit().await.unwrap();
    assert_eq!(uploader.state(), UploadSessionState::NoFile);

    for _ in 0..200 {
        if listing.len() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let records = listing.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].image_id, "img-up1");
    assert_eq!(records[0].display_name, "sunset.png");
    assert_eq!(records[0].original.size_bytes, 2 * MIB as u64);

    let outcome = listing.delete("img-up1").await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted { name: "sunset.png".into() });
    assert!(listing.is_empty());

    drop(uploader);
    refresher.await.unwrap();

    let seen: Vec<Notification> = std::iter::from_fn(|| notifications.try_recv().ok()).collect();
    assert_eq!(
        seen,
        vec![
            Notification::UploadSucceeded,
            Notification::DeleteSucceeded { name: "sunset.png".into() },
        ]
    );
}

#[actix_rt::test]
async fn backend_delete_failure_keeps_record() {
    let backend = TestBackend::spawn().await;
    backend.seed(image_items(&["img-1", "img-2"]));
    backend.state.failing_deletes.lock().insert("img-1".into());
    let (notifier, mut notifications) = Notifier::channel();
    let AppState { listing, .. } = AppState::new(backend.gateway(), notifier);

    listing.refresh().await.unwrap();
    let result = listing.delete("img-1").await;

    assert!(matches!(result, Err(GatewayError::Server { status: 500, .. })));
    assert_eq!(listing.len(), 2);
    assert!(!listing.is_deleting("img-1"));
    assert_eq!(notifications.try_recv().unwrap(), Notification::DeleteFailed);
}
