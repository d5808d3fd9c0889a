//! End-to-end query and upload scenarios.

mod common;

use std::time::Duration;

use common::{Fixture, init_tracing};
use vertex_blob_api::{BlobSender, QueryHandler};
use vertex_blob_net_query::{IncomingBlob, QueryBatch, ResponseError};
use vertex_blob_primitives::{BYTES_PER_MB, BlobHash, OfferStatus, PaymentRate};
use vertex_blob_test_utils::{MemoryBlob, ReadBehaviour, blob_content};

#[tokio::test]
async fn availability_lists_only_validated_blobs() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert_validated("X", blob_content(64));
    fx.manager.insert(MemoryBlob::new("Y", blob_content(64)).unvalidated());

    let response = fx
        .handler
        .handle_queries(QueryBatch::new().with_requested_blobs(["X", "Y"]))
        .await
        .unwrap();

    assert_eq!(response.available_blobs, Some(vec![BlobHash::from("X")]));
    assert!(response.negotiation.is_none());
    assert!(response.incoming_blob.is_none());
    assert!(response.error.is_none());
}

#[tokio::test]
async fn accepted_offer_sets_rate() {
    init_tracing();
    let fx = Fixture::new();

    let response = fx
        .handler
        .handle_queries(QueryBatch::new().with_payment_rate(0.5))
        .await
        .unwrap();

    let negotiation = response.negotiation.unwrap();
    assert_eq!(negotiation.status, OfferStatus::RateAccepted);
    assert_eq!(negotiation.rate, PaymentRate::new(0.5));
    assert_eq!(fx.handler.negotiated_rate(), Some(PaymentRate::new(0.5)));
}

#[tokio::test]
async fn download_after_negotiation_streams_and_bills() {
    init_tracing();
    let fx = Fixture::new();
    let content = blob_content(BYTES_PER_MB as usize);
    fx.manager.insert_validated("X", content.clone());

    fx.handler
        .handle_queries(QueryBatch::new().with_payment_rate(0.5))
        .await
        .unwrap();
    let response = fx
        .handler
        .handle_queries(QueryBatch::new().with_requested_blob("X"))
        .await
        .unwrap();

    assert_eq!(
        response.incoming_blob,
        Some(IncomingBlob {
            blob_hash: "X".into(),
            length: 1_048_576
        })
    );
    assert!(response.error.is_none());

    let history = fx.manager.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].hash, BlobHash::from("X"));
    assert_eq!(history[0].host, fx.handler.peer().host());
    assert_eq!(history[0].rate, PaymentRate::new(0.5));

    let mut sink = Vec::<u8>::new();
    assert!(fx.handler.send_blob_if_requested(&mut sink).await);
    assert_eq!(sink, content.to_vec());

    assert_eq!(fx.expected_payment(), 0.5);
    let stats = fx.handler.peer().stats();
    assert_eq!(stats.blob_bytes_uploaded(), 1_048_576);
    assert_eq!(stats.blobs_uploaded(), 1);
    assert!(!fx.handler.has_session());
    assert_eq!(fx.handler.bytes_uploaded(), 0);

    let tracker = fx.manager.tracker();
    assert_eq!(tracker.opened(), 1);
    assert_eq!(tracker.closed(), 1);
}

#[tokio::test]
async fn download_without_rate_is_refused() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert_validated("X", blob_content(64));

    let response = fx
        .handler
        .handle_queries(QueryBatch::new().with_requested_blob("X"))
        .await
        .unwrap();

    assert_eq!(response.error, Some(ResponseError::RateUnset));
    assert!(response.incoming_blob.is_none());
    assert!(!fx.handler.has_session());
    assert!(fx.manager.history().is_empty());
    assert_eq!(fx.manager.lookups(), 0);
    assert_eq!(fx.manager.tracker().opened(), 0);
}

#[tokio::test]
async fn unvalidated_blob_is_unavailable() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert(MemoryBlob::new("X", blob_content(64)).unvalidated());

    let response = fx
        .handler
        .handle_queries(QueryBatch::new().with_payment_rate(0.5).with_requested_blob("X"))
        .await
        .unwrap();

    assert_eq!(response.error, Some(ResponseError::BlobUnavailable));
    assert!(response.negotiation.unwrap().is_accepted());
    assert!(!fx.handler.has_session());
    assert!(fx.manager.history().is_empty());
}

#[tokio::test]
async fn cancel_mid_transfer_bills_bytes_sent() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert(
        MemoryBlob::new("X", blob_content(BYTES_PER_MB as usize))
            .with_read_behaviour(ReadBehaviour::StallAfter(200_000)),
    );

    fx.handler
        .handle_queries(QueryBatch::new().with_payment_rate(0.5).with_requested_blob("X"))
        .await
        .unwrap();

    let handler = fx.handler.clone();
    let upload = tokio::spawn(async move {
        let mut sink = Vec::<u8>::new();
        handler.send_blob_if_requested(&mut sink).await
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while fx.handler.bytes_uploaded() < 200_000 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    assert_eq!(fx.handler.cancel_send("peer disconnected"), "peer disconnected");
    assert!(!upload.await.unwrap());

    assert_eq!(fx.expected_payment(), 200_000.0 * 0.5 / 1_048_576.0);
    assert!(!fx.handler.has_session());
    assert_eq!(fx.handler.bytes_uploaded(), 0);
    assert_eq!(fx.handler.peer().stats().blob_bytes_uploaded(), 200_000);

    let tracker = fx.manager.tracker();
    assert_eq!(tracker.opened(), 1);
    assert_eq!(tracker.closed(), 1);
}

#[tokio::test]
async fn stages_run_in_order_within_one_batch() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert_validated("X", blob_content(64));

    let response = fx
        .handler
        .handle_queries(
            QueryBatch::new()
                .with_requested_blobs(["X", "Z"])
                .with_payment_rate(0.25)
                .with_requested_blob("X"),
        )
        .await
        .unwrap();

    // The strategy priced against the availability answer of the same batch.
    let calls = fx.strategy.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].available_blobs, vec![BlobHash::from("X")]);

    // The download used the rate accepted in the same batch.
    assert_eq!(response.available_blobs, Some(vec![BlobHash::from("X")]));
    assert!(response.negotiation.unwrap().is_accepted());
    assert_eq!(response.incoming_blob.map(|b| b.length), Some(64));
    assert_eq!(fx.manager.history()[0].rate, PaymentRate::new(0.25));
}

#[tokio::test]
async fn response_wire_format() {
    init_tracing();
    let fx = Fixture::new();
    fx.manager.insert_validated("X", blob_content(10));

    let query = vertex_blob_net_query::decode_query(
        br#"{"requested_blobs":["X"],"blob_data_payment_rate":0.5,"requested_blob":"X","unknown":1}"#,
    )
    .unwrap();
    let response = fx.handler.handle_queries(query).await.unwrap();
    let encoded = vertex_blob_net_query::encode_response(&response).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "available_blobs": ["X"],
            "blob_data_payment_rate": "RATE_ACCEPTED",
            "payment_rate": 0.5,
            "incoming_blob": {"blob_hash": "X", "length": 10}
        })
    );
}
