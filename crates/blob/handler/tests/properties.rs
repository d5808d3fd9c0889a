//! Property tests over availability filtering, rate persistence and billing.

mod common;

use std::collections::BTreeSet;

use common::Fixture;
use proptest::prelude::*;
use vertex_blob_api::{BlobSender, QueryHandler};
use vertex_blob_net_query::QueryBatch;
use vertex_blob_primitives::{BlobHash, NegotiationOutcome, PaymentRate};
use vertex_blob_test_utils::{MemoryBlob, blob_content};

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(fut)
}

fn hash(i: u8) -> BlobHash {
    BlobHash::new(format!("{i:02x}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn availability_is_intersection(
        stored in proptest::collection::btree_map(0u8..32, any::<bool>(), 0..16),
        requested in proptest::collection::vec(0u8..32, 0..24),
    ) {
        let fx = Fixture::new();
        for (&i, &validated) in &stored {
            let blob = MemoryBlob::new(hash(i), blob_content(8));
            fx.manager.insert(if validated { blob } else { blob.unvalidated() });
        }
        let requested: Vec<BlobHash> = requested.into_iter().map(hash).collect();

        let response = block_on(
            fx.handler.handle_queries(QueryBatch::new().with_requested_blobs(requested.clone())),
        )
        .unwrap();
        let available = response.available_blobs.unwrap();

        let expected: BTreeSet<BlobHash> = requested
            .iter()
            .filter(|h| stored.iter().any(|(&i, &v)| v && hash(i) == **h))
            .cloned()
            .collect();
        let got: BTreeSet<BlobHash> = available.iter().cloned().collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(available.len(), available.iter().collect::<BTreeSet<_>>().len());
    }

    #[test]
    fn billing_matches_bytes_and_rate(len in 1usize..150_000, offered in 0.00001f64..10.0) {
        let fx = Fixture::new();
        fx.manager.insert_validated("X", blob_content(len));

        let sent = block_on(async {
            fx.handler
                .handle_queries(QueryBatch::new().with_payment_rate(offered).with_requested_blob("X"))
                .await
                .unwrap();
            fx.handler.send_blob_if_requested(&mut Vec::<u8>::new()).await
        });
        prop_assert!(sent);

        let rate = fx.handler.negotiated_rate().unwrap();
        prop_assert_eq!(fx.expected_payment(), rate.expected_payment(len as u64));
        prop_assert_eq!(fx.handler.bytes_uploaded(), 0);
        prop_assert_eq!(fx.manager.tracker().open_now(), 0);
    }

    #[test]
    fn accepted_rate_persists_until_overwritten(
        offers in proptest::collection::vec((0.01f64..5.0, any::<bool>()), 1..8),
    ) {
        let fx = Fixture::new();
        fx.manager.insert_validated("X", blob_content(16));
        let mut in_effect: Option<PaymentRate> = None;

        for (offered, accept) in offers {
            if !accept {
                fx.strategy.push_answer(NegotiationOutcome::reject(PaymentRate::new(99.0)));
            }
            let response = block_on(async {
                let response = fx
                    .handler
                    .handle_queries(QueryBatch::new().with_payment_rate(offered).with_requested_blob("X"))
                    .await
                    .unwrap();
                fx.handler.send_blob_if_requested(&mut Vec::<u8>::new()).await;
                response
            });
            if accept {
                in_effect = response.negotiation.map(|n| n.rate);
            }

            prop_assert_eq!(fx.handler.negotiated_rate(), in_effect);
            prop_assert_eq!(response.has_incoming_blob(), in_effect.is_some());
            if in_effect.is_some() {
                prop_assert_eq!(fx.manager.history().last().map(|r| r.rate), in_effect);
            }
        }
    }
}
