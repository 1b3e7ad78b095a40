use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_block::{Block, BlockBuilder, Page};
use strata_test_utils::init_tracing_for_tests;
use strata_types::LogicalType;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn sealed_structures_are_shareable() {
    assert_send_sync::<Block>();
    assert_send_sync::<Page>();
}

#[test]
fn random_null_patterns_survive_sealing_and_slicing() {
    init_tracing_for_tests();
    let mut rng = StdRng::seed_from_u64(42);
    let expected: Vec<Option<u128>> = (0..5_000)
        .map(|_| rng.random_bool(0.8).then(|| rng.random()))
        .collect();

    let mut builder = BlockBuilder::new(LogicalType::Uuid, 16);
    for value in &expected {
        match value {
            Some(v) => builder.append_uuid(*v).unwrap(),
            None => builder.append_null(),
        }
    }
    let block = builder.finish();

    assert_eq!(block.position_count(), expected.len());
    assert_eq!(
        block.null_count(),
        expected.iter().filter(|v| v.is_none()).count()
    );
    for (pos, value) in expected.iter().enumerate() {
        assert_eq!(block.uuid_at(pos).unwrap(), *value, "position {pos}");
    }

    let offset = 1_234;
    let view = block.slice(offset, 777).unwrap();
    for pos in 0..view.position_count() {
        assert_eq!(view.uuid_at(pos).unwrap(), expected[offset + pos]);
        assert_eq!(view.is_null(pos).unwrap(), expected[offset + pos].is_none());
    }
}

#[test]
fn concurrent_readers_see_the_same_page() {
    init_tracing_for_tests();
    let mut ids = BlockBuilder::new(LogicalType::BigInt, 1_000);
    let mut names = BlockBuilder::new(LogicalType::Varchar, 1_000);
    for i in 0..1_000i64 {
        ids.append_i64(i).unwrap();
        if i % 7 == 0 {
            names.append_null();
        } else {
            names.append_str(&format!("row-{i}")).unwrap();
        }
    }
    let page = Arc::new(Page::from_blocks(vec![ids.finish(), names.finish()]).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let page = Arc::clone(&page);
            thread::spawn(move || {
                let ids = page.column(0).unwrap();
                let names = page.column(1).unwrap();
                let mut sum = 0i64;
                let mut present = 0usize;
                for pos in (worker..page.row_count()).step_by(4) {
                    sum += ids.i64_at(pos).unwrap().unwrap();
                    if let Some(name) = names.str_at(pos).unwrap() {
                        assert_eq!(name, format!("row-{pos}"));
                        present += 1;
                    }
                }
                (sum, present)
            })
        })
        .collect();

    let (sum, present) = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .fold((0, 0), |(s, p), (ws, wp)| (s + ws, p + wp));
    assert_eq!(sum, (0..1_000).sum::<i64>());
    assert_eq!(present, 1_000 - (0..1_000).filter(|i| i % 7 == 0).count());
}

#[test]
fn record_batch_round_trip_preserves_every_type() {
    let mut flags = BlockBuilder::new(LogicalType::Boolean, 3);
    let mut scores = BlockBuilder::new(LogicalType::Double, 3);
    let mut blobs = BlockBuilder::new(LogicalType::Varbinary, 3);
    for i in 0..3 {
        flags.append_bool(i % 2 == 0).unwrap();
        scores.append_f64(i as f64 / 2.0).unwrap();
        if i == 1 {
            blobs.append_null();
        } else {
            blobs.append_bytes(&[i as u8; 3]).unwrap();
        }
    }
    let page = Page::from_blocks(vec![flags.finish(), scores.finish(), blobs.finish()]).unwrap();

    let batch = page.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.schema().field(2).name(), "c2");

    let types = [
        LogicalType::Boolean,
        LogicalType::Double,
        LogicalType::Varbinary,
    ];
    let back = Page::from_record_batch(&types, &batch).unwrap();
    assert_eq!(back.column(0).unwrap().bool_at(1).unwrap(), Some(false));
    assert_eq!(back.column(1).unwrap().f64_at(2).unwrap(), Some(1.0));
    assert_eq!(back.column(2).unwrap().bytes_at(1).unwrap(), None);
    assert_eq!(
        back.column(2).unwrap().bytes_at(2).unwrap(),
        Some(&[2u8, 2, 2][..])
    );
}
