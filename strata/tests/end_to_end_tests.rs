//! End-to-end: tables served through page sources, cast and ordered with
//! registry-resolved operators.

use strata::operators::{distinct_from_block, hash_block, sort_positions};
use strata::source::{MemoryTable, PageSourceProvider, SourceDriver, SourceSplit};
use strata::{
    Block, BlockBuilder, CastError, Error, Identity, LogicalType, Page, SortOrder,
    TypeOperatorRegistry, TypeOperators,
};
use strata_test_utils::init_tracing_for_tests;

fn text_block(values: &[Option<&str>]) -> Block {
    let mut builder = BlockBuilder::new(LogicalType::Varchar, values.len());
    for v in values {
        builder.append_option(v.map(str::as_bytes)).unwrap();
    }
    builder.finish()
}

fn cast(block: &Block, target: LogicalType) -> strata::Result<Block> {
    TypeOperatorRegistry::global()
        .cast(block.logical_type(), target)?
        .cast_block(block)
}

#[test]
fn mixed_case_text_round_trips_to_lowercase() {
    init_tracing_for_tests();
    let uuids = cast(
        &text_block(&[Some("12151FD2-7586-11E9-8F9E-2A86E4085A59")]),
        LogicalType::Uuid,
    )
    .unwrap();
    let text = cast(&uuids, LogicalType::Varchar).unwrap();
    assert_eq!(
        text.str_at(0).unwrap(),
        Some("12151fd2-7586-11e9-8f9e-2a86e4085a59")
    );
}

#[test]
fn zero_bytes_render_as_the_nil_uuid() {
    let mut builder = BlockBuilder::new(LogicalType::Varbinary, 1);
    builder.append_bytes(&[0u8; 16]).unwrap();
    let uuids = cast(&builder.finish(), LogicalType::Uuid).unwrap();
    let text = cast(&uuids, LogicalType::Varchar).unwrap();
    assert_eq!(
        text.str_at(0).unwrap(),
        Some("00000000-0000-0000-0000-000000000000")
    );
}

#[test]
fn short_text_fails_with_its_length() {
    let err = cast(&text_block(&[Some("1-2-3-4-1")]), LogicalType::Uuid).unwrap_err();
    assert!(matches!(
        err,
        Error::Cast(CastError::InvalidTextLength {
            target: "UUID",
            length: 9
        })
    ));
    assert_eq!(err.to_string(), "Invalid UUID string length: 9");
    assert!(err.is_user_error());
}

#[test]
fn text_lengths_other_than_36_are_named() {
    let base = "12151fd2-7586-11e9-8f9e-2a86e4085a59";
    for len in [0, 1, 35, 37, 64] {
        let input: String = base.chars().cycle().take(len).collect();
        let err = strata::parse_uuid(&input).unwrap_err();
        assert_eq!(
            err,
            CastError::InvalidTextLength {
                target: "UUID",
                length: len
            }
        );
    }
    for len in [0, 1, 15, 17, 32] {
        let err = strata::operators::uuid_from_binary(&vec![7u8; len]).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid UUID binary length: {len}"));
    }
}

#[test]
fn uuid_table_scan_sorts_groups_and_counts() {
    init_tracing_for_tests();
    let ids = [
        Some("dfa7eaf8-6a26-5749-8d36-336025df74e8"),
        None,
        Some("12151fd2-7586-11e9-8f9e-2a86e4085a59"),
        Some("6B5F5B65-67E4-43B0-8EE3-586CD49F58A0"),
        Some("12151FD2-7586-11E9-8F9E-2A86E4085A59"),
    ];
    let uuids = cast(&text_block(&ids), LogicalType::Uuid).unwrap();
    let pages = vec![
        Page::from_blocks(vec![uuids.slice(0, 2).unwrap()]).unwrap(),
        Page::from_blocks(vec![uuids.slice(2, 3).unwrap()]).unwrap(),
    ];
    let table = MemoryTable::new("sessions", vec![LogicalType::Uuid], pages).unwrap();
    let identity = Identity::for_user("etl");

    let sources = vec![
        table
            .create_page_source(&identity, &SourceSplit::full("sessions"), &[0])
            .unwrap(),
        table
            .create_page_source(&identity, &SourceSplit::full("sessions"), &[])
            .unwrap(),
    ];
    let mut driver = SourceDriver::new(sources);
    let driven = driver.drain().unwrap();

    let counted: usize = driven
        .iter()
        .filter(|p| p.source == 1)
        .map(|p| p.page.row_count())
        .sum();
    assert_eq!(counted, 5);

    // Reassemble the scanned column and run the hot loops over it.
    let registry = TypeOperatorRegistry::global();
    let ops = registry.operators(LogicalType::Uuid).unwrap();
    let mut builder = BlockBuilder::new(LogicalType::Uuid, 5);
    for page in driven.iter().filter(|p| p.source == 0) {
        let block = page.page.column(0).unwrap();
        for pos in 0..block.position_count() {
            builder.append_from(block, pos).unwrap();
        }
    }
    let scanned = builder.finish();
    assert_eq!(scanned.position_count(), 5);

    let order = sort_positions(ops.as_ref(), &scanned, SortOrder::ASC_NULLS_LAST).unwrap();
    let sorted = cast(&scanned.copy_positions(&order).unwrap(), LogicalType::Varchar).unwrap();
    let rendered: Vec<Option<&str>> = (0..5).map(|p| sorted.str_at(p).unwrap()).collect();
    assert_eq!(
        rendered,
        vec![
            Some("12151fd2-7586-11e9-8f9e-2a86e4085a59"),
            Some("12151fd2-7586-11e9-8f9e-2a86e4085a59"),
            Some("6b5f5b65-67e4-43b0-8ee3-586cd49f58a0"),
            Some("dfa7eaf8-6a26-5749-8d36-336025df74e8"),
            None,
        ]
    );

    let hashes = hash_block(ops.as_ref(), &scanned).unwrap();
    assert_eq!(hashes[2], hashes[4]);
    assert!(ops.equal(&scanned, 2, &scanned, 4).unwrap());

    let shifted = scanned.copy_positions(&[1, 1, 4, 3, 2]).unwrap();
    let distinct = distinct_from_block(ops.as_ref(), &scanned, &shifted).unwrap();
    let flags: Vec<bool> = (0..5).map(|p| distinct.bool_at(p).unwrap().unwrap()).collect();
    assert_eq!(flags, vec![true, false, false, false, false]);
}

#[test]
fn scanned_pages_convert_to_record_batches() {
    let uuids = strata::operators::random_uuid_block(64).unwrap();
    let page = Page::from_blocks(vec![uuids]).unwrap();
    let batch = page.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 64);

    let back = Page::from_record_batch(&[LogicalType::Uuid], &batch).unwrap();
    let ops = TypeOperatorRegistry::global()
        .operators(LogicalType::Uuid)
        .unwrap();
    for pos in 0..64 {
        assert!(
            ops.equal(page.column(0).unwrap(), pos, back.column(0).unwrap(), pos)
                .unwrap()
        );
    }
}
