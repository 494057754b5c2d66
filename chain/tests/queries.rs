//! Integration tests for C1's range-load queries (spec.md §4.1.2, §4.1.4),
//! pinning the checkpoint-inclusion boundary left ambiguous by the prose.

mod support;

use glint_chain::queries::{get_blocks_by_headers, retrieve_headers_from_to};
use glint_core::hash::Hash;

use support::{build_straight_chain, simple_hash};

#[tokio::test]
async fn retrieve_headers_from_to_includes_the_checkpoint_as_the_oldest_entry() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(5, 20);
	// headers = [genesis, h1, h2, h3, h4, h5] oldest-first.
	let checkpoint_hash = simple_hash(&headers[2]);

	let got = retrieve_headers_from_to(&ctx, &[checkpoint_hash], None).await.unwrap();

	let expected: Vec<Hash> = headers[2..].iter().map(simple_hash).collect();
	let got_hashes: Vec<Hash> = got.iter().map(simple_hash).collect();
	assert_eq!(got_hashes, expected);
}

#[tokio::test]
async fn retrieve_headers_from_to_walks_to_genesis_when_no_checkpoint_is_reached() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(3, 20);

	let got = retrieve_headers_from_to(&ctx, &[], None).await.unwrap();

	let expected: Vec<Hash> = headers.iter().map(simple_hash).collect();
	let got_hashes: Vec<Hash> = got.iter().map(simple_hash).collect();
	assert_eq!(got_hashes, expected);
}

#[tokio::test]
async fn retrieve_headers_from_to_honors_an_explicit_start_from() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(5, 20);
	let checkpoint_hash = simple_hash(&headers[1]);
	let start_from = simple_hash(&headers[3]);

	let got = retrieve_headers_from_to(&ctx, &[checkpoint_hash], Some(start_from))
		.await
		.unwrap();

	let expected: Vec<Hash> = headers[1..=3].iter().map(simple_hash).collect();
	let got_hashes: Vec<Hash> = got.iter().map(simple_hash).collect();
	assert_eq!(got_hashes, expected);
}

#[tokio::test]
async fn get_blocks_by_headers_returns_newest_first_inclusive_of_both_endpoints() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(5, 20);
	let older = simple_hash(&headers[2]);
	let newer = simple_hash(&headers[4]);

	let got = get_blocks_by_headers(&ctx, older, newer).await.unwrap().unwrap();

	let expected: Vec<Hash> = headers[2..=4].iter().rev().map(simple_hash).collect();
	let got_hashes: Vec<Hash> = got.iter().map(|b| simple_hash(&b.header)).collect();
	assert_eq!(got_hashes, expected);
}

#[tokio::test]
async fn get_blocks_by_headers_rejects_an_inverted_range() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(5, 20);
	let older = simple_hash(&headers[4]);
	let newer = simple_hash(&headers[2]);

	let got = get_blocks_by_headers(&ctx, older, newer).await.unwrap();
	assert!(got.is_none());
}

#[tokio::test]
async fn get_blocks_by_headers_returns_none_for_an_unknown_older_hash() {
	let (ctx, _db, _slotting, headers) = build_straight_chain(5, 20);
	let unknown = Hash::from_bytes([0xffu8; 32]);
	let newer = simple_hash(&headers[4]);

	let got = get_blocks_by_headers(&ctx, unknown, newer).await.unwrap();
	assert!(got.is_none());
}
