//! Concrete build/match scenarios exercising `Builder` and `Matcher` together.

use bitsyntax::{Builder, Matcher, SegmentOptions};
use bitsyntax_codec::Endianness;

#[test]
fn simple_three_byte_build_and_match_round_trips() {
	let mut builder = Builder::new();
	builder
		.add_unsigned(1, SegmentOptions::new().with_size(8))
		.add_unsigned(17, SegmentOptions::new().with_size(8))
		.add_unsigned(42, SegmentOptions::new().with_size(8));

	let packed = builder.build().unwrap();
	assert_eq!(packed.to_bytes(), vec![0x01, 0x11, 0x2A]);
	assert_eq!(packed.length(), 24);

	let (mut a, mut b, mut c) = (0u32, 0u32, 0u32);
	let mut matcher = Matcher::new();
	matcher
		.integer(&mut a, SegmentOptions::new().with_size(8))
		.integer(&mut b, SegmentOptions::new().with_size(8))
		.integer(&mut c, SegmentOptions::new().with_size(8));

	let results = matcher.match_against(&packed).unwrap();
	assert_eq!((a, b, c), (1, 17, 42));
	assert!(results.iter().all(|r| r.matched));
}

#[test]
fn ipv4_header_round_trips() {
	let mut builder = Builder::new();
	builder
		.add_unsigned(4, SegmentOptions::new().with_size(4))
		.add_unsigned(5, SegmentOptions::new().with_size(4))
		.add_unsigned(0, SegmentOptions::new().with_size(8))
		.add_unsigned(20, SegmentOptions::new().with_size(16).with_endianness(Endianness::Big))
		.add_unsigned(12345, SegmentOptions::new().with_size(16).with_endianness(Endianness::Big))
		.add_unsigned(2, SegmentOptions::new().with_size(3))
		.add_unsigned(0, SegmentOptions::new().with_size(13))
		.add_unsigned(64, SegmentOptions::new().with_size(8))
		.add_unsigned(6, SegmentOptions::new().with_size(8))
		.add_unsigned(0, SegmentOptions::new().with_size(16).with_endianness(Endianness::Big))
		.add_unsigned(0xC0A8_0001, SegmentOptions::new().with_size(32).with_endianness(Endianness::Big))
		.add_unsigned(0x0808_0808, SegmentOptions::new().with_size(32).with_endianness(Endianness::Big));

	let packed = builder.build().unwrap();
	assert_eq!(packed.length(), 160);
	assert_eq!(packed.to_bytes().len(), 20);

	let mut version = 0u32;
	let mut ihl = 0u32;
	let mut tos = 0u32;
	let mut total_len = 0u32;
	let mut id = 0u32;
	let mut flags = 0u32;
	let mut frag_offset = 0u32;
	let mut ttl = 0u32;
	let mut protocol = 0u32;
	let mut checksum = 0u32;
	let mut src = 0u32;
	let mut dst = 0u32;

	let mut matcher = Matcher::new();
	matcher
		.integer(&mut version, SegmentOptions::new().with_size(4))
		.integer(&mut ihl, SegmentOptions::new().with_size(4))
		.integer(&mut tos, SegmentOptions::new().with_size(8))
		.integer(&mut total_len, SegmentOptions::new().with_size(16))
		.integer(&mut id, SegmentOptions::new().with_size(16))
		.integer(&mut flags, SegmentOptions::new().with_size(3))
		.integer(&mut frag_offset, SegmentOptions::new().with_size(13))
		.integer(&mut ttl, SegmentOptions::new().with_size(8))
		.integer(&mut protocol, SegmentOptions::new().with_size(8))
		.integer(&mut checksum, SegmentOptions::new().with_size(16))
		.integer(&mut src, SegmentOptions::new().with_size(32))
		.integer(&mut dst, SegmentOptions::new().with_size(32));

	matcher.match_against(&packed).unwrap();

	assert_eq!(version, 4);
	assert_eq!(ihl, 5);
	assert_eq!(total_len, 20);
	assert_eq!(id, 12345);
	assert_eq!(src, 0xC0A8_0001);
	assert_eq!(dst, 0x0808_0808);
}

#[test]
fn tcp_flags_build_matches_expected_byte() {
	let mut builder = Builder::new();
	builder
		.add_unsigned(0, SegmentOptions::new().with_size(2))
		.add_unsigned(0, SegmentOptions::new().with_size(1))
		.add_unsigned(1, SegmentOptions::new().with_size(1))
		.add_unsigned(1, SegmentOptions::new().with_size(1))
		.add_unsigned(1, SegmentOptions::new().with_size(1))
		.add_unsigned(0, SegmentOptions::new().with_size(1))
		.add_unsigned(0, SegmentOptions::new().with_size(1));

	assert_eq!(builder.build().unwrap().to_bytes(), vec![0x38]);
}

#[test]
fn utf8_codepoint_round_trips_through_a_string_target() {
	let mut builder = Builder::new();
	builder.add_utf8(1024, SegmentOptions::new());
	let packed = builder.build().unwrap();
	assert_eq!(packed.to_bytes(), vec![0xD0, 0x80]);

	let mut codepoint = 0u32;
	let mut matcher = Matcher::new();
	matcher.utf8(&mut codepoint, SegmentOptions::new());
	matcher.match_against(&packed).unwrap();
	assert_eq!(codepoint, 1024);

	let mut text = String::new();
	let mut matcher = Matcher::new();
	matcher.utf8(&mut text, SegmentOptions::new());
	matcher.match_against(&packed).unwrap();
	assert_eq!(text, "\u{400}");
}

#[test]
fn binary_segment_round_trips_through_a_string_target() {
	let mut builder = Builder::new();
	builder.add_binary(b"Hello".to_vec(), SegmentOptions::new().with_size(5));
	let packed = builder.build().unwrap();

	let mut text = String::new();
	let mut matcher = Matcher::new();
	matcher.binary(&mut text, SegmentOptions::new().with_size(5));
	matcher.match_against(&packed).unwrap();
	assert_eq!(text, "Hello");
}

#[test]
fn dynamic_size_scenario_matches_a_length_prefixed_payload() {
	let mut input_bytes = vec![5u8];
	input_bytes.extend_from_slice(b"Hello World");
	let input = bitsyntax::BitString::from_bytes(input_bytes);

	let mut size = 0u64;
	let mut data = Vec::new();
	let mut rest = Vec::new();

	let mut matcher = Matcher::new();
	matcher
		.integer(&mut size, SegmentOptions::new().with_size(8).with_name("size"))
		.binary(&mut data, SegmentOptions::new().with_dynamic_size_variable("size"))
		.rest_binary(&mut rest);

	matcher.match_against(&input).unwrap();

	assert_eq!(size, 5);
	assert_eq!(data, b"Hello");
	assert_eq!(rest, b" World");
}

#[test]
fn dynamic_size_scenario_also_works_via_an_expression() {
	let mut input_bytes = vec![3u8];
	input_bytes.extend_from_slice(b"abcdef");
	let input = bitsyntax::BitString::from_bytes(input_bytes);

	let mut size = 0u64;
	let mut data = Vec::new();

	let mut matcher = Matcher::new();
	matcher
		.integer(&mut size, SegmentOptions::new().with_size(8).with_name("size"))
		.binary(&mut data, SegmentOptions::new().with_dynamic_size_expression("size * 2"));

	matcher.match_against(&input).unwrap();

	assert_eq!(size, 3);
	assert_eq!(data, b"abcdef");
}

#[test]
fn signedness_at_16_bits_is_interpreted_per_segment() {
	let mut builder = Builder::new();
	builder
		.add_integer(1000, SegmentOptions::new().with_size(16))
		.add_integer(-1000, SegmentOptions::new().with_size(16))
		.add_integer(40000, SegmentOptions::new().with_size(16));
	let packed = builder.build().unwrap();

	let mut a = 0i32;
	let mut b = 0i32;
	let mut c = 0u32;

	let mut matcher = Matcher::new();
	matcher
		.integer(&mut a, SegmentOptions::new().with_size(16).with_signed(true))
		.integer(&mut b, SegmentOptions::new().with_size(16).with_signed(true))
		.integer(&mut c, SegmentOptions::new().with_size(16));
	matcher.match_against(&packed).unwrap();

	assert_eq!(a, 1000);
	assert_eq!(b, -1000);
	assert_eq!(c, 40000);
}

#[test]
fn matching_a_bitstring_with_only_rest_bitstring_yields_it_back() {
	for bytes in [vec![0xABu8, 0xCD], vec![0x00], vec![0xFF, 0xFF, 0xFF]] {
		let input = bitsyntax::BitString::from_bytes(bytes);
		let mut rest = bitsyntax::BitString::empty();

		let mut matcher = Matcher::new();
		matcher.rest_bitstring(&mut rest);
		matcher.match_against(&input).unwrap();

		assert_eq!(rest, input);
	}
}

#[test]
fn boundary_cases() {
	// Size 0 integer segment at build produces zero added bits.
	let mut builder = Builder::new();
	builder.add_unsigned(0, SegmentOptions::new().with_size(0));
	assert_eq!(builder.build().unwrap().length(), 0);

	// Binary with an explicit size that doesn't match the value's byte length fails.
	let mut builder = Builder::new();
	builder.add_binary(b"hi".to_vec(), SegmentOptions::new().with_size(10));
	let err = builder.build().unwrap_err();
	assert!(matches!(
		err.source,
		bitsyntax::EngineError::Codec(bitsyntax_codec::CodecError::BinarySizeMismatch { .. })
	));

	// A UTF segment can never declare an explicit size.
	let mut builder = Builder::new();
	builder.add_utf8(65, SegmentOptions::new().with_size(8));
	let err = builder.build().unwrap_err();
	assert!(matches!(err.source, bitsyntax::EngineError::UtfSizeSpecified));

	// Matching 8 bits out of a 7-bit BitString runs out of input.
	let input = bitsyntax::BitString::from_bits(vec![0xFF], 7);
	let mut target = 0u32;
	let mut matcher = Matcher::new();
	matcher.integer(&mut target, SegmentOptions::new().with_size(8));
	let err = matcher.match_against(&input).unwrap_err();
	assert!(matches!(
		err.source,
		bitsyntax::EngineError::Codec(bitsyntax_codec::CodecError::InsufficientBits { .. })
	));
}
