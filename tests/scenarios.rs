//! Concrete end-to-end scenarios

use mapbufr::{Codec, MapBuffer, MapBufferBuilder, MapBufferError, Reader, Strictness};

#[test]
fn scenario_one_uncompressed_lookup() {
    let mut builder = MapBufferBuilder::new(Codec::None, 0).expect("builder");
    builder.insert(2848, b"abc".to_vec());
    builder.insert(12939, b"123".to_vec());
    let buffer = builder.build().expect("build");

    assert_eq!(&buffer[0..7], b"mapbufr");
    assert_eq!(buffer[7], 0x00);
    assert_eq!(&buffer[8..12], b"none");
    assert_eq!(&buffer[12..16], &[0x02, 0x00, 0x00, 0x00]);

    let reader = MapBuffer::open(&buffer).expect("open");
    assert_eq!(reader.get(2848).expect("get"), b"abc");
    assert_eq!(reader.get(12939).expect("get"), b"123");
    assert!(!reader.contains(99));
}

#[test]
fn scenario_two_gzip_compressed_lookup() {
    let mut builder = MapBufferBuilder::new(Codec::Gzip, 0).expect("builder");
    builder.insert(2848, b"abc".to_vec());
    builder.insert(12939, b"123".to_vec());
    let buffer = builder.build().expect("build");

    assert_eq!(&buffer[8..12], b"gzip");

    let reader = MapBuffer::open(&buffer).expect("open");
    assert_eq!(reader.get(2848).expect("get"), b"abc");
    assert_eq!(reader.get(12939).expect("get"), b"123");
}

#[test]
fn scenario_three_empty_mapping() {
    let builder = MapBufferBuilder::new(Codec::None, 0).expect("builder");
    let buffer = builder.build().expect("build");

    let reader = MapBuffer::open(&buffer).expect("open");
    assert_eq!(reader.len(), 0);
    assert!(!reader.contains(5));
    assert!(matches!(
        reader.get(5),
        Err(MapBufferError::EmptyBufferAccess)
    ));
}

#[test]
fn scenario_four_duplicate_key_rejected() {
    let mut builder = MapBufferBuilder::new(Codec::None, 0).expect("builder");
    builder.insert(7, b"a".to_vec());
    builder.insert(7, b"b".to_vec());
    assert!(matches!(
        builder.build(),
        Err(MapBufferError::DuplicateKey(7))
    ));
}

#[test]
fn scenario_five_flipped_data_bit_in_version_one() {
    let mut builder = MapBufferBuilder::new(Codec::None, 1).expect("builder");
    builder.insert(1, b"untouched".to_vec());
    builder.insert(2, b"flip-me-here".to_vec());
    let mut buffer = builder.build().expect("build");

    // Flip a bit squarely inside the data region of the second value.
    let flip_pos = buffer.len() - 6;
    buffer[flip_pos] ^= 0x01;

    assert!(matches!(
        mapbufr::validator::validate(&buffer),
        Err(MapBufferError::ChecksumMismatch { .. })
    ));

    // Lenient reads of an untouched key still succeed.
    let lenient = MapBuffer::open(&buffer).expect("lenient open");
    assert_eq!(lenient.get(1).expect("get untouched key"), b"untouched");

    // Strict open surfaces the checksum mismatch.
    let strict = Reader::<Vec<u8>>::open_with(
        &buffer,
        mapbufr::IdentityDecoder,
        Strictness::Strict,
    );
    assert!(matches!(strict, Err(MapBufferError::ChecksumMismatch { .. })));
}

#[test]
fn scenario_six_thousand_entries_zstd() {
    let mut builder = MapBufferBuilder::new(Codec::Zstd, 0).expect("builder");
    for i in 0u64..1000 {
        builder.insert(i, vec![(i % 256) as u8]);
    }
    let buffer = builder.build().expect("build");

    let reader = MapBuffer::open(&buffer).expect("open");
    let keys: Vec<u64> = reader.iter_keys().collect();
    assert_eq!(keys, (0u64..1000).collect::<Vec<_>>());

    for i in [0u64, 1, 250, 500, 750, 999] {
        assert_eq!(reader.get(i).expect("get"), vec![(i % 256) as u8]);
    }
}
