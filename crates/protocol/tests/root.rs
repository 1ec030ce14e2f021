use blindtree_protocol::{
    verify_skiplist, EncodingType, Root, RootError, RootMetadata, Skips, TreeSeqno,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, SystemTime};

fn chain(len: TreeSeqno) -> Vec<RootMetadata> {
    let mut chain: Vec<RootMetadata> = Vec::new();
    for seqno in 1..=len {
        let mut skips = Skips::new();
        if let Some(prev) = chain.last() {
            skips.insert(seqno - 1, prev.hash_meta().unwrap());
        }
        // Every fourth epoch also points back to the first.
        if seqno > 2 && seqno % 4 == 0 {
            skips.insert(1, chain[0].hash_meta().unwrap());
        }
        chain.push(
            RootMetadata::new(EncodingType::CURRENT, seqno, skips, vec![seqno as u8; 32]).unwrap(),
        );
    }
    chain
}

#[test]
fn test_root_metadata_vector() {
    let mut skips = Skips::new();
    skips.insert(4, [0x11u8; 32]);
    skips.insert(1, [0x22u8; 32]);
    let metadata = RootMetadata::new(EncodingType::CURRENT, 5, skips, vec![0x33; 32]).unwrap();

    let (bytes, hash) = metadata.canonicalize_and_hash().unwrap();
    let expected = format!(
        "9402058201c420{}04c420{}c420{}",
        "22".repeat(32),
        "11".repeat(32),
        "33".repeat(32)
    );
    assert_eq!(hex::encode(&bytes), expected);
    assert_eq!(
        hex::encode(hash.bytes()),
        "f8e2bab15a5366933db6630fc95b82fb03e83769f75453aed1ed5f9f5c5b7c73"
    );
    assert_eq!(metadata.prev(), Some([0x11; 32].as_slice()));
    assert_eq!(RootMetadata::decode(&bytes).unwrap(), metadata);
}

#[test]
fn test_hash_meta_is_stable() {
    let first = chain(3);
    let second = chain(3);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.hash_meta().unwrap(), b.hash_meta().unwrap());
    }
    assert_ne!(first[1].hash_meta().unwrap(), first[2].hash_meta().unwrap());
}

#[test]
fn test_verify_skiplist() {
    let roots = chain(8);

    verify_skiplist(&roots[0], &roots[1..]).unwrap();
    verify_skiplist(&roots[0], &[]).unwrap();
    // Epoch 4 and 8 skip straight back to epoch 1.
    verify_skiplist(&roots[0], &[roots[3].clone()]).unwrap();
    verify_skiplist(&roots[2], &roots[3..5]).unwrap();

    assert!(matches!(
        verify_skiplist(&roots[0], &[roots[2].clone()]),
        Err(RootError::BrokenSkiplist { seqno: 3, prev: 1 })
    ));
    assert!(matches!(
        verify_skiplist(&roots[4], &[roots[2].clone()]),
        Err(RootError::SkiplistOrder { seqno: 3, prev: 5 })
    ));
}

#[test]
fn test_verify_skiplist_detects_forked_history() {
    let chain = chain(3);
    let mut skips = Skips::new();
    skips.insert(1, chain[0].hash_meta().unwrap());
    let fork = RootMetadata::new(EncodingType::CURRENT, 2, skips, vec![0xee; 32]).unwrap();

    assert!(matches!(
        verify_skiplist(&fork, &chain[2..]),
        Err(RootError::BrokenSkiplist { seqno: 3, prev: 2 })
    ));
}

#[test]
fn test_metadata_keeps_its_encoding_type() {
    let metadata =
        RootMetadata::new(EncodingType::BlindedSha256V1, 1, Skips::new(), vec![0; 32]).unwrap();
    let bytes = metadata.canonicalize_and_hash().unwrap().0;
    assert_eq!(bytes[1], 0x01);
    assert_eq!(
        RootMetadata::decode(&bytes).unwrap().encoding_type(),
        EncodingType::BlindedSha256V1
    );
}

#[test]
fn test_root_json_body() {
    let metadata = chain(2).pop().unwrap();
    let ctime = SystemTime::UNIX_EPOCH + Duration::new(1_700_000_000, 42);
    let root = Root::new(&metadata, ctime).unwrap();

    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["seqno"], 2);
    assert_eq!(json["ctime"], "1700000000.42");

    let parsed: Root = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, root);
    assert_eq!(parsed.ctime(), ctime);
    assert_eq!(parsed.open().unwrap(), metadata);
}

#[test]
fn test_metadata_json_is_validated() {
    let metadata = chain(2).pop().unwrap();
    let mut json = serde_json::to_value(&metadata).unwrap();
    assert_eq!(json["encodingType"], 2);
    assert_eq!(
        serde_json::from_value::<RootMetadata>(json.clone()).unwrap(),
        metadata
    );

    json["skips"] = serde_json::json!({});
    assert!(serde_json::from_value::<RootMetadata>(json).is_err());
}

#[test]
fn test_decode_requires_prev_skip() {
    // Well-formed bytes for seqno 5 whose only skip points back to epoch 1.
    let bytes = hex::decode(format!(
        "9402058101c420{}c40103",
        "11".repeat(32)
    ))
    .unwrap();
    assert!(matches!(
        RootMetadata::decode(&bytes),
        Err(RootError::MissingPrevSkip { seqno: 5 })
    ));
}
