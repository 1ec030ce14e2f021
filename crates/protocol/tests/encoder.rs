use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::fs;
use blindtree_protocol::{
    Chain17V1Leaf, Encoder, EncoderError, EncodingType, Key, Leaf, LinkId, Secret, TeamId,
    UnknownEncodingType,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Vector {
    name: String,
    encoding_type: u8,
    team_id: String,
    sig_id: String,
    link_id: String,
    seqno: i64,
    key: String,
    secret: String,
    output: String,
}

impl Vector {
    fn leaf(&self) -> Leaf {
        Chain17V1Leaf {
            team_id: TeamId(decode(&self.team_id).try_into().unwrap()),
            sig_id: decode(&self.sig_id),
            link_id: LinkId(decode(&self.link_id).try_into().unwrap()),
            seqno: self.seqno,
        }
        .into()
    }

    fn key(&self) -> Key {
        Key::from(decode(&self.key))
    }

    fn secret(&self) -> Secret {
        Secret::new(decode(&self.secret))
    }
}

fn decode(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn vectors() -> Vec<Vector> {
    serde_json::from_str(&fs::read_to_string("./tests/vectors/encoder.json").unwrap()).unwrap()
}

fn sample() -> (Leaf, Key, Secret) {
    let vector = vectors().remove(0);
    (vector.leaf(), vector.key(), vector.secret())
}

#[test]
fn test_encoder_vectors() {
    for vector in vectors() {
        let encoder = Encoder::from_tag(vector.encoding_type).unwrap();
        let output = encoder
            .encode(&vector.leaf(), &vector.key(), &vector.secret())
            .unwrap();
        assert_eq!(hex::encode(&output), vector.output, "{}", vector.name);

        // Repeat calls are stable.
        let again = encoder
            .encode(&vector.leaf(), &vector.key(), &vector.secret())
            .unwrap();
        assert_eq!(output, again, "{}", vector.name);
    }
}

#[test]
fn test_two_routes_agree() {
    let (leaf, key, secret) = sample();
    for encoding_type in EncodingType::all() {
        let encoder = Encoder::new(encoding_type);
        let preimage = encoder.derive_blinded_entropy(&leaf, &key, &secret).unwrap();
        assert_eq!(
            encoder.hash(&preimage).unwrap(),
            encoder.encode(&leaf, &key, &secret).unwrap()
        );
        assert_eq!(
            preimage.blinded_entropy.len(),
            encoding_type.hash_algorithm().output_size()
        );
        assert_eq!(preimage.leaf_container.leaf().unwrap(), leaf);
    }
}

#[test]
fn test_output_depends_on_every_input() {
    let (leaf, key, secret) = sample();
    let encoder = Encoder::default();
    let base = encoder.encode(&leaf, &key, &secret).unwrap();

    let Leaf::Chain17V1(fields) = &leaf;
    let variants = [
        Chain17V1Leaf {
            team_id: TeamId([0xff; 16]),
            ..fields.clone()
        },
        Chain17V1Leaf {
            sig_id: vec![0x01; 31],
            ..fields.clone()
        },
        Chain17V1Leaf {
            link_id: LinkId([0xff; 32]),
            ..fields.clone()
        },
        Chain17V1Leaf {
            seqno: 124,
            ..fields.clone()
        },
    ];
    for variant in variants {
        assert_ne!(encoder.encode(&variant.into(), &key, &secret).unwrap(), base);
    }

    let other_key = Key::from(vec![0x03; 31]);
    assert_ne!(encoder.encode(&leaf, &other_key, &secret).unwrap(), base);

    let legacy = Encoder::new(EncodingType::BlindedSha256V1);
    assert_ne!(legacy.encode(&leaf, &key, &secret).unwrap(), base);
}

#[test]
fn test_generated_secrets_differ() {
    for encoding_type in EncodingType::all() {
        let encoder = Encoder::new(encoding_type);
        let first = encoder.generate_secret().unwrap();
        let second = encoder.generate_secret().unwrap();
        assert_eq!(first.len(), encoding_type.secret_len());
        assert_ne!(first, second);
    }
}

#[test]
fn test_unknown_encoding_type_rejected() {
    for tag in [0u8, 3, 255] {
        assert_eq!(Encoder::from_tag(tag), Err(UnknownEncodingType(tag)));
        assert!(matches!(
            EncoderError::from(UnknownEncodingType(tag)),
            EncoderError::UnknownEncodingType(UnknownEncodingType(t)) if t == tag
        ));
    }
    assert!(serde_json::from_str::<EncodingType>("9").is_err());
}
