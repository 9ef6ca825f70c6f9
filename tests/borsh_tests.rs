use borsh_serde::{
    BorshBuffer, Config, Error, from_bytes, from_bytes_partial, from_bytes_with, from_reader,
    to_buffer, to_bytes, to_writer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[test]
fn test_bool_true() {
    let bytes = to_bytes(&true).unwrap();
    assert_eq!(bytes, [1]);
    assert!(from_bytes::<bool>(&bytes).unwrap());
}

#[test]
fn test_bool_invalid() {
    let result = from_bytes::<bool>(&[2]);
    assert!(matches!(result, Err(Error::InvalidEncoding(_))));
}

#[test]
fn test_unsigned_widths() {
    assert_eq!(to_bytes(&0xABu8).unwrap(), [0xAB]);
    assert_eq!(to_bytes(&0x0102u16).unwrap(), [0x02, 0x01]);
    assert_eq!(to_bytes(&0xDEADBEEFu32).unwrap(), [0xEF, 0xBE, 0xAD, 0xDE]);
    assert_eq!(
        to_bytes(&0x0102030405060708u64).unwrap(),
        [8, 7, 6, 5, 4, 3, 2, 1]
    );
}

#[test]
fn test_u128_boundaries() {
    assert_eq!(to_bytes(&0u128).unwrap(), [0u8; 16]);
    assert_eq!(to_bytes(&u128::MAX).unwrap(), [0xFF; 16]);
    let v = 1u128 << 127;
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes[15], 0x80);
    assert_eq!(from_bytes::<u128>(&bytes).unwrap(), v);
}

#[test]
fn test_signed_roundtrip() {
    for v in [i64::MIN, -1, 0, 1, i64::MAX] {
        assert_eq!(v, from_bytes::<i64>(&to_bytes(&v).unwrap()).unwrap());
    }
    assert_eq!(to_bytes(&-1i32).unwrap(), [0xFF; 4]);
    assert_eq!(from_bytes::<i128>(&[0xFF; 16]).unwrap(), -1);
}

#[test]
fn test_f32_roundtrip() {
    for v in [std::f32::consts::PI, f32::INFINITY, f32::NAN, 0.0_f32, -0.0_f32] {
        let decoded: f32 = from_bytes(&to_bytes(&v).unwrap()).unwrap();
        assert_eq!(v.to_bits(), decoded.to_bits());
    }
}

#[test]
fn test_f64_layout() {
    let v = 1.0f64;
    assert_eq!(to_bytes(&v).unwrap(), v.to_bits().to_le_bytes());
}

#[test]
fn test_string_layout() {
    assert_eq!(to_bytes(&"").unwrap(), [0, 0, 0, 0]);
    assert_eq!(from_bytes::<String>(&[0, 0, 0, 0]).unwrap(), "");
    let bytes = to_bytes(&"ABCDE").unwrap();
    assert_eq!(bytes, [5, 0, 0, 0, b'A', b'B', b'C', b'D', b'E']);
}

#[test]
fn test_borrowed_str() {
    #[derive(Deserialize)]
    struct Borrowed<'a> {
        name: &'a str,
    }
    let bytes = to_bytes(&"zero-copy").unwrap();
    let v: Borrowed<'_> = from_bytes(&bytes).unwrap();
    assert_eq!(v.name, "zero-copy");
}

#[test]
fn test_invalid_utf8() {
    let result = from_bytes::<String>(&[1, 0, 0, 0, 0xFF]);
    assert!(matches!(result, Err(Error::InvalidEncoding(_))));
}

#[test]
fn test_option_none_some() {
    assert_eq!(to_bytes(&Option::<u32>::None).unwrap(), [0]);
    let bytes = to_bytes(&Some(42u32)).unwrap();
    assert_eq!(bytes, [1, 42, 0, 0, 0]);
    assert_eq!(Some(42u32), from_bytes::<Option<u32>>(&bytes).unwrap());
}

#[test]
fn test_option_presence_modes() {
    let bytes = [7, 42, 0, 0, 0];
    assert_eq!(from_bytes::<Option<u32>>(&bytes).unwrap(), Some(42));
    let strict = from_bytes_with::<Option<u32>>(&bytes, Config::strict());
    assert!(matches!(strict, Err(Error::InvalidEncoding(_))));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Pair {
    a: u8,
    b: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SwappedPair {
    b: u32,
    a: u8,
}

#[test]
fn test_struct_declared_order() {
    assert_eq!(
        to_bytes(&Pair { a: 7, b: 256 }).unwrap(),
        [0x07, 0x00, 0x01, 0x00, 0x00]
    );
    assert_eq!(
        to_bytes(&SwappedPair { a: 7, b: 256 }).unwrap(),
        [0x00, 0x01, 0x00, 0x00, 0x07]
    );
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Action {
    CreateAccount,
    Transfer(u128),
    Stake { amount: u128, key: String },
}

#[test]
fn test_unit_enum() {
    let bytes = to_bytes(&Action::CreateAccount).unwrap();
    assert_eq!(bytes, [0]);
    assert_eq!(Action::CreateAccount, from_bytes(&bytes).unwrap());
}

#[test]
fn test_newtype_enum_variant() {
    let v = Action::Transfer(5);
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes.len(), 1 + 16);
    assert_eq!(bytes[0], 1);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_struct_enum_variant() {
    let v = Action::Stake { amount: 1, key: "k".into() };
    let bytes = to_bytes(&v).unwrap();
    let mut expected = vec![2];
    expected.extend(1u128.to_le_bytes());
    expected.extend([1, 0, 0, 0, b'k']);
    assert_eq!(bytes, expected);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_unknown_variant_index() {
    assert!(from_bytes::<Action>(&[9]).is_err());
}

#[test]
fn test_vec_u8_sequence() {
    let bytes = to_bytes(&vec![1u8, 2, 3]).unwrap();
    assert_eq!(bytes, [0x03, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
    assert_eq!(from_bytes::<Vec<u8>>(&bytes).unwrap(), [1, 2, 3]);
}

#[test]
fn test_vec_of_structs() {
    let v = vec![Pair { a: 1, b: 2 }, Pair { a: 3, b: 4 }];
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(&bytes[..4], [2, 0, 0, 0]);
    assert_eq!(bytes.len(), 4 + 2 * 5);
    assert_eq!(v, from_bytes::<Vec<Pair>>(&bytes).unwrap());
}

#[test]
fn test_sequence_count_limit() {
    let bytes = [0xFF, 0xFF, 0xFF, 0x7F];
    let result = from_bytes::<Vec<u64>>(&bytes);
    assert!(matches!(result, Err(Error::InvalidEncoding(_))));

    let config = Config::default().with_max_sequence_len(2);
    let bytes = to_bytes(&vec![1u8, 2, 3]).unwrap();
    let result = from_bytes_with::<Vec<u8>>(&bytes, config);
    assert!(matches!(result, Err(Error::InvalidEncoding(_))));
}

#[test]
fn test_sequence_count_exceeds_input() {
    // Count fits under the limit, but the payload is missing.
    let bytes = [0x00, 0x10, 0x00, 0x00];
    let result = from_bytes::<Vec<u32>>(&bytes);
    assert!(matches!(result, Err(Error::BufferUnderflow { .. })));
}

#[test]
fn test_bytes_with_serde_bytes() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    }
    let blob = Blob { data: vec![9, 8, 7] };
    let bytes = to_bytes(&blob).unwrap();
    assert_eq!(bytes, [3, 0, 0, 0, 9, 8, 7]);
    assert_eq!(blob, from_bytes(&bytes).unwrap());
}

#[test]
fn test_tuple_no_count_prefix() {
    let v: (u8, u16, u32) = (1, 2, 3);
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes, [1, 2, 0, 3, 0, 0, 0]);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

#[test]
fn test_map_ordered() {
    let mut m = BTreeMap::new();
    m.insert("b".to_string(), 2u8);
    m.insert("a".to_string(), 1u8);
    let bytes = to_bytes(&m).unwrap();
    assert_eq!(
        bytes,
        [2, 0, 0, 0, 1, 0, 0, 0, b'a', 1, 1, 0, 0, 0, b'b', 2]
    );
    assert_eq!(m, from_bytes::<BTreeMap<String, u8>>(&bytes).unwrap());
}

#[test]
fn test_unit_void() {
    assert_eq!(to_bytes(&()).unwrap().len(), 0);
    from_bytes::<()>(&[]).unwrap();
}

#[test]
fn test_char() {
    assert_eq!(to_bytes(&'A').unwrap(), [0x41, 0, 0, 0]);
    assert!(matches!(
        from_bytes::<char>(&[0x00, 0xD8, 0x00, 0x00]),
        Err(Error::InvalidEncoding(_))
    ));
}

#[test]
fn test_error_buffer_underflow() {
    let result = from_bytes::<u32>(&[0, 0, 0]);
    assert_eq!(
        result,
        Err(Error::BufferUnderflow {
            needed: 4,
            remaining: 3
        })
    );
}

#[test]
fn test_error_trailing_bytes() {
    assert_eq!(from_bytes::<u8>(&[1, 2]), Err(Error::TrailingBytes(1)));
}

#[test]
fn test_deserialize_any_unsupported() {
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    enum Untagged {
        #[allow(dead_code)]
        A(u8),
    }
    assert!(matches!(
        from_bytes::<Untagged>(&[1]),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_partial_deserialization() {
    let mut buf = to_bytes(&42u32).unwrap();
    buf.extend(to_bytes(&99u32).unwrap());
    buf.extend([0xFF, 0xFF]);
    let (first, rest) = from_bytes_partial::<u32>(&buf).unwrap();
    assert_eq!(first, 42);
    let (second, remaining) = from_bytes_partial::<u32>(rest).unwrap();
    assert_eq!(second, 99);
    assert_eq!(remaining, [0xFF, 0xFF]);
}

// ══════════════════════════════════════════════════════════════════════════
// Buffers, writers and readers
// ══════════════════════════════════════════════════════════════════════════

#[test]
fn test_to_buffer_fixed_capacity() {
    let buf = to_buffer(BorshBuffer::allocate(16), &Pair { a: 1, b: 2 }).unwrap();
    assert_eq!(buf.capacity(), 16);
    assert_eq!(buf.finish(), [1, 2, 0, 0, 0]);
}

#[test]
fn test_to_buffer_overflow() {
    let result = to_buffer(BorshBuffer::allocate(4), &Pair { a: 1, b: 2 });
    assert!(matches!(result, Err(Error::BufferOverflow { .. })));
}

#[test]
fn test_to_buffer_appends() {
    let mut buf = BorshBuffer::growable();
    buf.write_u8(0xAA).unwrap();
    let buf = to_buffer(buf, &7u16).unwrap();
    assert_eq!(buf.finish(), [0xAA, 7, 0]);
}

#[test]
fn test_to_writer_matches_to_bytes() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Msg {
        id: u32,
        name: String,
        value: i64,
    }

    let msg = Msg { id: 7, name: "hello".into(), value: -9999 };
    let bytes = to_bytes(&msg).unwrap();
    let mut written = Vec::new();
    to_writer(&mut written, &msg).unwrap();
    assert_eq!(bytes, written);
}

#[test]
fn test_from_reader_roundtrip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        seq: u64,
        tag: u32,
        name: String,
        active: bool,
    }

    let rec = Record { seq: 0xABCD_EF01_2345_6789, tag: 99, name: "block".into(), active: true };
    let mut buf = Vec::new();
    to_writer(&mut buf, &rec).unwrap();
    let decoded: Record = from_reader(std::io::Cursor::new(buf)).unwrap();
    assert_eq!(rec, decoded);
}

#[test]
fn test_reader_underflow_error() {
    let result = from_reader::<_, u32>(std::io::Cursor::new([0u8, 0, 0]));
    assert!(matches!(result, Err(Error::BufferUnderflow { .. })));
}

// ══════════════════════════════════════════════════════════════════════════
// Fixed arrays
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct PublicKey {
    key_type: u8,
    #[serde(with = "borsh_serde::fixed_array")]
    data: [u8; 32],
}

#[test]
fn test_fixed_array_no_length_prefix() {
    let key = PublicKey { key_type: 0, data: [0x11; 32] };
    let bytes = to_bytes(&key).unwrap();
    assert_eq!(bytes.len(), 1 + 32);
    assert_eq!(bytes[0], 0);
    assert_eq!(&bytes[1..], [0x11; 32]);
    assert_eq!(key, from_bytes(&bytes).unwrap());
}

#[test]
fn test_fixed_array_large() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Signature {
        #[serde(with = "borsh_serde::fixed_array")]
        bytes: [u8; 64],
    }
    let sig = Signature { bytes: [0x5A; 64] };
    let bytes = to_bytes(&sig).unwrap();
    assert_eq!(bytes, [0x5A; 64]);
    assert_eq!(sig, from_bytes(&bytes).unwrap());
    assert_eq!(sig, from_reader(std::io::Cursor::new(bytes)).unwrap());
}

#[test]
fn test_fixed_array_matches_plain_array() {
    #[derive(Serialize)]
    struct Plain {
        arr: [u8; 3],
    }
    #[derive(Serialize)]
    struct Fixed {
        #[serde(with = "borsh_serde::fixed_array")]
        arr: [u8; 3],
    }
    assert_eq!(
        to_bytes(&Plain { arr: [1, 2, 3] }).unwrap(),
        to_bytes(&Fixed { arr: [1, 2, 3] }).unwrap()
    );
    assert_eq!(to_bytes(&Fixed { arr: [1, 2, 3] }).unwrap(), [1, 2, 3]);
}

#[test]
fn test_fixed_array_underflow() {
    #[derive(Debug, Deserialize)]
    struct Five {
        #[serde(with = "borsh_serde::fixed_array")]
        #[allow(dead_code)]
        data: [u8; 5],
    }
    assert_eq!(
        from_bytes::<Five>(&[1, 2, 3]).unwrap_err(),
        Error::BufferUnderflow {
            needed: 5,
            remaining: 3
        }
    );
}

#[test]
fn test_fixed_array_zero_bytes() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Empty {
        x: u32,
        #[serde(with = "borsh_serde::fixed_array")]
        zero: [u8; 0],
    }
    let v = Empty { x: 1, zero: [] };
    let bytes = to_bytes(&v).unwrap();
    assert_eq!(bytes.len(), 4);
    assert_eq!(v, from_bytes(&bytes).unwrap());
}

// ══════════════════════════════════════════════════════════════════════════
// A realistic nested message
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Transaction {
    signer_id: String,
    public_key: PublicKey,
    nonce: u64,
    receiver_id: String,
    #[serde(with = "borsh_serde::fixed_array")]
    block_hash: [u8; 32],
    actions: Vec<Action>,
    memo: Option<String>,
}

#[test]
fn test_transaction_roundtrip() {
    let tx = Transaction {
        signer_id: "alice.near".into(),
        public_key: PublicKey { key_type: 0, data: [7; 32] },
        nonce: 1,
        receiver_id: "bob.near".into(),
        block_hash: [0xCC; 32],
        actions: vec![
            Action::CreateAccount,
            Action::Transfer(10u128.pow(24)),
            Action::Stake { amount: 5, key: "ed25519:abc".into() },
        ],
        memo: Some("rent".into()),
    };
    let bytes = to_bytes(&tx).unwrap();
    assert_eq!(&bytes[..4], [10, 0, 0, 0]);
    assert_eq!(tx, from_bytes(&bytes).unwrap());
    assert_eq!(tx, from_reader(std::io::Cursor::new(&bytes[..])).unwrap());
}

// ══════════════════════════════════════════════════════════════════════════
// Self-referencing schemas
// ══════════════════════════════════════════════════════════════════════════

mod recursive {
    use borsh_serde::dispatch::{decode, encode, read_value, to_value, write_value};
    use borsh_serde::schema::TypeTag;
    use borsh_serde::value::{FromValue, Value};
    use borsh_serde::{BorshBuffer, Config, Error, aggregate, from_bytes, from_bytes_with, to_bytes};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Node {
        id: u8,
        children: Vec<Node>,
    }

    aggregate!(Node {
        id: TypeTag::U8,
        children: TypeTag::sequence(TypeTag::of::<Node>()),
    });

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Cons {
        head: u32,
        tail: Option<Box<Cons>>,
    }

    aggregate!(Cons {
        head: TypeTag::U32,
        tail: TypeTag::optional(TypeTag::of::<Cons>()),
    });

    fn leaf(id: u8) -> Node {
        Node { id, children: vec![] }
    }

    #[test]
    fn test_tree_through_sequence() {
        let tree = Node { id: 1, children: vec![leaf(2)] };
        let bytes = encode(&tree).unwrap();
        assert_eq!(bytes, [1, 1, 0, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(decode::<Node>(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_tree_through_untyped_dispatch() {
        let tree = Node {
            id: 1,
            children: vec![leaf(2), Node { id: 3, children: vec![leaf(4)] }],
        };
        let tag = TypeTag::of::<Node>();

        let mut buf = BorshBuffer::growable();
        write_value(&mut buf, &tag, &to_value(&tree).unwrap()).unwrap();
        let bytes = buf.finish();
        assert_eq!(bytes, encode(&tree).unwrap());

        let value = read_value(&mut BorshBuffer::wrap(&bytes), &tag, &Config::default()).unwrap();
        assert!(matches!(&value, Value::Aggregate(fields) if fields.len() == 2));
        assert_eq!(Node::from_value(value).unwrap(), tree);
    }

    #[test]
    fn test_list_through_optional() {
        let list = Cons {
            head: 10,
            tail: Some(Box::new(Cons { head: 20, tail: None })),
        };
        let bytes = encode(&list).unwrap();
        assert_eq!(bytes, [10, 0, 0, 0, 1, 20, 0, 0, 0, 0]);
        assert_eq!(decode::<Cons>(&bytes).unwrap(), list);

        let value = read_value(
            &mut BorshBuffer::wrap(&bytes),
            &TypeTag::of::<Cons>(),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(Cons::from_value(value).unwrap(), list);
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        // 4-byte head then a present tail, over and over.
        let mut bytes = Vec::new();
        for _ in 0..10_000 {
            bytes.extend([0, 0, 0, 0, 1]);
        }
        let err = decode::<Cons>(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SerdeNode {
        id: u8,
        children: Vec<SerdeNode>,
    }

    #[test]
    fn test_serde_tree_roundtrip() {
        let tree = SerdeNode {
            id: 1,
            children: vec![SerdeNode { id: 2, children: vec![] }],
        };
        let bytes = to_bytes(&tree).unwrap();
        assert_eq!(bytes, [1, 1, 0, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(from_bytes::<SerdeNode>(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_serde_depth_limit() {
        // Each level is a struct holding a one-element sequence.
        let mut bytes = Vec::new();
        for _ in 0..10_000 {
            bytes.extend([7, 1, 0, 0, 0]);
        }
        bytes.extend([7, 0, 0, 0, 0]);
        let err = from_bytes::<SerdeNode>(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));

        let shallow = [7, 1, 0, 0, 0, 8, 0, 0, 0, 0];
        let config = Config::default().with_max_depth(4);
        assert!(from_bytes_with::<SerdeNode>(&shallow, config).is_ok());
        let config = Config::default().with_max_depth(3);
        assert!(matches!(
            from_bytes_with::<SerdeNode>(&shallow, config),
            Err(Error::InvalidEncoding(_))
        ));
    }
}
