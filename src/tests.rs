use std::io::Cursor;

use bytes::Bytes;

use super::*;

fn decoder(data: &'static [u8]) -> Decoder<SliceSource> {
    Decoder::new(SliceSource::new(data))
}

fn decode_err(data: &'static [u8]) -> BencodeError {
    decoder(data).read().unwrap_err()
}

fn bytes(s: &'static str) -> Value {
    Value::Bytes(Bytes::from_static(s.as_bytes()))
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i56789e").unwrap(), Value::Integer(56789));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        Value::Integer(i64::MIN)
    );
}

#[test]
fn test_decode_integer_invalid() {
    assert!(matches!(
        decode_err(b"i-0e"),
        BencodeError::NonCanonicalInteger { position: 2, start: 0 }
    ));
    assert!(matches!(
        decode_err(b"i03e"),
        BencodeError::NonCanonicalInteger { position: 1, start: 0 }
    ));
    assert!(matches!(
        decode_err(b"ie"),
        BencodeError::Format {
            position: 1,
            start: 0,
            expected: Expected::DigitOrMinus,
            found: b'e'
        }
    ));
    assert!(matches!(
        decode_err(b"i-e"),
        BencodeError::Format {
            position: 2,
            expected: Expected::Digit,
            ..
        }
    ));
    assert!(matches!(
        decode_err(b"i1-2e"),
        BencodeError::Format {
            position: 2,
            expected: Expected::DigitOrEnd,
            found: b'-',
            ..
        }
    ));
    assert!(matches!(
        decode_err(b"i9223372036854775808e"),
        BencodeError::IntegerOverflow { position: 19, start: 0 }
    ));
}

#[test]
fn test_decode_non_canonical_integers_when_allowed() {
    let options = DecodeOptions::default().with_canonical_integers(false);
    let mut decoder = Decoder::with_options(SliceSource::new(&b"i03ei-0ei-007e"[..]), options);
    let values: Vec<Value> = decoder
        .read_all()
        .unwrap()
        .into_iter()
        .map(|d| d.value)
        .collect();
    assert_eq!(
        values,
        vec![Value::Integer(3), Value::Integer(0), Value::Integer(-7)]
    );
}

#[test]
fn test_decode_bytes() {
    assert_eq!(decode(b"4:spam").unwrap(), bytes("spam"));
    assert_eq!(decode(b"0:").unwrap(), bytes(""));

    let binary = decode(b"3:\xff\x00\xfe").unwrap();
    assert_eq!(binary.as_bytes().unwrap().as_ref(), b"\xff\x00\xfe");
    assert_eq!(binary.as_str(), None);
}

#[test]
fn test_decode_bytes_invalid_length() {
    assert!(matches!(
        decode_err(b"4x:spam"),
        BencodeError::Format {
            position: 1,
            expected: Expected::DigitOrColon,
            found: b'x',
            ..
        }
    ));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spam4:eggse").unwrap();
    assert_eq!(result, Value::from(vec![bytes("spam"), bytes("eggs")]));
    assert_eq!(result.count(), Ok(2));
    assert_eq!(decode(b"le").unwrap(), Value::List(List::new()));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    assert_eq!(result.count(), Ok(2));
    assert_eq!(result.get(b"cow").unwrap(), Some(&bytes("moo")));
    assert_eq!(result.get(b"spam").unwrap(), Some(&bytes("eggs")));
    assert_eq!(encode(&result).unwrap(), b"d3:cow3:moo4:spam4:eggse");
}

#[test]
fn test_unsorted_dict_is_sorted_on_encode() {
    let result = decode(b"d4:spam4:eggs3:cow3:mooe").unwrap();
    assert_eq!(encode(&result).unwrap(), b"d3:cow3:moo4:spam4:eggse");

    // "3:eggs" ends after "egg", leaving "s" where a key should start.
    assert!(matches!(
        decode_err(b"d4:spam3:eggs3:cow3:mooe"),
        BencodeError::Format {
            position: 12,
            start: 0,
            expected: Expected::Key,
            found: b's'
        }
    ));
}

#[test]
fn test_dict_key_must_be_string() {
    let err = decode_err(b"di1e3:bare");
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(err.start(), Some(0));
    assert!(matches!(
        err,
        BencodeError::Format {
            position: 1,
            start: 0,
            expected: Expected::Key,
            found: b'i'
        }
    ));

    assert!(matches!(
        decode_err(b"dddi1e"),
        BencodeError::Format {
            position: 1,
            expected: Expected::Key,
            ..
        }
    ));
}

#[test]
fn test_dict_missing_value() {
    assert!(matches!(
        decode_err(b"d1:ae"),
        BencodeError::Format {
            position: 4,
            start: 0,
            expected: Expected::DictValue,
            found: b'e'
        }
    ));
}

#[test]
fn test_junk_inside_container() {
    let err = decode_err(&[b'd', 0x7f]);
    assert_eq!(err.kind(), ErrorKind::Format);

    assert!(matches!(
        decode_err(b"l4:spamxe"),
        BencodeError::Format {
            position: 7,
            start: 0,
            expected: Expected::ValueOrEnd,
            found: b'x'
        }
    ));
}

#[test]
fn test_lone_terminator_is_not_a_value() {
    assert!(matches!(
        decode_err(b"e"),
        BencodeError::Format {
            position: 0,
            expected: Expected::Value,
            found: b'e',
            ..
        }
    ));
    assert!(matches!(
        decode(b"i1ee").unwrap_err(),
        BencodeError::TrailingData { position: 3 }
    ));

    let mut decoder = decoder(b"i1ee");
    assert!(decoder.read().unwrap().is_some());
    assert!(matches!(
        decoder.read().unwrap_err(),
        BencodeError::Format {
            position: 3,
            found: b'e',
            ..
        }
    ));
}

#[test]
fn test_truncated_input() {
    let cases: &[(&'static [u8], u64, u64, Expected)] = &[
        (b"i", 1, 0, Expected::DigitOrMinus),
        (b"i12", 3, 0, Expected::DigitOrEnd),
        (b"4:sp", 2, 0, Expected::StringBytes),
        (b"12", 2, 0, Expected::DigitOrColon),
        (b"l4:spam", 7, 0, Expected::ValueOrEnd),
        (b"d", 1, 0, Expected::Key),
        (b"d1:a", 4, 0, Expected::DictValue),
        (b"d1:ai1e", 7, 0, Expected::Key),
        (b"ld1:ai1", 7, 5, Expected::DigitOrEnd),
    ];
    for (input, position, start, expected) in cases {
        let err = Decoder::new(SliceSource::copy_from(input)).read().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput, "{:?}", input);
        match err {
            BencodeError::Truncated {
                position: p,
                start: s,
                expected: e,
            } => {
                assert_eq!((p, s, e), (*position, *start, *expected), "{:?}", input);
            }
            other => panic!("expected truncation for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_empty_input_is_clean_end() {
    let mut decoder = decoder(b"");
    assert!(decoder.read().unwrap().is_none());
    let err = decoder.read().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert!(matches!(err, BencodeError::State(StateError::EndOfInput)));
}

#[test]
fn test_decode_convenience_errors() {
    assert_eq!(decode(b"").unwrap_err().kind(), ErrorKind::TruncatedInput);
    assert!(matches!(
        decode(b"i42eextra").unwrap_err(),
        BencodeError::TrailingData { position: 4 }
    ));
}

#[test]
fn test_read_multiple_values() {
    let mut decoder = decoder(b"i1e4:spamle");
    let all = decoder.read_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].value, Value::Integer(1));
    assert_eq!(all[1].value, bytes("spam"));
    assert_eq!(all[2].value, Value::List(List::new()));
    assert!(matches!(
        decoder.read(),
        Err(BencodeError::State(StateError::EndOfInput))
    ));

    assert_eq!(decode_all(b"").unwrap(), Vec::<Value>::new());
    assert_eq!(decode_all(b"i1ei2e").unwrap().len(), 2);
}

#[test]
fn test_failed_decoder_is_unusable() {
    let mut decoder = decoder(b"xi1e");
    assert_eq!(decoder.read().unwrap_err().kind(), ErrorKind::Format);
    assert!(matches!(
        decoder.read(),
        Err(BencodeError::State(StateError::Failed))
    ));
}

#[test]
fn test_closed_decoder_keeps_positions() {
    let mut decoder = decoder(b"i1ei2e");
    let first = decoder.read().unwrap().unwrap();
    decoder.close();
    assert!(decoder.is_closed());
    assert!(decoder.source().is_none());
    assert!(matches!(
        decoder.read(),
        Err(BencodeError::State(StateError::Closed))
    ));
    assert_eq!(decoder.position(), 3);
    assert_eq!(decoder.positions().range(first.id), Some(Range::new(0, 3)));
}

#[test]
fn test_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);

    let err = decode(&deep).unwrap_err();
    assert!(matches!(err, BencodeError::NestingTooDeep { limit: DEFAULT_MAX_DEPTH, .. }));

    let options = DecodeOptions::default().with_max_depth(128);
    let mut decoder = Decoder::with_options(SliceSource::copy_from(&deep), options);
    assert!(decoder.read().unwrap().is_some());
}

#[test]
fn test_duplicate_keys() {
    let last_wins = decode(b"d1:ai1e1:ai2ee").unwrap();
    assert_eq!(last_wins.get(b"a").unwrap(), Some(&Value::Integer(2)));
    assert_eq!(last_wins.count(), Ok(1));

    let options = DecodeOptions::default().with_duplicate_keys(DuplicateKeys::Reject);
    let mut decoder = Decoder::with_options(SliceSource::new(&b"d1:ai1e1:ai2ee"[..]), options);
    assert!(matches!(
        decoder.read().unwrap_err(),
        BencodeError::DuplicateKey { position: 7, start: 0 }
    ));
}

#[test]
fn test_string_length_limit() {
    let options = DecodeOptions::default().with_max_string_len(4);
    let mut decoder = Decoder::with_options(SliceSource::new(&b"l4:spam5:helloe"[..]), options);
    assert!(matches!(
        decoder.read().unwrap_err(),
        BencodeError::LengthExceedsLimit {
            position: 7,
            start: 7,
            len: 5,
            max: 4
        }
    ));
}

#[test]
fn test_decode_positions() {
    let mut decoder = decoder(b"l4:spami42ee");
    let list = decoder.read().unwrap().unwrap();
    let table = decoder.positions();

    let entries: Vec<(Kind, Range)> = table.iter().map(|(_, k, r)| (k, r)).collect();
    assert_eq!(
        entries,
        vec![
            (Kind::Bytes, Range::new(1, 7)),
            (Kind::Integer, Range::new(7, 11)),
            (Kind::List, Range::new(0, 12)),
        ]
    );

    let spam = table.child(list.id, 0).unwrap();
    assert_eq!(table.range(spam), Some(Range::new(1, 7)));
    assert_eq!(table.kind(spam), Some(Kind::Bytes));
    assert_eq!(table.child(list.id, 2), None);
    assert_eq!(table.child(spam, 0), None);
}

#[test]
fn test_equal_values_have_distinct_positions() {
    let mut decoder = decoder(b"l1:a1:ae");
    let list = decoder.read().unwrap().unwrap();
    let table = decoder.positions();

    let first = table.child(list.id, 0).unwrap();
    let second = table.child(list.id, 1).unwrap();
    assert_ne!(first, second);
    assert_eq!(table.range(first), Some(Range::new(1, 4)));
    assert_eq!(table.range(second), Some(Range::new(4, 7)));
}

#[test]
fn test_dict_key_positions() {
    let mut decoder = decoder(b"d4:spam4:eggs3:cow3:mooe");
    let dict = decoder.read().unwrap().unwrap();
    let table = decoder.positions();

    let cow_key = table.key_of(dict.id, b"cow").unwrap();
    let cow_value = table.value_of(dict.id, b"cow").unwrap();
    assert_eq!(table.range(cow_key), Some(Range::new(13, 18)));
    assert_eq!(table.range(cow_value), Some(Range::new(18, 23)));
    assert_eq!(table.value_of(dict.id, b"missing"), None);
    assert_eq!(table.len(), 5);
}

#[test]
fn test_separate_decoders_have_independent_tables() {
    let mut a = decoder(b"i7e");
    let b = decoder(b"  ");
    let decoded = a.read().unwrap().unwrap();
    assert_eq!(a.positions().range(decoded.id), Some(Range::new(0, 3)));
    assert!(b.positions().is_empty());
    assert!(b.positions().range(decoded.id).is_none());
}

#[test]
fn test_range_len() {
    let range = Range::new(3, 9);
    assert_eq!(range.len(), 6);
    assert!(range.contains(3));
    assert!(!range.contains(9));
    assert_eq!(range.to_string(), "[3, 9)");

    let inverted = Range::new(5, 3);
    assert_eq!(inverted.len(), 0);
    assert!(inverted.is_empty());
    assert!(!inverted.contains(4));
}

#[test]
fn test_reader_source() {
    let mut decoder = Decoder::new(ReaderSource::new(Cursor::new(b"d3:cow3:mooei5e".to_vec())));
    let dict = decoder.read().unwrap().unwrap();
    assert_eq!(dict.value.get(b"cow").unwrap(), Some(&bytes("moo")));
    assert_eq!(decoder.position(), 12);
    assert_eq!(decoder.read().unwrap().unwrap().value, Value::Integer(5));
    assert!(decoder.read().unwrap().is_none());

    let mut truncated = Decoder::new(ReaderSource::new(Cursor::new(b"5:ab".to_vec())));
    assert!(matches!(
        truncated.read().unwrap_err(),
        BencodeError::Truncated {
            position: 4,
            start: 0,
            expected: Expected::StringBytes
        }
    ));
}

struct BrokenReader;

impl std::io::Read for BrokenReader {
    fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk on fire"))
    }
}

#[test]
fn test_transport_error_is_propagated() {
    let mut decoder = Decoder::new(ReaderSource::new(BrokenReader));
    let err = decoder.read().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.position(), Some(0));
    assert_eq!(err.start(), Some(0));
}

#[test]
fn test_transport_error_inside_value_carries_start() {
    use std::io::Read;

    let reader = Cursor::new(b"i1el4:sp".to_vec()).chain(BrokenReader);
    let mut decoder = Decoder::new(ReaderSource::new(reader));
    assert_eq!(decoder.read().unwrap().unwrap().value, Value::Integer(1));

    let err = decoder.read().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.position(), Some(6));
    assert_eq!(err.start(), Some(4));

    let mut buf = [0u8; 6];
    let mut encoder = Encoder::new(BufferSink::new(&mut buf));
    encoder.write(&Value::Integer(1)).unwrap();
    let err = encoder.write(&Value::from(vec![bytes("spam")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.position(), Some(6));
    assert_eq!(err.start(), Some(4));
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(56789)).unwrap(), b"i56789e");
    assert_eq!(encode(&Value::Integer(-42)).unwrap(), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)).unwrap(), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(encode(&bytes("spam")).unwrap(), b"4:spam");
    assert_eq!(encode(&bytes("")).unwrap(), b"0:");
}

#[test]
fn test_encode_list() {
    let list = Value::from(vec![bytes("spam"), Value::Integer(42)]);
    assert_eq!(encode(&list).unwrap(), b"l4:spami42ee");
}

#[test]
fn test_encode_dict_sorted() {
    let mut dict = Dict::new();
    dict.insert("zebra", 1);
    dict.insert("apple", 2);
    dict.insert("mango", 3);
    assert_eq!(
        encode(&Value::Dict(dict)).unwrap(),
        b"d5:applei2e5:mangoi3e5:zebrai1ee"
    );
}

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for bencode roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode(original).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, original);
}

#[test]
fn test_nested_structures() {
    let data = b"d4:listl4:spami42eee";
    let decoded = decode(data).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, data);
}

#[test]
fn test_built_document_roundtrip() {
    let doc: Value = Dict::new()
        .with("title", "Hello World!")
        .with("number", 56789)
        .with(
            "entries",
            List::new()
                .with("Entry 1")
                .with(1234)
                .with(Dict::new().with("x", 100).with("y", 200))
                .with("Entry 4"),
        )
        .into();

    let encoded = encode(&doc).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded, doc);
    assert_eq!(decoded.get(b"title").unwrap().unwrap().as_str(), Some("Hello World!"));
    assert_eq!(decoded.get(b"number").unwrap().unwrap().as_integer(), Ok(56789));
    let x = decoded
        .get(b"entries")
        .unwrap()
        .unwrap()
        .at(2)
        .unwrap()
        .get(b"x")
        .unwrap()
        .unwrap();
    assert_eq!(x.as_integer(), Ok(100));
}

#[test]
fn test_encoder_positions() {
    let doc: Value = Dict::new()
        .with("spam", List::new().with(1).with(2))
        .with("cow", "moo")
        .into();

    let mut encoder = Encoder::new(MemorySink::new());
    let id = encoder.write(&doc).unwrap();
    let table = encoder.positions();

    // d 3:cow 3:moo 4:spam l i1e i2e e e
    assert_eq!(table.range(id), Some(Range::new(0, 26)));
    let cow_key = table.key_of(id, b"cow").unwrap();
    assert_eq!(table.range(cow_key), Some(Range::new(1, 6)));
    let spam = table.value_of(id, b"spam").unwrap();
    assert_eq!(table.range(spam), Some(Range::new(17, 25)));
    let two = table.child(spam, 1).unwrap();
    assert_eq!(table.range(two), Some(Range::new(21, 24)));
    assert_eq!(table.kind(two), Some(Kind::Integer));

    let second = encoder.write(&Value::Integer(7)).unwrap();
    assert_eq!(encoder.positions().range(second), Some(Range::new(26, 29)));

    let out = encoder.into_inner().unwrap().into_bytes();
    assert_eq!(out.as_ref(), b"d3:cow3:moo4:spamli1ei2eeei7e");
}

#[test]
fn test_encoder_sink_failure() {
    let mut buf = [0u8; 8];
    let mut encoder = Encoder::new(BufferSink::new(&mut buf));
    encoder.write(&Value::Integer(1)).unwrap();

    let err = encoder.write(&bytes("too long for the buffer")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.position(), Some(6));
    assert_eq!(err.start(), Some(3));
    assert!(matches!(
        encoder.write(&Value::Integer(2)),
        Err(BencodeError::State(StateError::Failed))
    ));
    assert_eq!(encoder.sink().unwrap().written(), b"i1e23:");
}

#[test]
fn test_encoder_close() {
    let mut encoder = Encoder::new(WriterSink::new(Vec::new()));
    let id = encoder.write(&bytes("spam")).unwrap();
    encoder.close().unwrap();
    assert!(encoder.is_closed());
    assert!(encoder.sink().is_none());
    assert!(matches!(
        encoder.write(&Value::Integer(1)),
        Err(BencodeError::State(StateError::Closed))
    ));
    assert_eq!(encoder.position(), 6);
    assert_eq!(encoder.positions().range(id), Some(Range::new(0, 6)));
    encoder.close().unwrap();
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    let written = encode_to(&Value::from(vec![Value::Integer(1)]), &mut out).unwrap();
    assert_eq!(written, 5);
    assert_eq!(out, b"li1ee");
    assert_eq!(
        encode_all(&[Value::Integer(1), bytes("a")]).unwrap(),
        b"i1e1:a"
    );
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert!(value.is_integer());
    assert_eq!(value.as_integer(), Ok(42));
    assert_eq!(
        value.as_bytes(),
        Err(StateError::WrongVariant {
            expected: Kind::Bytes,
            found: Kind::Integer
        })
    );
    assert_eq!(
        value.count(),
        Err(StateError::NotContainer {
            found: Kind::Integer
        })
    );
    assert!(value.get(b"a").is_err());
    assert!(value.at(0).is_err());
    assert!(value.contains(b"a").is_err());

    let value = bytes("test");
    assert!(value.is_bytes());
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_err());

    let value = Value::List(List::new());
    assert!(value.is_list());
    assert!(value.as_list().is_ok());
    assert!(value.as_dict().is_err());
    assert!(value.clone().into_dict().is_err());

    let value = Value::Dict(Dict::new());
    assert!(value.is_dict());
    assert_eq!(value.kind(), Kind::Dict);
    assert_eq!(value.contains(b"a"), Ok(false));
}

#[test]
fn test_list_mutation() {
    let mut list = List::new().with(1).with(2).with(3);

    list.set(1, Some(Value::Integer(20))).unwrap();
    assert_eq!(list, List::new().with(1).with(20).with(3));

    list.set(0, None).unwrap();
    assert_eq!(list, List::new().with(20).with(3));

    list.insert(0, None).unwrap();
    list.append(None);
    assert_eq!(list.len(), 2);

    list.insert(2, Some(Value::Integer(4))).unwrap();
    list.append(Some(Value::Integer(5)));
    assert_eq!(list, List::new().with(20).with(3).with(4).with(5));

    assert_eq!(
        list.set(9, None),
        Err(StateError::IndexOutOfRange { index: 9, len: 4 })
    );
    assert!(list.insert(9, Some(Value::Integer(0))).is_err());
    assert_eq!(list.remove(0), Ok(Value::Integer(20)));
}

#[test]
fn test_dict_mutation() {
    let mut value: Value = Dict::new().with("a", 1).into();
    let dict = value.as_dict_mut().unwrap();

    assert_eq!(dict.set("b", Some(Value::Integer(2))), None);
    assert_eq!(dict.set("a", None), Some(Value::Integer(1)));
    assert!(!dict.contains(b"a"));
    assert_eq!(dict.get(b"a"), None);
    assert_eq!(dict.set("missing", None), None);

    assert_eq!(value.count(), Ok(1));
    assert_eq!(value.contains(b"b"), Ok(true));
}

#[test]
fn test_printer_placeholders() {
    let doc = decode(b"d5:itemsli1e4:spamle0:dee3:key5:valuee").unwrap();
    let text = Printer::new().render(&doc, None);
    assert_eq!(
        text,
        "{\n  \"items\": [\n    1\n    <4 bytes>\n    []\n    <0 bytes>\n    {}\n  ]\n  \"key\": <5 bytes>\n}\n"
    );
    assert_eq!(doc.to_string(), text);
}

#[test]
fn test_printer_prefix_indent_and_escaping() {
    let doc = decode(b"l3:a\x00bi7ee").unwrap();
    let text = Printer::new()
        .with_prefix("> ")
        .with_indent("\t")
        .dump_strings(true)
        .render(&doc, None);
    assert_eq!(text, "> [\n> \t\"a\\x00b\"\n> \t7\n> ]\n");
}

#[test]
fn test_printer_with_encoder_positions() {
    let mut encoder = Encoder::new(MemorySink::new());
    let value = Value::from(vec![Value::Integer(1)]);
    let id = encoder.write(&value).unwrap();
    let text = Printer::new()
        .with_positions(encoder.positions())
        .render(&value, Some(id));
    assert_eq!(text, "[  @[0, 5)\n  1  @[1, 4)\n]\n");
}

struct Depth {
    current: usize,
    max: usize,
}

impl Visitor for Depth {
    type Error = StateError;

    fn visit_integer(&mut self, _: i64) -> Result<(), StateError> {
        Ok(())
    }

    fn visit_bytes(&mut self, _: &Bytes) -> Result<(), StateError> {
        Ok(())
    }

    fn visit_list(&mut self, list: &List) -> Result<(), StateError> {
        self.current += 1;
        self.max = self.max.max(self.current);
        for item in list {
            item.accept(self)?;
        }
        self.current -= 1;
        Ok(())
    }

    fn visit_dict(&mut self, dict: &Dict) -> Result<(), StateError> {
        self.current += 1;
        self.max = self.max.max(self.current);
        for (_, value) in dict {
            value.accept(self)?;
        }
        self.current -= 1;
        Ok(())
    }
}

#[test]
fn test_visitor_dispatch() {
    let doc = decode(b"d1:ali1eld1:bleeeee").unwrap();
    let mut depth = Depth { current: 0, max: 0 };
    doc.accept(&mut depth).unwrap();
    assert_eq!(depth.max, 5);
}
