#[cfg(test)]
mod tests {
    use rand::Rng;

    use crate::{Decoder, JsonValue};

    const DOCUMENTS: &[&str] = &[
        r#"{"a":[1,2,{"b":"c"}]}"#,
        r#"{ "name": "Alice", "age": 30, "roles": ["user", "admin"], "tags": {} }"#,
        r#"[1.5e3, 42, 7.25, [[], [[]]], "q\"uote", "back\\slash"]"#,
        r#"{"emoji":"😀é","nested":{"deep":{"deeper":[9, 8, "ü"]}}}"#,
        r#"{"first": 1} [2, 3] "fourth" 55"#,
    ];

    fn decode_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<JsonValue> {
        let mut decoder = Decoder::new();
        for chunk in chunks {
            decoder.feed(chunk).unwrap();
        }
        decoder.finish().unwrap();
        decoder.drain().collect()
    }

    fn decode_whole(document: &str) -> Vec<JsonValue> {
        decode_chunks([document.as_bytes()])
    }

    // --- Tests for chunk-boundary independence ---

    #[test]
    fn test_split_at_every_offset() {
        for document in DOCUMENTS {
            let whole = decode_whole(document);
            let bytes = document.as_bytes();
            for split in 0..=bytes.len() {
                let (head, tail) = bytes.split_at(split);
                assert_eq!(
                    decode_chunks([head, tail]),
                    whole,
                    "split at {} of {}",
                    split,
                    document
                );
            }
        }
    }

    #[test]
    fn test_one_byte_chunks() {
        for document in DOCUMENTS {
            let whole = decode_whole(document);
            assert_eq!(decode_chunks(document.as_bytes().chunks(1)), whole, "{}", document);
        }
    }

    #[test]
    fn test_random_chunking() {
        let mut rng = rand::thread_rng();
        for document in DOCUMENTS {
            let whole = decode_whole(document);
            let bytes = document.as_bytes();
            for _ in 0..50 {
                let mut chunks = Vec::new();
                let mut start = 0;
                while start < bytes.len() {
                    let len = rng.gen_range(1..=8).min(bytes.len() - start);
                    chunks.push(&bytes[start..start + len]);
                    start += len;
                }
                assert_eq!(decode_chunks(chunks.iter().copied()), whole, "{}", document);
            }
        }
    }

    #[test]
    fn test_nested_example_split_everywhere() {
        let expected: JsonValue = [(
            "a",
            JsonValue::Array(vec![
                1.into(),
                2.into(),
                [("b", JsonValue::from("c"))].into_iter().collect(),
            ]),
        )]
        .into_iter()
        .collect();
        let bytes = br#"{"a":[1,2,{"b":"c"}]}"#;
        for split in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(split);
            assert_eq!(decode_chunks([head, tail]), vec![expected.clone()]);
        }
    }

    // --- Tests for serialize / decode round trips ---

    fn sample_values() -> Vec<JsonValue> {
        vec![
            JsonValue::from("plain"),
            JsonValue::from("with \"quotes\" and \\ backslashes"),
            JsonValue::from("unicode: ñ 漢字 🚀"),
            JsonValue::from(""),
            JsonValue::from(1),
            JsonValue::from(2.5),
            JsonValue::from(123456789),
            JsonValue::from(1e300),
            JsonValue::Array(vec![]),
            JsonValue::Array(vec![1.into(), "two".into(), JsonValue::Array(vec![3.into()])]),
            [
                ("id", JsonValue::from(7)),
                ("name", JsonValue::from("Bob \"the\" builder")),
                (
                    "items",
                    JsonValue::Array(vec![[("k", JsonValue::from(9.75))].into_iter().collect()]),
                ),
                ("empty", JsonValue::Object(Default::default())),
            ]
            .into_iter()
            .collect(),
        ]
    }

    #[test]
    fn test_round_trip_through_serializer() {
        for value in sample_values() {
            let text = value.to_json_string().unwrap();
            assert_eq!(decode_whole(&text), vec![value.clone()], "{}", text);
        }
    }

    #[test]
    fn test_round_trip_of_concatenated_serializations() {
        let values = sample_values();
        let mut stream = Vec::new();
        for value in &values {
            stream.extend_from_slice(value.to_json_string().unwrap().as_bytes());
            stream.push(b'\n');
        }
        assert_eq!(decode_chunks(stream.chunks(5)), values);
    }

    #[test]
    fn test_non_finite_numbers_serialize_as_null() {
        assert_eq!(JsonValue::from(f64::NAN).to_json_string().unwrap(), "null");
        assert_eq!(JsonValue::from(f64::NEG_INFINITY).to_json_string().unwrap(), "null");

        let decoded = decode_whole("[1e400, 2]");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].to_json_string().unwrap(), "[null,2]");
    }
}
