#[cfg(test)]
mod tests {
    use crate::parsers::{
        ArrayParser, LiteralParser, NumberParser, ObjectParser, ParseOptions, Step, StringParser,
    };
    use crate::{DecodeError, JsonValue};

    fn unescaping() -> ParseOptions {
        ParseOptions {
            unescape_strings: true,
            ..Default::default()
        }
    }

    fn string(s: &str) -> JsonValue {
        JsonValue::String(s.into())
    }

    // --- Tests for the string parser ---

    #[test]
    fn test_string_suspends_until_closing_quote() {
        let mut parser = StringParser::new(ParseOptions::default());
        assert_eq!(parser.resume(b"\"ab").unwrap(), Step::Suspended);
        assert_eq!(parser.resume(b"c\" rest").unwrap(), Step::Done(string("abc"), 2));
    }

    #[test]
    fn test_string_escape_split_across_chunks() {
        let mut parser = StringParser::new(ParseOptions::default());
        assert_eq!(parser.resume(b"\"a\\").unwrap(), Step::Suspended);
        assert_eq!(parser.resume(b"\"b\"").unwrap(), Step::Done(string("a\"b"), 3));
    }

    #[test]
    fn test_string_passthrough_keeps_escaped_character() {
        let mut parser = StringParser::new(ParseOptions::default());
        let step = parser.resume(br#""tab\tnew\nslash\\""#).unwrap();
        assert_eq!(step, Step::Done(string("tabtnewnslash\\"), 19));
    }

    #[test]
    fn test_string_requires_opening_quote() {
        let mut parser = StringParser::new(ParseOptions::default());
        assert!(matches!(parser.resume(b"abc\""), Err(DecodeError::MalformedString(_))));
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let mut parser = StringParser::new(ParseOptions::default());
        assert!(matches!(parser.resume(&[b'"', 0xFF, b'"']), Err(DecodeError::MalformedString(_))));
    }

    #[test]
    fn test_string_utf8_sequence_torn_across_chunks() {
        let mut parser = StringParser::new(ParseOptions::default());
        assert_eq!(parser.resume(&[b'"', 0xC3]).unwrap(), Step::Suspended);
        assert_eq!(parser.resume(&[0xA9, b'"']).unwrap(), Step::Done(string("é"), 2));
    }

    #[test]
    fn test_string_unescape_standard_escapes() {
        let mut parser = StringParser::new(unescaping());
        let input = r#""line\nbreak\t\"q\" \/ é 😀""#.as_bytes();
        let step = parser.resume(input).unwrap();
        assert_eq!(step, Step::Done(string("line\nbreak\t\"q\" / é 😀"), input.len()));
    }

    #[test]
    fn test_string_unescape_unicode_split_across_chunks() {
        let mut parser = StringParser::new(unescaping());
        assert_eq!(parser.resume(br#""\u00"#).unwrap(), Step::Suspended);
        assert_eq!(parser.resume(br#"e9""#).unwrap(), Step::Done(string("é"), 3));
    }

    #[test]
    fn test_string_unescape_rejects_unknown_escape() {
        let mut parser = StringParser::new(unescaping());
        assert!(matches!(parser.resume(br#""\x""#), Err(DecodeError::MalformedString(_))));
    }

    #[test]
    fn test_string_unescape_rejects_lone_surrogate() {
        let mut parser = StringParser::new(unescaping());
        assert!(matches!(parser.resume(br#""\ud83d""#), Err(DecodeError::MalformedString(_))));

        let mut parser = StringParser::new(unescaping());
        assert!(matches!(parser.resume(br#""\ude00""#), Err(DecodeError::MalformedString(_))));
    }

    #[test]
    fn test_string_unescape_rejects_bad_hex_digit() {
        let mut parser = StringParser::new(unescaping());
        assert!(matches!(parser.resume(br#""\u12g4""#), Err(DecodeError::MalformedString(_))));
    }

    // --- Tests for the number parser ---

    #[test]
    fn test_number_completes_on_terminator() {
        let mut parser = NumberParser::new();
        assert_eq!(parser.resume(b"12").unwrap(), Step::Suspended);
        assert_eq!(
            parser.resume(b"3.5e2,").unwrap(),
            Step::Done(JsonValue::Number(12350.0), 5)
        );
    }

    #[test]
    fn test_number_leaves_terminator_unconsumed() {
        let mut parser = NumberParser::new();
        assert_eq!(parser.resume(b"7]").unwrap(), Step::Done(JsonValue::Number(7.0), 1));
    }

    #[test]
    fn test_number_accepts_full_grammar() {
        let mut parser = NumberParser::new();
        assert_eq!(
            parser.resume(b"-0.5e-3 ").unwrap(),
            Step::Done(JsonValue::Number(-0.0005), 7)
        );
    }

    #[test]
    fn test_number_rejects_malformed_literals() {
        for input in [&b"1.2.3 "[..], b"1e ", b"1-2 ", b"01 ", b"1. ", b"-x"] {
            let mut parser = NumberParser::new();
            assert!(
                matches!(parser.resume(input), Err(DecodeError::InvalidNumber(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(input)
            );
        }
    }

    // --- Tests for the literal parser ---

    #[test]
    fn test_literal_split_across_chunks() {
        let mut parser = LiteralParser::new(b't');
        assert_eq!(parser.resume(b"tr").unwrap(), Step::Suspended);
        assert_eq!(parser.resume(b"ue]").unwrap(), Step::Done(JsonValue::Bool(true), 2));
    }

    #[test]
    fn test_literal_mismatch() {
        let mut parser = LiteralParser::new(b'n');
        assert_eq!(parser.resume(b"nul").unwrap(), Step::Suspended);
        assert_eq!(parser.resume(b"x"), Err(DecodeError::UnexpectedCharacter(b'x')));
    }

    // --- Tests for the array parser ---

    #[test]
    fn test_array_nested_child_resumes() {
        let mut parser = ArrayParser::new(ParseOptions::default(), 1);
        assert_eq!(parser.resume(b"[1, [2").unwrap(), Step::Suspended);
        let expected = JsonValue::Array(vec![
            JsonValue::from(1),
            JsonValue::Array(vec![JsonValue::from(2)]),
            string("x"),
        ]);
        assert_eq!(parser.resume(b"], \"x\"]tail").unwrap(), Step::Done(expected, 7));
    }

    #[test]
    fn test_array_empty() {
        let mut parser = ArrayParser::new(ParseOptions::default(), 1);
        assert_eq!(parser.resume(b"[ ]").unwrap(), Step::Done(JsonValue::Array(vec![]), 3));
    }

    #[test]
    fn test_array_rejects_trailing_comma() {
        let mut parser = ArrayParser::new(ParseOptions::default(), 1);
        assert!(matches!(parser.resume(b"[1,]"), Err(DecodeError::MalformedArray(_))));
    }

    #[test]
    fn test_array_rejects_missing_comma() {
        let mut parser = ArrayParser::new(ParseOptions::default(), 1);
        assert!(matches!(parser.resume(b"[1 2]"), Err(DecodeError::MalformedArray(_))));
    }

    #[test]
    fn test_array_rejects_unknown_value_opener() {
        let mut parser = ArrayParser::new(ParseOptions::default(), 1);
        assert_eq!(parser.resume(b"[true]"), Err(DecodeError::UnexpectedCharacter(b't')));
    }

    // --- Tests for the object parser ---

    #[test]
    fn test_object_key_split_across_chunks() {
        let mut parser = ObjectParser::new(ParseOptions::default(), 1);
        assert_eq!(parser.resume(b"{\"ke").unwrap(), Step::Suspended);
        assert_eq!(parser.resume(b"y\":\"va").unwrap(), Step::Suspended);
        let expected: JsonValue = [("key", string("val"))].into_iter().collect();
        assert_eq!(parser.resume(b"l\"} ").unwrap(), Step::Done(expected, 3));
    }

    #[test]
    fn test_object_empty() {
        let mut parser = ObjectParser::new(ParseOptions::default(), 1);
        let step = parser.resume(b"{}").unwrap();
        assert_eq!(step, Step::Done(JsonValue::Object(Default::default()), 2));
    }

    #[test]
    fn test_object_duplicate_key_last_write_wins() {
        let mut parser = ObjectParser::new(ParseOptions::default(), 1);
        let Step::Done(JsonValue::Object(map), _) = parser.resume(br#"{"a":1,"b":2,"a":3}"#).unwrap() else {
            panic!("object should be complete");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map["a"], JsonValue::from(3));
    }

    #[test]
    fn test_object_rejects_malformed_members() {
        for input in [
            &br#"{1:2}"#[..],
            br#"{"a" 1}"#,
            br#"{"a"}"#,
            br#"{"a":}"#,
            br#"{"a":1,}"#,
            br#"{"a":1 "b":2}"#,
        ] {
            let mut parser = ObjectParser::new(ParseOptions::default(), 1);
            assert!(
                matches!(parser.resume(input), Err(DecodeError::MalformedObject(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_object_keys_share_string_escapes() {
        let mut parser = ObjectParser::new(ParseOptions::default(), 1);
        let Step::Done(value, _) = parser.resume(br#"{"a\"b": "c\"d"}"#).unwrap() else {
            panic!("object should be complete");
        };
        assert_eq!(value.get("a\"b"), Some(&string("c\"d")));
    }
}
