use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::model::Entry;

/// Parse dotenv entries from UTF-8 text.
///
/// Blank lines and full-line `#` comments contribute nothing. Every other
/// line must contain a separator: the earliest `=` or `:` splits key from
/// value, and both halves are trimmed. Lines without a separator are
/// rejected. Duplicate keys keep the last occurrence.
pub fn parse_str(input: &str) -> Result<Vec<Entry>, Error> {
    parse_with_source(input, None).map_err(Error::from)
}

/// Parse dotenv entries from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<Vec<Entry>, Error> {
    let text = std::str::from_utf8(input)?;
    parse_str(text)
}

/// Parse dotenv entries from a buffered reader.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<Vec<Entry>, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

pub(crate) fn parse_with_source(
    input: &str,
    source: Option<&Path>,
) -> Result<Vec<Entry>, ParseError> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut by_key = HashMap::<String, usize>::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_num = idx as u32 + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(sep_idx) = line.find(['=', ':']) else {
            return Err(ParseError::new(line_num, ParseErrorKind::MissingSeparator));
        };

        let key = line[..sep_idx].trim();
        if key.is_empty() {
            return Err(ParseError::new(line_num, ParseErrorKind::MissingKey));
        }
        let value = line[sep_idx + 1..].trim();

        let entry = Entry {
            key: key.to_owned(),
            value: value.to_owned(),
            source: source.map(Path::to_path_buf),
            line: line_num,
        };

        if let Some(existing) = by_key.get(entry.key.as_str()).copied() {
            entries[existing] = entry;
        } else {
            by_key.insert(entry.key.clone(), entries.len());
            entries.push(entry);
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_values_and_comments() {
        let input = "A=1\nB = 2\n# skip\n\nC=hello\nD=\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0].key, "A");
        assert_eq!(parsed[0].value, "1");
        assert_eq!(parsed[1].key, "B");
        assert_eq!(parsed[1].value, "2");
        assert_eq!(parsed[2].key, "C");
        assert_eq!(parsed[2].value, "hello");
        assert_eq!(parsed[3].key, "D");
        assert_eq!(parsed[3].value, "");
    }

    #[test]
    fn parses_colon_separator() {
        let input = "ENV_DIR: root\nENV_PORT: 8080\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].key, "ENV_DIR");
        assert_eq!(parsed[0].value, "root");
        assert_eq!(parsed[1].key, "ENV_PORT");
        assert_eq!(parsed[1].value, "8080");
    }

    #[test]
    fn earliest_separator_wins() {
        let input = "URL=http://localhost:8080\nMAP: a=b\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed[0].key, "URL");
        assert_eq!(parsed[0].value, "http://localhost:8080");
        assert_eq!(parsed[1].key, "MAP");
        assert_eq!(parsed[1].value, "a=b");
    }

    #[test]
    fn trims_keys_and_values() {
        let input = "  KEY  =  padded value  \n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].key, "KEY");
        assert_eq!(parsed[0].value, "padded value");
    }

    #[test]
    fn duplicate_keys_keep_last() {
        let input = "A=1\nA=2\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].key, "A");
        assert_eq!(parsed[0].value, "2");
    }

    #[test]
    fn inline_hash_is_part_of_the_value() {
        let input = "C=hello # not a comment\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed[0].value, "hello # not a comment");
    }

    #[test]
    fn parses_unicode_values() {
        let input = "GREETING=こんにちは\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].value, "こんにちは");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let input = "A=1\r\nB: 2\r\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].value, "1");
        assert_eq!(parsed[1].value, "2");
    }

    #[test]
    fn rejects_line_without_separator() {
        let input = "A=1\nBAD LINE\n";
        let err = parse_str(input).expect_err("expected parse error");
        match err {
            Error::Parse(parse_err) => {
                assert_eq!(parse_err.kind, ParseErrorKind::MissingSeparator);
                assert_eq!(parse_err.line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_key() {
        for input in ["=value\n", ": value\n"] {
            let err = parse_str(input).expect_err("expected parse error");
            match err {
                Error::Parse(parse_err) => {
                    assert_eq!(parse_err.kind, ParseErrorKind::MissingKey);
                    assert_eq!(parse_err.line, 1);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_invalid_utf8_bytes() {
        let err = parse_bytes(&[b'A', b'=', 0x80, b'\n']).expect_err("expected encoding error");
        match err {
            Error::InvalidEncoding(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_is_pure() {
        let input = "A=1\nB: 2\n# comment\nA=3\n";
        let first = parse_str(input).expect("parse should succeed");
        let second = parse_str(input).expect("parse should succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn entries_record_line_numbers() {
        let input = "# comment\nA=1\n\nB: 2\n";
        let parsed = parse_str(input).expect("parse should succeed");

        assert_eq!(parsed[0].line, 2);
        assert_eq!(parsed[1].line, 4);
    }

    #[test]
    fn parse_reader_matches_parse_str() {
        let input = "A=1\nB: 2\n";
        let from_reader =
            parse_reader(std::io::Cursor::new(input)).expect("parse should succeed");
        let from_str = parse_str(input).expect("parse should succeed");
        assert_eq!(from_reader, from_str);
    }
}
