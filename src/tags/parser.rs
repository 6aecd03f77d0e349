//! Lazy tag stream parser
//!
//! Converts alternating (code line, value line) pairs into typed [`Tag`]s,
//! one forward pass, no restart. Consecutive coordinate-component codes
//! `(x, x + 10[, x + 20])` are recombined into point tags.

use crate::error::{DxfError, Result};
use crate::tags::code::is_point_base_code;
use crate::tags::tag::{Tag, TagValue};
use crate::types::{Vector2, Vector3};
use encoding_rs::Encoding;
use std::io::{Cursor, Read};

/// Lazy parser over a raw pair stream.
///
/// Single forward pass; once consumed the parser is exhausted, the caller
/// re-opens the underlying source to restart.
pub struct TagParser<R: Read> {
    reader: R,
    line_number: usize,
    peeked: Option<(i32, String, usize)>,
    /// Non-UTF8 fallback encoding. `None` means Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl TagParser<Cursor<Vec<u8>>> {
    /// Create a parser over an in-memory string
    pub fn from_str(text: &str) -> Self {
        TagParser::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: Read> TagParser<R> {
    /// Create a new parser over a byte source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            peeked: None,
            encoding: None,
        }
    }

    /// Set the fallback encoding for non-UTF8 input
    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }

    /// Read a single line, handling non-UTF8 bytes gracefully.
    /// Uses the configured encoding for fallback, or Latin-1 if none set.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();

        loop {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    if bytes.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    bytes.push(byte[0]);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.line_number += 1;

        let line = match String::from_utf8(bytes.clone()) {
            Ok(s) => s,
            Err(_) => {
                if let Some(enc) = self.encoding {
                    let (decoded, _, _) = enc.decode(&bytes);
                    decoded.into_owned()
                } else {
                    // Latin-1 is a 1:1 mapping of bytes 0-255 to Unicode code points
                    bytes.iter().map(|&b| b as char).collect()
                }
            }
        };

        Ok(Some(line.trim().to_string()))
    }

    /// Read one raw (code, value text) pair
    fn read_pair(&mut self) -> Result<Option<(i32, String, usize)>> {
        if let Some(pair) = self.peeked.take() {
            return Ok(Some(pair));
        }

        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };
        let code_line_number = self.line_number;

        let code = code_line.parse::<i32>().map_err(|_| {
            DxfError::Parse(format!(
                "invalid group code at line {}: '{}'",
                code_line_number, code_line
            ))
        })?;

        let value_line = match self.read_line()? {
            Some(line) => line,
            None => {
                return Err(DxfError::Parse(format!(
                    "unexpected EOF after code {} at line {}",
                    code, code_line_number
                )))
            }
        };

        Ok(Some((code, value_line, self.line_number)))
    }

    fn push_back(&mut self, pair: (i32, String, usize)) {
        self.peeked = Some(pair);
    }

    /// Read the next typed tag, recombining point components.
    ///
    /// An x-component code must be followed by its y component; the z
    /// component is optional. A dangling x component is a partial
    /// composite and fails with [`DxfError::MalformedTag`].
    pub fn read_tag(&mut self) -> Result<Option<Tag>> {
        let (code, raw, line) = match self.read_pair()? {
            Some(pair) => pair,
            None => return Ok(None),
        };

        if !is_point_base_code(code) {
            return Ok(Some(Tag::from_pair(code, &raw, line)?));
        }

        let x = match Tag::from_pair(code, &raw, line)?.value {
            TagValue::Double(v) => v,
            _ => unreachable!("point base codes coerce to double"),
        };

        // y component is mandatory
        let y = match self.read_pair()? {
            Some((y_code, y_raw, y_line)) if y_code == code + 10 => {
                match Tag::from_pair(y_code, &y_raw, y_line)?.value {
                    TagValue::Double(v) => v,
                    _ => unreachable!("coordinate components coerce to double"),
                }
            }
            Some(other) => {
                self.push_back(other);
                return Err(DxfError::MalformedTag {
                    line,
                    code,
                    expected: "point components",
                    value: raw,
                });
            }
            None => {
                return Err(DxfError::MalformedTag {
                    line,
                    code,
                    expected: "point components",
                    value: raw,
                })
            }
        };

        // z component is optional
        match self.read_pair()? {
            Some((z_code, z_raw, z_line)) if z_code == code + 20 => {
                let z = match Tag::from_pair(z_code, &z_raw, z_line)?.value {
                    TagValue::Double(v) => v,
                    _ => unreachable!("coordinate components coerce to double"),
                };
                Ok(Some(Tag::point3(code, Vector3::new(x, y, z))))
            }
            Some(other) => {
                self.push_back(other);
                Ok(Some(Tag::point2(code, Vector2::new(x, y))))
            }
            None => Ok(Some(Tag::point2(code, Vector2::new(x, y)))),
        }
    }
}

impl<R: Read> Iterator for TagParser<R> {
    type Item = Result<Tag>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_tag().transpose()
    }
}

/// Parse an entire in-memory pair stream into a tag list
pub fn parse_tags(text: &str) -> Result<Vec<Tag>> {
    TagParser::from_str(text).collect()
}
