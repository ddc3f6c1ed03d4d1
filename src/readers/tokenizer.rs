use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    CARRIAGE_RETURN, FIELD_SEPARATOR, LINE_TERMINATOR, MAX_FAST_PATH_DIGITS,
};

const POWERS_OF_TEN: [f64; MAX_FAST_PATH_DIGITS + 1] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
];

/// Lazily yields `(station, value)` pairs from a buffer of complete lines.
///
/// Lines without a `;` separator are skipped. A value that does not parse as
/// a finite decimal yields a `MalformedValue` error; callers are expected to
/// stop at the first error. The last line of the buffer may omit its
/// terminator.
pub struct RecordTokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    base_offset: u64,
}

impl<'a> RecordTokenizer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_offset(data, 0)
    }

    /// Tokenizer for a buffer that starts at `base_offset` in the input file.
    /// The offset only feeds error messages.
    pub fn with_offset(data: &'a [u8], base_offset: u64) -> Self {
        Self {
            data,
            pos: 0,
            base_offset,
        }
    }
}

impl<'a> Iterator for RecordTokenizer<'a> {
    type Item = Result<(&'a [u8], f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;

        while self.pos < data.len() {
            let line_start = self.pos;
            let rest = &data[line_start..];
            let (line, consumed) = match rest.iter().position(|&b| b == LINE_TERMINATOR) {
                Some(end) => (&rest[..end], end + 1),
                None => (rest, rest.len()),
            };
            self.pos += consumed;

            let line = match line.split_last() {
                Some((&CARRIAGE_RETURN, head)) => head,
                _ => line,
            };

            let Some(separator) = line.iter().position(|&b| b == FIELD_SEPARATOR) else {
                continue;
            };

            let station = &line[..separator];
            let raw_value = &line[separator + 1..];

            return Some(match parse_value(raw_value) {
                Some(value) => Ok((station, value)),
                None => Err(ProcessingError::MalformedValue {
                    key: String::from_utf8_lossy(station).into_owned(),
                    value: String::from_utf8_lossy(raw_value).into_owned(),
                    offset: self.base_offset + line_start as u64,
                }),
            });
        }

        None
    }
}

/// Parse a base-10 literal into a finite `f64`.
///
/// Plain `[-+]digits[.digits]` text with at most 15 significant digits takes
/// an allocation-free path that is exact: both the integer mantissa and the
/// power of ten are representable, so the single division rounds correctly.
/// Anything else goes through the standard parser.
pub fn parse_value(text: &[u8]) -> Option<f64> {
    parse_plain_decimal(text).or_else(|| {
        std::str::from_utf8(text)
            .ok()?
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    })
}

fn parse_plain_decimal(text: &[u8]) -> Option<f64> {
    let (negative, digits) = match text.split_first()? {
        (&b'-', rest) => (true, rest),
        (&b'+', rest) => (false, rest),
        _ => (false, text),
    };

    let mut mantissa: u64 = 0;
    let mut integer_digits = 0usize;
    let mut fraction_digits = 0usize;
    let mut seen_point = false;

    for &byte in digits {
        match byte {
            b'0'..=b'9' => {
                mantissa = mantissa * 10 + u64::from(byte - b'0');
                if seen_point {
                    fraction_digits += 1;
                } else {
                    integer_digits += 1;
                }
                if integer_digits + fraction_digits > MAX_FAST_PATH_DIGITS {
                    return None;
                }
            }
            b'.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }

    if integer_digits == 0 || (seen_point && fraction_digits == 0) {
        return None;
    }

    let magnitude = mantissa as f64 / POWERS_OF_TEN[fraction_digits];
    Some(if negative { -magnitude } else { magnitude })
}
