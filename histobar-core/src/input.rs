use histobar_common::{HistobarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

pub const PROMPT_COUNT: &str = "Please input the number of data elements:";
pub const PROMPT_DATA: &str = "Please input the data elements:";
pub const PROMPT_MIN: &str = "Please enter the minimum data value for a bucket:";
pub const PROMPT_MAX: &str = "Please enter the maximum data value for a bucket:";
pub const PROMPT_BUCKETS: &str = "Please enter the number of buckets:";

// upfront reservation cap; a larger declared count still grows the vec as values arrive
const MAX_PREALLOC: usize = 1 << 20;

/// Whitespace-separated tokens pulled from a line reader on demand, so an
/// interactive user sees each prompt before having to type the next value.
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: VecDeque::new() }
    }

    fn next_token(&mut self, what: &'static str) -> Result<String> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(tok);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(HistobarError::UnexpectedEof { what });
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
    }

    pub fn read_i64(&mut self, what: &'static str) -> Result<i64> {
        let tok = self.next_token(what)?;
        tok.parse().map_err(|_| HistobarError::MalformedInput { what, token: tok })
    }

    pub fn read_f64(&mut self, what: &'static str) -> Result<f64> {
        let tok = self.next_token(what)?;
        match tok.parse::<f64>() {
            Ok(v) if !v.is_nan() => Ok(v),
            _ => Err(HistobarError::MalformedInput { what, token: tok }),
        }
    }

    /// Non-negative element count.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let tok = self.next_token(what)?;
        tok.parse().map_err(|_| HistobarError::MalformedInput { what, token: tok })
    }
}

/// Everything the console protocol collects before bucketing starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    pub data: Vec<f64>,
    pub min: i64,
    pub max: i64,
    pub bucket_count: i64,
}

fn prompt<W: Write>(out: &mut Option<&mut W>, text: &str) -> Result<()> {
    if let Some(w) = out.as_mut() {
        writeln!(w, "{text}")?;
        w.flush()?;
    }
    Ok(())
}

/// Runs the prompt sequence. Prompts are written only when `prompts` is set.
pub fn read_session<R: BufRead, W: Write>(reader: R, mut prompts: Option<&mut W>) -> Result<SessionInput> {
    let mut tokens = TokenReader::new(reader);
    prompt(&mut prompts, PROMPT_COUNT)?;
    let n = tokens.read_count("number of data elements")?;
    prompt(&mut prompts, PROMPT_DATA)?;
    let mut data = Vec::with_capacity(n.min(MAX_PREALLOC));
    for _ in 0..n {
        data.push(tokens.read_f64("data element")?);
    }
    prompt(&mut prompts, PROMPT_MIN)?;
    let min = tokens.read_i64("minimum bucket value")?;
    prompt(&mut prompts, PROMPT_MAX)?;
    let max = tokens.read_i64("maximum bucket value")?;
    prompt(&mut prompts, PROMPT_BUCKETS)?;
    let bucket_count = tokens.read_i64("number of buckets")?;
    log::debug!("read {} data elements, range [{min}, {max}], {bucket_count} buckets", data.len());
    Ok(SessionInput { data, min, max, bucket_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(s: &str) -> Result<SessionInput> {
        read_session::<_, Vec<u8>>(Cursor::new(s), None)
    }

    #[test]
    fn values_on_one_line_or_many() {
        let a = read("3\n1.5 2 3.25\n0\n10\n2\n").unwrap();
        let b = read("3 1.5\n2\n3.25 0 10 2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.data, vec![1.5, 2.0, 3.25]);
        assert_eq!((a.min, a.max, a.bucket_count), (0, 10, 2));
    }

    #[test]
    fn zero_elements() {
        let s = read("0\n0\n10\n2\n").unwrap();
        assert!(s.data.is_empty());
    }

    #[test]
    fn negative_count_is_malformed() {
        let err = read("-1\n0\n10\n2\n").unwrap_err();
        assert!(matches!(err, HistobarError::MalformedInput { what: "number of data elements", .. }));
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let err = read("2\n1.0 abc\n0\n10\n2\n").unwrap_err();
        match err {
            HistobarError::MalformedInput { what, token } => {
                assert_eq!(what, "data element");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nan_is_malformed() {
        assert!(matches!(read("1\nNaN\n0\n10\n2\n"), Err(HistobarError::MalformedInput { .. })));
    }

    #[test]
    fn fractional_bound_is_malformed() {
        assert!(matches!(read("1\n1\n0.5\n10\n2\n"), Err(HistobarError::MalformedInput { what: "minimum bucket value", .. })));
    }

    #[test]
    fn short_input_is_eof() {
        let err = read("3\n1 2\n").unwrap_err();
        assert!(matches!(err, HistobarError::UnexpectedEof { what: "data element" }));
    }

    #[test]
    fn huge_declared_count_hits_eof_without_reserving_it() {
        let err = read("99999999999999\n1 2\n").unwrap_err();
        assert!(matches!(err, HistobarError::UnexpectedEof { what: "data element" }));
    }

    #[test]
    fn prompts_in_order() {
        let mut out = Vec::new();
        read_session(Cursor::new("1\n4\n0\n8\n2\n"), Some(&mut out)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![PROMPT_COUNT, PROMPT_DATA, PROMPT_MIN, PROMPT_MAX, PROMPT_BUCKETS]);
    }
}
