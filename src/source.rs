/*!
 * Number Sources
 *
 * The distributor's view of the input: "give me the next integer, or tell me
 * the stream is over".
 *
 * End of stream is decided by a read attempt that comes back empty, never by
 * peeking for more data beforehand. A value is only handed out after the
 * read that produced it succeeded, so the last value is neither dropped nor
 * repeated.
 */

use crate::core::errors::SourceError;
use crate::core::types::WorkItem;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Pull-based stream of integers
pub trait NumberSource {
    /// Next integer, `Ok(None)` at end of stream
    fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError>;
}

impl<S: NumberSource + ?Sized> NumberSource for &mut S {
    fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError> {
        (**self).next_value()
    }
}

impl<S: NumberSource + ?Sized> NumberSource for Box<S> {
    fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError> {
        (**self).next_value()
    }
}

/// Whitespace-separated integer reader over any buffered reader
///
/// By default a malformed token ends the stream, the same way a failed
/// extraction ends a formatted read; the token is logged and everything after
/// it is ignored. With `strict(true)` it becomes `SourceError::InvalidToken`.
pub struct TokenReader<R> {
    reader: R,
    line: Vec<u8>,
    pending: VecDeque<Vec<u8>>,
    position: u64,
    strict: bool,
    exhausted: bool,
}

impl TokenReader<BufReader<File>> {
    /// Open a file as a lenient token reader
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pending: VecDeque::new(),
            position: 0,
            strict: false,
            exhausted: false,
        }
    }

    /// Treat malformed tokens as errors instead of end of stream
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Number of tokens read so far, malformed ones included
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Next raw token; bytes are not required to be UTF-8
    fn next_token(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                self.line
                    .split(|byte| byte.is_ascii_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(<[u8]>::to_vec),
            );
        }
    }
}

impl<R: BufRead> NumberSource for TokenReader<R> {
    fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(token) = self.next_token()? else {
            self.exhausted = true;
            return Ok(None);
        };
        self.position += 1;

        let parsed = std::str::from_utf8(&token)
            .ok()
            .and_then(|text| text.parse::<WorkItem>().ok());

        match parsed {
            Some(value) => Ok(Some(value)),
            None if self.strict => Err(SourceError::InvalidToken {
                token: String::from_utf8_lossy(&token).into_owned(),
                position: self.position,
            }),
            None => {
                let token = String::from_utf8_lossy(&token);
                warn!(
                    token = %token,
                    position = self.position,
                    "Malformed token ends the input stream"
                );
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

/// Adapter turning any integer iterator into a source
#[derive(Debug, Clone)]
pub struct IterSource<I>(pub I);

impl<I: Iterator<Item = WorkItem>> NumberSource for IterSource<I> {
    fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError> {
        Ok(self.0.next())
    }
}

impl<I: Iterator<Item = WorkItem>> From<I> for IterSource<I> {
    fn from(iter: I) -> Self {
        IterSource(iter)
    }
}

/// Drain a source into memory
pub fn collect_values<S: NumberSource + ?Sized>(
    source: &mut S,
) -> Result<Vec<WorkItem>, SourceError> {
    let mut values = Vec::new();
    while let Some(value) = source.next_value()? {
        values.push(value);
    }
    Ok(values)
}
