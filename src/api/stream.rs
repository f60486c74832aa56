use super::models::GameDto;
use crate::error::AppError;
use std::io::{BufRead, Lines};

/// Forward-only reader over an NDJSON game export.
///
/// Each call to `next` pulls one more line from the underlying reader, so
/// games are decoded as the response body arrives. Consumed games cannot be
/// revisited; a new export request is needed to start over.
pub struct GameStream<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> GameStream<R> {
    pub fn new(reader: R) -> Self {
        GameStream {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for GameStream<R> {
    type Item = Result<GameDto, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(AppError::IoError(e))),
            };
            self.line_no += 1;

            // keep-alive newlines
            if line.trim().is_empty() {
                continue;
            }

            return Some(serde_json::from_str(&line).map_err(|e| {
                AppError::JsonError(format!("game on line {}: {}", self.line_no, e))
            }));
        }
    }
}
