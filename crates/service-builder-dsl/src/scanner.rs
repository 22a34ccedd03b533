use std::io::{self, BufReader, Read};

use crate::error::{Position, ScanError};

/// The most recent `read`, kept so it can be pushed back once.
#[derive(Debug, Clone, Copy)]
struct LastRead {
    rune: Option<char>,
    before: Position,
    after: Position,
}

/// Rune-at-a-time reader over a UTF-8 byte stream.
///
/// `read` returns `Ok(None)` at end of input, and keeps returning it on
/// every later call. One rune can be pushed back with `unread`, and only
/// directly after a `read`.
pub struct Scanner<R> {
    reader: BufReader<R>,
    position: Position,
    last: Option<LastRead>,
    pushed_back: bool,
    at_eof: bool,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            position: Position::START,
            last: None,
            pushed_back: false,
            at_eof: false,
        }
    }

    /// The position after the last rune consumed.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Reads the next rune, or `None` once the input is exhausted.
    pub fn read(&mut self) -> Result<Option<char>, ScanError> {
        if self.pushed_back {
            if let Some(last) = self.last {
                self.pushed_back = false;
                self.position = last.after;
                return Ok(last.rune);
            }
        }

        let before = self.position;
        let rune = self.decode_rune()?;
        if let Some(ch) = rune {
            self.position = before.advance(ch);
        }
        self.last = Some(LastRead {
            rune,
            before,
            after: self.position,
        });
        Ok(rune)
    }

    /// Pushes the last rune read back onto the stream.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidUnread` when nothing has been read yet or
    /// the previous call was also an `unread`.
    pub fn unread(&mut self) -> Result<(), ScanError> {
        match self.last {
            Some(last) if !self.pushed_back => {
                self.pushed_back = true;
                self.position = last.before;
                Ok(())
            }
            _ => Err(ScanError::InvalidUnread {
                position: self.position,
            }),
        }
    }

    fn decode_rune(&mut self) -> Result<Option<char>, ScanError> {
        if self.at_eof {
            return Ok(None);
        }
        let Some(first) = self.read_byte()? else {
            self.at_eof = true;
            return Ok(None);
        };

        let width = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.invalid_utf8()),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Err(self.invalid_utf8()),
            }
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.invalid_utf8())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ScanError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::io(&e, self.position)),
            }
        }
    }

    fn invalid_utf8(&self) -> ScanError {
        ScanError::InvalidUtf8 {
            position: self.position,
        }
    }
}
