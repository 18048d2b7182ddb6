// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains functions to serialize and deserialize JSON arrays.
//!
//! The elements of the array are processed one by one, so a large compilation
//! database does not need to be kept in memory twice (once as text, once as
//! values). The format is a JSON array of objects, *not* JSON lines.

use std::io;
use std::marker::PhantomData;

use serde::Serializer;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeSeq};

/// Serialize entries from an iterator into a pretty printed JSON array.
///
/// The iterator yields `Result<T, E>`; the first error stops the serialization
/// and is returned.
pub fn serialize_result_seq<W, T, E>(
    writer: W,
    entries: impl Iterator<Item = Result<T, E>>,
) -> Result<(), E>
where
    W: io::Write,
    T: Serialize,
    E: std::error::Error + From<serde_json::Error>,
{
    let mut ser = serde_json::Serializer::pretty(writer);
    let mut seq = ser.serialize_seq(None)?;
    for entry in entries {
        seq.serialize_element(&entry?)?;
    }
    seq.end()?;

    Ok(())
}

/// Deserialize the elements of a JSON array one by one.
///
/// The iterator stops after the first error. Content after the closing
/// bracket, other than whitespace, is reported as an error.
///
/// # Note
/// Works with self-delimited element types only (objects, arrays, strings).
/// For numbers the element parser would consume the delimiter that follows.
pub fn deserialize_seq<T, R>(reader: R) -> ArrayReader<T, R>
where
    T: DeserializeOwned,
    R: io::Read,
{
    ArrayReader { reader: PeekableReader::new(reader), state: State::AtStart, _marker: PhantomData }
}

/// Iterator over the elements of a JSON array read from `R`.
pub struct ArrayReader<T, R> {
    reader: PeekableReader<R>,
    state: State,
    _marker: PhantomData<fn() -> T>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    AtStart,
    AtMiddle,
    Done,
}

impl<T, R> Iterator for ArrayReader<T, R>
where
    T: DeserializeOwned,
    R: io::Read,
{
    type Item = Result<T, serde_json::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Done {
            return None;
        }
        let result = self.step();
        match result {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(error) => {
                self.state = State::Done;
                Some(Err(error))
            }
        }
    }
}

impl<T, R> ArrayReader<T, R>
where
    T: DeserializeOwned,
    R: io::Read,
{
    fn step(&mut self) -> Result<Option<T>, serde_json::Error> {
        match self.state {
            State::AtStart => {
                self.reader.skip_byte_order_mark()?;
                if self.reader.next_skipping_ws()? != Some(b'[') {
                    return Err(serde::de::Error::custom("expected `[`"));
                }
                if self.reader.peek_skipping_ws()? == Some(b']') {
                    self.reader.consume()?;
                    return self.finish();
                }
                self.state = State::AtMiddle;
                self.element().map(Some)
            }
            State::AtMiddle => match self.reader.next_skipping_ws()? {
                Some(b',') => self.element().map(Some),
                Some(b']') => self.finish(),
                _ => Err(serde::de::Error::custom("expected `,` or `]`")),
            },
            State::Done => Ok(None),
        }
    }

    fn element(&mut self) -> Result<T, serde_json::Error> {
        serde_json::Deserializer::from_reader(&mut self.reader)
            .into_iter::<T>()
            .next()
            .unwrap_or_else(|| Err(serde::de::Error::custom("premature EOF")))
    }

    fn finish(&mut self) -> Result<Option<T>, serde_json::Error> {
        match self.reader.peek_skipping_ws()? {
            None => Ok(None),
            Some(_) => Err(serde::de::Error::custom("trailing characters after `]`")),
        }
    }
}

// A reader that allows peeking at the next byte without consuming it.
struct PeekableReader<R> {
    reader: R,
    peeked: Option<u8>,
}

impl<R: io::Read> PeekableReader<R> {
    fn new(reader: R) -> Self {
        PeekableReader { reader, peeked: None }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, serde_json::Error> {
        let mut byte = 0u8;
        loop {
            match self.reader.read(std::slice::from_mut(&mut byte)) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte)),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(serde_json::Error::io(error)),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<u8>, serde_json::Error> {
        if self.peeked.is_none() {
            self.peeked = self.read_byte()?;
        }
        Ok(self.peeked)
    }

    fn consume(&mut self) -> Result<Option<u8>, serde_json::Error> {
        match self.peeked.take() {
            Some(byte) => Ok(Some(byte)),
            None => self.read_byte(),
        }
    }

    // Some editors start UTF-8 files with the `EF BB BF` byte order mark.
    fn skip_byte_order_mark(&mut self) -> Result<(), serde_json::Error> {
        if self.peek()? != Some(0xEF) {
            return Ok(());
        }
        self.peeked = None;
        match (self.read_byte()?, self.read_byte()?) {
            (Some(0xBB), Some(0xBF)) => Ok(()),
            _ => Err(serde::de::Error::custom("invalid byte order mark")),
        }
    }

    fn peek_skipping_ws(&mut self) -> Result<Option<u8>, serde_json::Error> {
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_whitespace() {
                return Ok(Some(byte));
            }
            self.peeked = None;
        }
        Ok(None)
    }

    fn next_skipping_ws(&mut self) -> Result<Option<u8>, serde_json::Error> {
        self.peek_skipping_ws()?;
        self.consume()
    }
}

impl<R: io::Read> io::Read for PeekableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            return Ok(1);
        }
        self.reader.read(buf)
    }
}
