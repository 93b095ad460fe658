//! Varint length-delimited framing.
//!
//! Every record in a demonstration file is written as a protobuf-style
//! varint32 length followed by that many payload bytes. [`FrameReader`]
//! walks a fully loaded buffer and yields the payloads in order.

use crate::error::DemoError;

/// Absolute byte offset where the parameter record's frame begins.
///
/// The recorder reserves a fixed region at the head of every file for the
/// meta record and rewrites it in place once recording finishes, so the
/// meta frame's declared length does not describe the space it occupies on
/// disk. Readers must jump to this offset after the first frame instead of
/// advancing by the declared length. This is a compatibility requirement of
/// the on-disk format and must not be derived from the meta record.
pub const META_RECORD_END: usize = 33;

/// Longest legal encoding of a varint32.
const MAX_VARINT32_BYTES: usize = 5;

/// One length-delimited record payload borrowed from the input buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Zero-based position of the frame in the stream.
    pub index: usize,
    /// Byte offset of the frame's varint length prefix.
    pub offset: usize,
    /// The frame body.
    pub payload: &'a [u8],
}

/// Decode a varint32 starting at `offset`.
///
/// Returns the value and the number of bytes it occupied.
///
/// # Examples
///
/// ```
/// use mimic_demo::frame::decode_varint32;
///
/// assert_eq!(decode_varint32(&[0x96, 0x01], 0).unwrap(), (150, 2));
/// assert_eq!(decode_varint32(&[0xff, 0x05], 1).unwrap(), (5, 1));
/// ```
pub fn decode_varint32(buf: &[u8], offset: usize) -> Result<(u32, usize), DemoError> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT32_BYTES {
        let byte = *buf
            .get(offset + i)
            .ok_or(DemoError::TruncatedVarint { offset })?;
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_| DemoError::MalformedVarint { offset })?;
            return Ok((value, i + 1));
        }
    }
    Err(DemoError::MalformedVarint { offset })
}

/// Append `value` as a varint32.
pub fn encode_varint32(buf: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Append `payload` as one length-delimited frame.
pub fn write_frame(buf: &mut Vec<u8>, payload: &[u8]) {
    encode_varint32(buf, payload.len() as u32);
    buf.extend_from_slice(payload);
}

/// Iterator over the frames of an in-memory buffer.
///
/// Yields `Err` once and then stops if the buffer is truncated or a
/// length prefix is malformed. Ends cleanly only when the cursor lands
/// exactly on the end of the buffer.
pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
    index: usize,
    first_frame_end: Option<usize>,
    done: bool,
}

impl<'a> FrameReader<'a> {
    /// Read plain length-delimited frames from offset 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            index: 0,
            first_frame_end: None,
            done: false,
        }
    }

    /// Read a demonstration file: after frame 0 the cursor jumps to
    /// [`META_RECORD_END`].
    pub fn demonstration(buf: &'a [u8]) -> Self {
        Self {
            first_frame_end: Some(META_RECORD_END),
            ..Self::new(buf)
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> usize {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame<'a>, DemoError> {
        let offset = self.pos;
        let (declared, header_len) = decode_varint32(self.buf, offset)?;
        let declared = declared as usize;
        let start = offset + header_len;
        let available = self.buf.len() - start;
        if declared > available {
            return Err(DemoError::TruncatedFrame {
                index: self.index,
                offset,
                declared,
                available,
            });
        }
        let payload = &self.buf[start..start + declared];

        self.pos = match self.first_frame_end {
            Some(end) if self.index == 0 => {
                if end > self.buf.len() {
                    return Err(DemoError::TruncatedFrame {
                        index: 0,
                        offset,
                        declared: end,
                        available: self.buf.len(),
                    });
                }
                end
            }
            _ => start + declared,
        };

        let frame = Frame {
            index: self.index,
            offset,
            payload,
        };
        self.index += 1;
        Ok(frame)
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Result<Frame<'a>, DemoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos == self.buf.len() {
            self.done = true;
            return None;
        }
        match self.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
