//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Negotiate About Window Size
//!

use crate::consts::{self, option};
use crate::{NegotiationError, NegotiationResult};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Exact length of a client's reply to `IAC DO NAWS`:
/// `IAC WILL NAWS IAC SB NAWS <u16 cols> <u16 rows> IAC SE`.
pub const NAWS_REPLY_LEN: usize = 12;

/// Terminal dimensions reported through the NAWS option.
///
/// The window size is encoded on the wire as four bytes in big-endian format:
/// 2 bytes for columns followed by 2 bytes for rows.
///
/// # Example
/// ```
/// use blinken_telnetcodec::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.cols, 80);
/// assert_eq!(size.rows, 24);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified columns and rows.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Encodes the four NAWS payload bytes into `dst`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> std::io::Result<usize> {
        self.write(&mut dst.writer())
    }

    /// Writes the columns followed by the rows as big-endian `u16` values.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes the four NAWS payload bytes from `src`.
    ///
    /// # Errors
    /// Returns `MalformedWindowSize` if fewer than 4 bytes remain.
    pub fn decode<T: Buf>(src: &mut T) -> NegotiationResult<WindowSize> {
        // WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW
        if src.remaining() < 4 {
            return Err(NegotiationError::MalformedWindowSize(
                src.chunk().to_vec(),
            ));
        }
        Ok(WindowSize {
            cols: src.get_u16(),
            rows: src.get_u16(),
        })
    }

    /// Builds the full 12 byte reply a well-behaved client sends after `IAC DO NAWS`.
    pub fn to_reply(&self) -> Vec<u8> {
        let mut reply = Vec::with_capacity(NAWS_REPLY_LEN);
        reply.extend_from_slice(&[consts::IAC, consts::WILL, option::NAWS]);
        reply.extend_from_slice(&[consts::IAC, consts::SB, option::NAWS]);
        reply.put_u16(self.cols);
        reply.put_u16(self.rows);
        reply.extend_from_slice(&[consts::IAC, consts::SE]);
        reply
    }

    /// Parses a client's reply to `IAC DO NAWS`.
    ///
    /// Every fixed byte is checked; the reply must be exactly
    /// [`NAWS_REPLY_LEN`] bytes and report a non-zero size.
    pub fn parse_reply(reply: &[u8]) -> NegotiationResult<WindowSize> {
        if reply.len() != NAWS_REPLY_LEN
            || reply[..3] != [consts::IAC, consts::WILL, option::NAWS]
            || reply[3..6] != [consts::IAC, consts::SB, option::NAWS]
            || reply[10..] != [consts::IAC, consts::SE]
        {
            return Err(NegotiationError::MalformedWindowSize(reply.to_vec()));
        }
        let size = WindowSize::decode(&mut &reply[6..10])?;
        if size.cols == 0 || size.rows == 0 {
            return Err(NegotiationError::EmptyWindowSize {
                cols: size.cols,
                rows: size.rows,
            });
        }
        Ok(size)
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal, used whenever NAWS negotiation fails.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload() {
        let mut buf = &[0x00, 0x50, 0x00, 0x18][..];
        let size = WindowSize::decode(&mut buf).unwrap();
        assert_eq!(size, WindowSize::new(80, 24));
    }

    #[test]
    fn test_decode_short_payload() {
        let mut buf = &[0x00, 0x50, 0x00][..];
        assert!(WindowSize::decode(&mut buf).is_err());
    }

    #[test]
    fn test_encode_payload() {
        let mut buf = Vec::new();
        assert_eq!(WindowSize::new(300, 2).encode(&mut buf).unwrap(), 4);
        assert_eq!(buf, vec![0x01, 0x2C, 0x00, 0x02]);
    }

    #[test]
    fn test_parse_reply() {
        let reply = [255, 251, 31, 255, 250, 31, 0, 200, 0, 60, 255, 240];
        assert_eq!(
            WindowSize::parse_reply(&reply).unwrap(),
            WindowSize::new(200, 60)
        );
        assert_eq!(WindowSize::new(200, 60).to_reply(), reply.to_vec());
    }

    #[test]
    fn test_parse_reply_rejects_bad_shapes() {
        let good = WindowSize::new(120, 40).to_reply();

        assert!(WindowSize::parse_reply(&good[..11]).is_err());

        let mut long = good.clone();
        long.push(0);
        assert!(WindowSize::parse_reply(&long).is_err());

        for index in [0, 1, 2, 3, 4, 5, 10, 11] {
            let mut bad = good.clone();
            bad[index] ^= 0x01;
            assert!(
                WindowSize::parse_reply(&bad).is_err(),
                "corrupting byte {index} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_reply_rejects_empty_size() {
        let reply = WindowSize::new(0, 24).to_reply();
        assert!(matches!(
            WindowSize::parse_reply(&reply),
            Err(NegotiationError::EmptyWindowSize { cols: 0, rows: 24 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(WindowSize::default().to_string(), "(80,24)");
    }
}
