// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Definition/repetition level decoding: a 4-byte length-prefixed RLE/
//! bit-packed hybrid stream, bit-width derived from `max_level`.

use crate::encodings::rle::RleDecoder;
use crate::errors::Result;
use crate::util::bit_util::{num_required_bits, BitReader};
use crate::util::memory::ByteBufferPtr;

/// Decodes a single definition- or repetition-level stream for one data
/// page. A page whose `max_level` is `0` has no level stream at all: every
/// value is implicitly at level `0`.
pub struct LevelDecoder {
  bit_width: u8,
  rle_decoder: Option<RleDecoder>,
}

impl LevelDecoder {
  pub fn new(max_level: i16) -> Self {
    LevelDecoder { bit_width: num_required_bits(max_level), rle_decoder: Some(RleDecoder::new(num_required_bits(max_level))) }
  }

  /// Binds this decoder to a level stream for DATA_PAGE (v1), which is
  /// prefixed with its own 4-byte little-endian length. Returns the number
  /// of bytes consumed from `data` (the prefix plus the payload), so the
  /// caller can locate where the next section of the page starts.
  pub fn set_data(&mut self, data: ByteBufferPtr) -> Result<usize> {
    if self.bit_width == 0 {
      return Ok(0);
    }
    let mut len_reader = BitReader::new(data.clone());
    let len = len_reader
      .get_aligned(4)
      .ok_or_else(|| eof_err!("unexpected EOF reading level stream length prefix"))? as usize;
    let payload = data.range(4, len);
    self.rle_decoder.as_mut().unwrap().set_data(payload);
    Ok(4 + len)
  }

  /// Binds this decoder to a level stream for DATA_PAGE_V2, whose length is
  /// carried out-of-band in the page header rather than a 4-byte prefix.
  pub fn set_data_v2(&mut self, data: ByteBufferPtr) {
    if self.bit_width == 0 {
      return;
    }
    self.rle_decoder.as_mut().unwrap().set_data(data);
  }

  /// Fills `buffer` with up to `buffer.len()` decoded levels. If
  /// `max_level` was `0`, fills `buffer` entirely with zeros.
  pub fn get_batch(&mut self, buffer: &mut [i16]) -> Result<usize> {
    if self.bit_width == 0 {
      for slot in buffer.iter_mut() {
        *slot = 0;
      }
      return Ok(buffer.len());
    }
    self.rle_decoder.as_mut().unwrap().get_batch(buffer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn encode_rle_run(bit_width: u8, run_len: usize, value: u64) -> Vec<u8> {
    let header = (run_len as u64) << 1;
    let mut out = Vec::new();
    let mut h = header;
    loop {
      let mut byte = (h & 0x7F) as u8;
      h >>= 7;
      if h != 0 {
        byte |= 0x80;
      }
      out.push(byte);
      if h == 0 {
        break;
      }
    }
    let num_bytes = ((bit_width as usize) + 7) / 8;
    for i in 0..num_bytes {
      out.push(((value >> (8 * i)) & 0xFF) as u8);
    }
    out
  }

  #[test]
  fn test_zero_max_level_yields_zeros() {
    let mut decoder = LevelDecoder::new(0);
    let consumed = decoder.set_data(ByteBufferPtr::new(vec![])).unwrap();
    assert_eq!(consumed, 0);
    let mut buffer = [9i16; 4];
    let read = decoder.get_batch(&mut buffer).unwrap();
    assert_eq!(read, 4);
    assert_eq!(buffer, [0, 0, 0, 0]);
  }

  #[test]
  fn test_length_prefixed_stream() {
    let payload = encode_rle_run(1, 4, 1);
    let mut data = Vec::new();
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&payload);
    // trailing bytes belonging to the next section of the page
    data.extend_from_slice(&[0xAA, 0xBB]);

    let mut decoder = LevelDecoder::new(1);
    let consumed = decoder.set_data(ByteBufferPtr::new(data)).unwrap();
    assert_eq!(consumed, 4 + payload.len());

    let mut buffer = [0i16; 4];
    let read = decoder.get_batch(&mut buffer).unwrap();
    assert_eq!(read, 4);
    assert_eq!(buffer, [1, 1, 1, 1]);
  }
}
