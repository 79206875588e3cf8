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

//! RLE / bit-packed hybrid decoding, used for definition levels, repetition
//! levels, and `RLE_DICTIONARY`/`PLAIN_DICTIONARY` indices.

use crate::errors::Result;
use crate::util::bit_util::BitReader;
use crate::util::memory::ByteBufferPtr;

/// Converts a decoded 32-bit hybrid value into a concrete output type. The
/// hybrid stream only ever carries unsigned values narrow enough to fit in
/// `u32`; this sidesteps needing the teacher's nightly specialization to
/// cover `i16` (levels), `i32`/`i64` (dictionary indices) and `u32`/`u64`.
pub trait FromHybridValue: Copy {
  fn from_hybrid(v: u32) -> Self;
}

macro_rules! impl_from_hybrid {
  ($ty:ty) => {
    impl FromHybridValue for $ty {
      fn from_hybrid(v: u32) -> Self {
        v as $ty
      }
    }
  };
}

impl_from_hybrid!(i16);
impl_from_hybrid!(i32);
impl_from_hybrid!(i64);
impl_from_hybrid!(u32);
impl_from_hybrid!(u64);

#[derive(Clone, Copy, Debug)]
enum RunState {
  /// No run currently in progress; the next `get_vlq_int()` is a run header.
  Exhausted,
  /// `left` remaining repetitions of `value`.
  Rle { value: u32, left: usize },
  /// `left` remaining individually bit-packed values.
  BitPacked { left: usize },
}

/// Decodes the RLE/bit-packed hybrid encoding described by the Parquet spec:
/// a stream of runs, each a ULEB128 header followed by either a single
/// byte-aligned repeated value (RLE run) or `8 * num_groups` individually
/// bit-packed values (bit-packed run).
pub struct RleDecoder {
  bit_width: u8,
  bit_reader: BitReader,
  state: RunState,
}

impl RleDecoder {
  pub fn new(bit_width: u8) -> Self {
    RleDecoder {
      bit_width,
      bit_reader: BitReader::new(ByteBufferPtr::new(vec![])),
      state: RunState::Exhausted,
    }
  }

  /// Rebinds this decoder to a fresh buffer of hybrid-encoded bytes,
  /// discarding any in-progress run.
  pub fn set_data(&mut self, data: ByteBufferPtr) {
    self.bit_reader.reset(data);
    self.state = RunState::Exhausted;
  }

  fn num_value_bytes(&self) -> usize {
    ((self.bit_width as usize) + 7) / 8
  }

  fn advance_run(&mut self) -> Result<bool> {
    let header = match self.bit_reader.get_vlq_int() {
      Some(h) => h,
      None => return Ok(false),
    };
    if header & 1 == 0 {
      let run_len = (header >> 1) as usize;
      let value = if self.bit_width == 0 {
        0
      } else {
        self
          .bit_reader
          .get_aligned(self.num_value_bytes())
          .ok_or_else(|| eof_err!("unexpected EOF reading RLE run value"))? as u32
      };
      self.state = RunState::Rle { value, left: run_len };
    } else {
      let num_groups = (header >> 1) as usize;
      self.state = RunState::BitPacked { left: num_groups * 8 };
    }
    Ok(true)
  }

  /// Fills `buffer` with up to `buffer.len()` decoded values, returning the
  /// number actually produced. A short result means the hybrid stream has
  /// no more runs.
  pub fn get_batch<T: FromHybridValue>(&mut self, buffer: &mut [T]) -> Result<usize> {
    let mut produced = 0;
    while produced < buffer.len() {
      if let RunState::Exhausted = self.state {
        if !self.advance_run()? {
          break;
        }
      }
      match &mut self.state {
        RunState::Rle { value, left } => {
          if *left == 0 {
            self.state = RunState::Exhausted;
            continue;
          }
          let take = std::cmp::min(*left, buffer.len() - produced);
          let v = *value;
          for slot in &mut buffer[produced..produced + take] {
            *slot = T::from_hybrid(v);
          }
          *left -= take;
          produced += take;
          if *left == 0 {
            self.state = RunState::Exhausted;
          }
        }
        RunState::BitPacked { left } => {
          if *left == 0 {
            self.state = RunState::Exhausted;
            continue;
          }
          match self.bit_reader.get_value(self.bit_width as usize) {
            Some(v) => {
              buffer[produced] = T::from_hybrid(v);
              produced += 1;
              *left -= 1;
              if *left == 0 {
                self.state = RunState::Exhausted;
              }
            }
            None => return Err(eof_err!("unexpected EOF reading bit-packed run")),
          }
        }
        RunState::Exhausted => unreachable!(),
      }
    }
    Ok(produced)
  }

  /// Like `get_batch`, but maps each decoded index through `dictionary`
  /// before writing it to `buffer`. Used for `PLAIN_DICTIONARY` /
  /// `RLE_DICTIONARY` value decoding.
  pub fn get_batch_with_dict<T: Clone + Default>(
    &mut self,
    dictionary: &[T],
    buffer: &mut [T],
    max_values: usize,
  ) -> Result<usize> {
    let n = std::cmp::min(max_values, buffer.len());
    let mut indices = vec![0u32; n];
    let read = self.get_batch(&mut indices)?;
    for i in 0..read {
      let idx = indices[i] as usize;
      buffer[i] = dictionary
        .get(idx)
        .cloned()
        .ok_or_else(|| general_err!("dictionary index {} out of bounds ({})", idx, dictionary.len()))?;
    }
    Ok(read)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rle_run_bytes(bit_width: u8, run_len: usize, value: u64) -> Vec<u8> {
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
  fn test_rle_run_round_trip() {
    let bytes = rle_run_bytes(3, 5, 6);
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = [0i32; 5];
    let read = decoder.get_batch(&mut out).unwrap();
    assert_eq!(read, 5);
    assert_eq!(out, [6, 6, 6, 6, 6]);
  }

  #[test]
  fn test_bit_packed_run_round_trip() {
    // bit_width=3, one group of 8 values: 0,1,2,3,4,5,6,7
    // header = (1 << 1) | 1 = 3
    let mut bits = BitPackWriter::new();
    for v in 0..8u32 {
      bits.push(v, 3);
    }
    let mut bytes = vec![3u8];
    bytes.extend(bits.into_bytes());

    let mut decoder = RleDecoder::new(3);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let mut out = [0i32; 8];
    let read = decoder.get_batch(&mut out).unwrap();
    assert_eq!(read, 8);
    assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7]);
  }

  #[test]
  fn test_get_batch_with_dict() {
    let bytes = rle_run_bytes(2, 3, 2);
    let mut decoder = RleDecoder::new(2);
    decoder.set_data(ByteBufferPtr::new(bytes));
    let dict = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let mut out = vec![String::new(); 3];
    let read = decoder.get_batch_with_dict(&dict, &mut out, 3).unwrap();
    assert_eq!(read, 3);
    assert_eq!(out, vec!["c".to_string(), "c".to_string(), "c".to_string()]);
  }

  /// Minimal LSB-first bit packer, used only to build test fixtures.
  struct BitPackWriter {
    bytes: Vec<u8>,
    cur: u32,
    bits_in_cur: u32,
  }

  impl BitPackWriter {
    fn new() -> Self {
      BitPackWriter { bytes: Vec::new(), cur: 0, bits_in_cur: 0 }
    }

    fn push(&mut self, value: u32, width: u32) {
      self.cur |= value << self.bits_in_cur;
      self.bits_in_cur += width;
      while self.bits_in_cur >= 8 {
        self.bytes.push((self.cur & 0xFF) as u8);
        self.cur >>= 8;
        self.bits_in_cur -= 8;
      }
    }

    fn into_bytes(mut self) -> Vec<u8> {
      if self.bits_in_cur > 0 {
        self.bytes.push((self.cur & 0xFF) as u8);
      }
      self.bytes
    }
  }
}
