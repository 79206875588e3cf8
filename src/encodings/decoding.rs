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

//! Value decoders for PLAIN and (PLAIN|RLE)_DICTIONARY encoded pages.
//!
//! Each physical type gets its own non-default `Decoder` impl below, rather
//! than one generic body shared through specialization: that needs a
//! nightly-only feature this crate doesn't depend on.

use std::marker::PhantomData;

use crate::basic::Encoding;
use crate::data_type::{
  BoolType, ByteArray, ByteArrayType, DataType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type,
  Int64Type, Int96, Int96Type,
};
use crate::encodings::rle::RleDecoder;
use crate::errors::Result;
use crate::schema::types::ColumnDescPtr;
use crate::util::bit_util::BitReader;
use crate::util::memory::ByteBufferPtr;

/// A Parquet decoder for the data type `T`.
pub trait Decoder<T: DataType> {
  /// Sets the data to decode to be `data`, which should contain `num_values`
  /// of values to decode.
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()>;

  /// Consumes values from this decoder and writes the results to `buffer`.
  /// Returns the actual number of values decoded, which is `buffer.len()`
  /// unless fewer values remain.
  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize>;

  /// Number of values left in this decoder stream.
  fn values_left(&self) -> usize;

  /// Encoding this decoder implements.
  fn encoding(&self) -> Encoding;
}

/// Builds a decoder for `encoding` over the column described by `descr`.
/// `RLE`, `BIT_PACKED` and the `DELTA_*` encodings are out of scope for this
/// decoder and always return `NYI`. Dictionary-encoded pages are handled
/// separately through `DictDecoder`, constructed directly by the column
/// reader once it has a decoded dictionary page to hand it.
pub fn get_decoder<T: DataType>(descr: ColumnDescPtr, encoding: Encoding) -> Result<Box<dyn Decoder<T>>>
where
  PlainDecoder<T>: Decoder<T>,
{
  match encoding {
    Encoding::PLAIN => Ok(Box::new(PlainDecoder::<T>::new(descr.type_length()))),
    Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
      Err(general_err!("dictionary-encoded pages are constructed through DictDecoder, not get_decoder"))
    }
    Encoding::RLE => Err(nyi_err!("RLE value decoding is only defined for DATA_PAGE_V2, which is out of scope")),
    Encoding::BIT_PACKED => Err(nyi_err!("standalone BIT_PACKED value encoding is out of scope")),
    Encoding::DELTA_BINARY_PACKED | Encoding::DELTA_LENGTH_BYTE_ARRAY | Encoding::DELTA_BYTE_ARRAY => {
      Err(nyi_err!("{} value encoding is out of scope", encoding))
    }
  }
}

// ----------------------------------------------------------------------
// PLAIN decoding

/// Decodes PLAIN-encoded values. Values are stored back to back; numeric
/// types are little-endian, BOOLEAN is bit-packed LSB-first, and
/// BYTE_ARRAY/FIXED_LEN_BYTE_ARRAY carry their own length framing.
pub struct PlainDecoder<T: DataType> {
  data: ByteBufferPtr,
  num_values: usize,
  start: usize,
  type_length: i32,
  bit_reader: Option<BitReader>,
  _phantom: PhantomData<T>,
}

impl<T: DataType> PlainDecoder<T> {
  pub fn new(type_length: i32) -> Self {
    PlainDecoder {
      data: ByteBufferPtr::new(vec![]),
      num_values: 0,
      start: 0,
      type_length,
      bit_reader: None,
      _phantom: PhantomData,
    }
  }
}

macro_rules! impl_plain_decoder_fixed_width {
  ($data_type:ty, $size:expr, $from_bytes:expr) => {
    impl Decoder<$data_type> for PlainDecoder<$data_type> {
      fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
        self.data = data;
        self.start = 0;
        self.num_values = num_values;
        Ok(())
      }

      fn get(&mut self, buffer: &mut [<$data_type as DataType>::T]) -> Result<usize> {
        let num_values = std::cmp::min(buffer.len(), self.num_values);
        let bytes = self.data.as_ref();
        for slot in buffer.iter_mut().take(num_values) {
          if self.start + $size > bytes.len() {
            return Err(eof_err!("not enough bytes to decode a PLAIN value"));
          }
          let mut arr = [0u8; $size];
          arr.copy_from_slice(&bytes[self.start..self.start + $size]);
          *slot = $from_bytes(arr);
          self.start += $size;
        }
        self.num_values -= num_values;
        Ok(num_values)
      }

      fn values_left(&self) -> usize {
        self.num_values
      }

      fn encoding(&self) -> Encoding {
        Encoding::PLAIN
      }
    }
  };
}

impl_plain_decoder_fixed_width!(Int32Type, 4, i32::from_le_bytes);
impl_plain_decoder_fixed_width!(Int64Type, 8, i64::from_le_bytes);
impl_plain_decoder_fixed_width!(FloatType, 4, f32::from_le_bytes);
impl_plain_decoder_fixed_width!(DoubleType, 8, f64::from_le_bytes);

impl Decoder<BoolType> for PlainDecoder<BoolType> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.num_values = num_values;
    self.bit_reader = Some(BitReader::new(data));
    Ok(())
  }

  fn get(&mut self, buffer: &mut [bool]) -> Result<usize> {
    let num_values = std::cmp::min(buffer.len(), self.num_values);
    let bit_reader = self.bit_reader.as_mut().expect("set_data must be called first");
    let mut raw = vec![0u32; num_values];
    let read = bit_reader.get_batch(&mut raw, 1);
    for i in 0..read {
      buffer[i] = raw[i] != 0;
    }
    self.num_values -= read;
    Ok(read)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<Int96Type> for PlainDecoder<Int96Type> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.data = data;
    self.start = 0;
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [Int96]) -> Result<usize> {
    let num_values = std::cmp::min(buffer.len(), self.num_values);
    let bytes = self.data.as_ref();
    for slot in buffer.iter_mut().take(num_values) {
      if self.start + 12 > bytes.len() {
        return Err(eof_err!("not enough bytes to decode an INT96 value"));
      }
      let mut words = Vec::with_capacity(3);
      for w in 0..3 {
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&bytes[self.start + w * 4..self.start + w * 4 + 4]);
        words.push(u32::from_le_bytes(arr));
      }
      let mut v = Int96::new();
      v.set_data(words);
      *slot = v;
      self.start += 12;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<ByteArrayType> for PlainDecoder<ByteArrayType> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.data = data;
    self.start = 0;
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [ByteArray]) -> Result<usize> {
    let num_values = std::cmp::min(buffer.len(), self.num_values);
    for slot in buffer.iter_mut().take(num_values) {
      let bytes = self.data.as_ref();
      if self.start + 4 > bytes.len() {
        return Err(eof_err!("not enough bytes to decode a BYTE_ARRAY length prefix"));
      }
      let mut len_arr = [0u8; 4];
      len_arr.copy_from_slice(&bytes[self.start..self.start + 4]);
      let len = u32::from_le_bytes(len_arr) as usize;
      self.start += 4;
      if self.start + len > bytes.len() {
        return Err(eof_err!("not enough bytes to decode a BYTE_ARRAY value of length {}", len));
      }
      let mut value = ByteArray::new();
      value.set_data(self.data.range(self.start, len));
      *slot = value;
      self.start += len;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<FixedLenByteArrayType> for PlainDecoder<FixedLenByteArrayType> {
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    self.data = data;
    self.start = 0;
    self.num_values = num_values;
    Ok(())
  }

  fn get(&mut self, buffer: &mut [ByteArray]) -> Result<usize> {
    assert!(self.type_length > 0, "FIXED_LEN_BYTE_ARRAY requires a positive type_length");
    let num_values = std::cmp::min(buffer.len(), self.num_values);
    let len = self.type_length as usize;
    for slot in buffer.iter_mut().take(num_values) {
      let bytes = self.data.as_ref();
      if self.start + len > bytes.len() {
        return Err(eof_err!("not enough bytes to decode a FIXED_LEN_BYTE_ARRAY value of length {}", len));
      }
      let mut value = ByteArray::new();
      value.set_data(self.data.range(self.start, len));
      *slot = value;
      self.start += len;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

// ----------------------------------------------------------------------
// RLE_DICTIONARY / PLAIN_DICTIONARY decoding

/// Decodes dictionary-indexed pages: a leading bit-width byte followed by
/// an RLE/bit-packed hybrid stream of indices into a dictionary decoded
/// from the column chunk's dictionary page.
pub struct DictDecoder<T: DataType> {
  dictionary: Vec<T::T>,
  has_dictionary: bool,
  rle_decoder: Option<RleDecoder>,
  num_values: usize,
}

impl<T: DataType> DictDecoder<T> {
  pub fn new() -> Self {
    DictDecoder { dictionary: vec![], has_dictionary: false, rle_decoder: None, num_values: 0 }
  }

  /// Decodes every value `decoder` has left and stores it as the
  /// dictionary. `decoder` should be a `PlainDecoder` freshly bound to the
  /// dictionary page's payload.
  pub fn set_dict(&mut self, mut decoder: Box<dyn Decoder<T>>) -> Result<()>
  where
    T::T: Default,
  {
    let num_values = decoder.values_left();
    self.dictionary.resize(num_values, T::T::default());
    decoder.get(&mut self.dictionary)?;
    self.has_dictionary = true;
    Ok(())
  }
}

impl<T: DataType> Decoder<T> for DictDecoder<T>
where
  T::T: Default,
{
  fn set_data(&mut self, data: ByteBufferPtr, num_values: usize) -> Result<()> {
    if data.is_empty() {
      return Err(eof_err!("empty dictionary-indices page"));
    }
    let bit_width = data.as_ref()[0];
    let mut rle_decoder = RleDecoder::new(bit_width);
    rle_decoder.set_data(data.start_from(1));
    self.num_values = num_values;
    self.rle_decoder = Some(rle_decoder);
    Ok(())
  }

  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    assert!(self.has_dictionary, "must call set_dict() before decoding");
    let rle = self.rle_decoder.as_mut().expect("set_data must be called first");
    let num_values = std::cmp::min(buffer.len(), self.num_values);
    let read = rle.get_batch_with_dict(&self.dictionary[..], &mut buffer[..num_values], num_values)?;
    self.num_values -= read;
    Ok(read)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::RLE_DICTIONARY
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::{Repetition, Type as PhysicalType};
  use crate::schema::types::{ColumnDescriptor, ColumnPath, SchemaType};
  use std::rc::Rc;

  fn int32_descr() -> ColumnDescPtr {
    let node = SchemaType::primitive("value", Repetition::REQUIRED, PhysicalType::INT32, 0);
    Rc::new(ColumnDescriptor::new(Rc::new(node), 0, 0, ColumnPath::new(vec!["value".to_string()])))
  }

  #[test]
  fn test_plain_decoder_int32() {
    let mut decoder = get_decoder::<Int32Type>(int32_descr(), Encoding::PLAIN).unwrap();
    let data = ByteBufferPtr::new(vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]);
    decoder.set_data(data, 3).unwrap();
    let mut buffer = [0i32; 3];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, 3);
    assert_eq!(buffer, [1, 2, 3]);
    assert_eq!(decoder.values_left(), 0);
  }

  #[test]
  fn test_plain_decoder_bool() {
    let mut decoder: PlainDecoder<BoolType> = PlainDecoder::new(0);
    // bits LSB-first: 1,0,1,1 => byte = 0b0000_1101
    decoder.set_data(ByteBufferPtr::new(vec![0b0000_1101]), 4).unwrap();
    let mut buffer = [false; 4];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, 4);
    assert_eq!(buffer, [true, false, true, true]);
  }

  #[test]
  fn test_plain_decoder_byte_array() {
    let mut decoder: PlainDecoder<ByteArrayType> = PlainDecoder::new(0);
    let mut data = Vec::new();
    data.extend_from_slice(&3u32.to_le_bytes());
    data.extend_from_slice(b"abc");
    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(b"xy");
    decoder.set_data(ByteBufferPtr::new(data), 2).unwrap();
    let mut buffer = [ByteArray::new(), ByteArray::new()];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, 2);
    assert_eq!(buffer[0].data(), b"abc");
    assert_eq!(buffer[1].data(), b"xy");
  }

  #[test]
  fn test_plain_decoder_fixed_len_byte_array() {
    let mut decoder: PlainDecoder<FixedLenByteArrayType> = PlainDecoder::new(4);
    let mut data = Vec::new();
    data.extend_from_slice(b"bird");
    data.extend_from_slice(b"come");
    decoder.set_data(ByteBufferPtr::new(data), 2).unwrap();
    let mut buffer = [ByteArray::new(), ByteArray::new()];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, 2);
    assert_eq!(buffer[0].data(), b"bird");
    assert_eq!(buffer[1].data(), b"come");
  }

  #[test]
  fn test_unsupported_encoding_is_nyi() {
    let result = get_decoder::<Int32Type>(int32_descr(), Encoding::DELTA_BINARY_PACKED);
    assert!(result.is_err());
  }

  #[test]
  fn test_dictionary_decoder_round_trip() {
    let mut dict_decoder: PlainDecoder<Int32Type> = PlainDecoder::new(0);
    dict_decoder.set_data(ByteBufferPtr::new(vec![10, 0, 0, 0, 20, 0, 0, 0, 30, 0, 0, 0]), 3).unwrap();

    let mut decoder: DictDecoder<Int32Type> = DictDecoder::new();
    decoder.set_dict(Box::new(dict_decoder)).unwrap();

    // bit_width=2 byte, then one RLE run of 3 repetitions of index 1 (value 20)
    let mut indices = vec![2u8];
    let header = (3u64) << 1;
    indices.push(header as u8);
    indices.push(1); // index 1, 1 byte since bit_width=2 -> ceil(2/8)=1 byte
    decoder.set_data(ByteBufferPtr::new(indices), 3).unwrap();

    let mut buffer = [0i32; 3];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, 3);
    assert_eq!(buffer, [20, 20, 20]);
  }

  #[test]
  fn test_plain_decoder_int32_round_trip_random() {
    let values: Vec<i32> = crate::util::test_common::random_numbers(50);
    let mut data = Vec::with_capacity(values.len() * 4);
    for v in &values {
      data.extend_from_slice(&v.to_le_bytes());
    }

    let mut decoder = get_decoder::<Int32Type>(int32_descr(), Encoding::PLAIN).unwrap();
    decoder.set_data(ByteBufferPtr::new(data), values.len()).unwrap();
    let mut buffer = vec![0i32; values.len()];
    let read = decoder.get(&mut buffer).unwrap();
    assert_eq!(read, values.len());
    assert_eq!(buffer, values);
  }
}
