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

//! Reads one primitive column's worth of values (plus its definition and
//! repetition levels) out of a sequence of pages.

use std::collections::HashMap;

use crate::basic::{Encoding, Type};
use crate::column::page::{Page, PageReader};
use crate::data_type::{BoolType, ByteArrayType, DataType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type, Int64Type, Int96Type};
use crate::encodings::decoding::{get_decoder, DictDecoder, Decoder, PlainDecoder};
use crate::encodings::levels::LevelDecoder;
use crate::errors::Result;
use crate::schema::types::ColumnDescPtr;

/// A column reader for one of the 8 physical types. Obtained from
/// `get_column_reader` and narrowed back to a concrete `ColumnReaderImpl<T>`
/// with `get_typed_column_reader`.
pub enum ColumnReader<'a> {
  BoolColumnReader(ColumnReaderImpl<'a, BoolType>),
  Int32ColumnReader(ColumnReaderImpl<'a, Int32Type>),
  Int64ColumnReader(ColumnReaderImpl<'a, Int64Type>),
  Int96ColumnReader(ColumnReaderImpl<'a, Int96Type>),
  FloatColumnReader(ColumnReaderImpl<'a, FloatType>),
  DoubleColumnReader(ColumnReaderImpl<'a, DoubleType>),
  ByteArrayColumnReader(ColumnReaderImpl<'a, ByteArrayType>),
  FixedLenByteArrayColumnReader(ColumnReaderImpl<'a, FixedLenByteArrayType>),
}

/// Builds a column reader matching `col_descr`'s physical type, pulling
/// pages from `col_page_reader`.
pub fn get_column_reader<'a>(col_descr: ColumnDescPtr, col_page_reader: Box<dyn PageReader + 'a>) -> ColumnReader<'a> {
  match col_descr.physical_type() {
    Type::BOOLEAN => ColumnReader::BoolColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::INT32 => ColumnReader::Int32ColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::INT64 => ColumnReader::Int64ColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::INT96 => ColumnReader::Int96ColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::FLOAT => ColumnReader::FloatColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::DOUBLE => ColumnReader::DoubleColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::BYTE_ARRAY => ColumnReader::ByteArrayColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader)),
    Type::FIXED_LEN_BYTE_ARRAY => {
      ColumnReader::FixedLenByteArrayColumnReader(ColumnReaderImpl::new(col_descr, col_page_reader))
    }
  }
}

/// Narrows a `ColumnReader` back to a `ColumnReaderImpl<T>`. The caller
/// must know `T` matches the physical type the reader was built with
/// (typically by having just called `get_column_reader` on a descriptor of
/// that type); a mismatch panics rather than risking undefined behavior.
pub fn get_typed_column_reader<'a, T: FromColumnReader>(col_reader: ColumnReader<'a>) -> ColumnReaderImpl<'a, T> {
  T::from_column_reader(col_reader)
}

/// Extracts the `ColumnReaderImpl<Self>` variant from a `ColumnReader`.
pub trait FromColumnReader: DataType {
  fn from_column_reader(col_reader: ColumnReader) -> ColumnReaderImpl<Self>
  where
    Self: Sized;
}

macro_rules! impl_from_column_reader {
  ($ty:ty, $variant:ident) => {
    impl FromColumnReader for $ty {
      fn from_column_reader(col_reader: ColumnReader) -> ColumnReaderImpl<$ty> {
        match col_reader {
          ColumnReader::$variant(r) => r,
          _ => panic!(concat!("column reader does not hold a ", stringify!($ty), " reader")),
        }
      }
    }
  };
}

impl_from_column_reader!(BoolType, BoolColumnReader);
impl_from_column_reader!(Int32Type, Int32ColumnReader);
impl_from_column_reader!(Int64Type, Int64ColumnReader);
impl_from_column_reader!(Int96Type, Int96ColumnReader);
impl_from_column_reader!(FloatType, FloatColumnReader);
impl_from_column_reader!(DoubleType, DoubleColumnReader);
impl_from_column_reader!(ByteArrayType, ByteArrayColumnReader);
impl_from_column_reader!(FixedLenByteArrayType, FixedLenByteArrayColumnReader);

/// Reads values (and, where applicable, definition/repetition levels) for
/// one primitive column, pulling pages from `page_reader` as needed.
pub struct ColumnReaderImpl<'a, T: DataType>
where
  PlainDecoder<T>: Decoder<T>,
  DictDecoder<T>: Decoder<T>,
{
  descr: ColumnDescPtr,
  def_level_decoder: Option<LevelDecoder>,
  rep_level_decoder: Option<LevelDecoder>,
  page_reader: Box<dyn PageReader + 'a>,
  current_encoding: Option<Encoding>,

  /// Total number of values in the current data page.
  num_buffered_values: u32,
  /// Number of values from the current data page already decoded.
  num_decoded_values: u32,

  decoders: HashMap<Encoding, Box<dyn Decoder<T>>>,
}

impl<'a, T: DataType> ColumnReaderImpl<'a, T>
where
  PlainDecoder<T>: Decoder<T>,
  DictDecoder<T>: Decoder<T>,
{
  pub fn new(descr: ColumnDescPtr, page_reader: Box<dyn PageReader + 'a>) -> Self {
    ColumnReaderImpl {
      descr,
      def_level_decoder: None,
      rep_level_decoder: None,
      page_reader,
      current_encoding: None,
      num_buffered_values: 0,
      num_decoded_values: 0,
      decoders: HashMap::new(),
    }
  }

  /// Reads up to `batch_size` values (plus their levels) from the column.
  /// `values` may end up holding fewer entries than `def_levels`/
  /// `rep_levels` when the column is optional or repeated: only levels
  /// equal to `max_def_level` carry an actual value.
  ///
  /// Returns `(values_read, levels_read)`.
  pub fn read_batch(
    &mut self,
    batch_size: usize,
    mut def_levels: Option<&mut [i16]>,
    mut rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
  ) -> Result<(usize, usize)> {
    let mut values_read = 0;
    let mut levels_read = 0;

    while values_read < batch_size {
      if !self.has_next()? {
        break;
      }

      let mut values_to_read = 0;
      let mut num_def_levels = 0;

      let next_levels_read =
        levels_read + std::cmp::min(batch_size, (self.num_buffered_values - self.num_decoded_values) as usize);

      if self.descr.max_def_level() > 0 && def_levels.is_some() {
        if let Some(ref mut levels) = def_levels {
          assert!(levels.len() >= next_levels_read, "def_levels buffer too small");
          num_def_levels = self.read_def_levels(&mut levels[levels_read..next_levels_read])?;
          for level in &levels[levels_read..levels_read + num_def_levels] {
            if *level == self.descr.max_def_level() {
              values_to_read += 1;
            }
          }
        }
      } else {
        values_to_read = batch_size;
      }

      if self.descr.max_rep_level() > 0 && rep_levels.is_some() {
        if let Some(ref mut levels) = rep_levels {
          assert!(levels.len() >= next_levels_read, "rep_levels buffer too small");
          let num_rep_levels = self.read_rep_levels(&mut levels[levels_read..next_levels_read])?;
          assert_eq!(num_def_levels, num_rep_levels, "decoded rep/def level counts diverged");
          levels_read += num_rep_levels;
        }
      } else if self.descr.max_def_level() > 0 {
        levels_read += num_def_levels;
      }

      assert!(values.len() >= values_read + values_to_read, "values buffer too small");
      let curr_values_read = self.read_values(&mut values[values_read..values_read + values_to_read])?;
      self.num_decoded_values += std::cmp::max(num_def_levels, curr_values_read) as u32;
      values_read += curr_values_read;

      if self.descr.max_def_level() == 0 && !(self.descr.max_rep_level() > 0 && rep_levels.is_some()) {
        levels_read += curr_values_read;
      }
    }

    Ok((values_read, levels_read))
  }

  #[inline]
  fn has_next(&mut self) -> Result<bool> {
    if self.num_buffered_values == 0 || self.num_buffered_values == self.num_decoded_values {
      if !self.advance_page()? {
        Ok(false)
      } else {
        Ok(self.num_buffered_values != 0)
      }
    } else {
      Ok(true)
    }
  }

  /// Pulls pages until a data page is loaded (configuring dictionaries for
  /// any dictionary pages seen along the way), or the chunk is exhausted.
  fn advance_page(&mut self) -> Result<bool> {
    loop {
      match self.page_reader.get_next_page()? {
        None => return Ok(false),
        Some(Page::DictionaryPage { buf, num_values, encoding, .. }) => {
          self.configure_dictionary(buf, num_values, encoding)?;
        }
        Some(Page::DataPage { buf, num_values, mut encoding, def_level_encoding: _, rep_level_encoding: _ }) => {
          self.num_buffered_values = num_values;
          self.num_decoded_values = 0;

          let mut buffer_ptr = buf;

          if self.descr.max_rep_level() > 0 {
            let mut rep_decoder = LevelDecoder::new(self.descr.max_rep_level());
            let total_bytes = rep_decoder.set_data(buffer_ptr.all())?;
            buffer_ptr = buffer_ptr.start_from(total_bytes);
            self.rep_level_decoder = Some(rep_decoder);
          }

          if self.descr.max_def_level() > 0 {
            let mut def_decoder = LevelDecoder::new(self.descr.max_def_level());
            let total_bytes = def_decoder.set_data(buffer_ptr.all())?;
            buffer_ptr = buffer_ptr.start_from(total_bytes);
            self.def_level_decoder = Some(def_decoder);
          }

          if encoding == Encoding::PLAIN_DICTIONARY {
            encoding = Encoding::RLE_DICTIONARY;
          }

          if !self.decoders.contains_key(&encoding) {
            let data_decoder: Box<dyn Decoder<T>> = match encoding {
              Encoding::PLAIN => Box::new(PlainDecoder::<T>::new(self.descr.type_length())),
              Encoding::RLE_DICTIONARY => {
                return Err(general_err!("dictionary page must precede a RLE_DICTIONARY data page"));
              }
              other => return Err(nyi_err!("unsupported data page encoding {}", other)),
            };
            self.decoders.insert(encoding, data_decoder);
          }

          self.decoders.get_mut(&encoding).unwrap().set_data(buffer_ptr, num_values as usize)?;
          self.current_encoding = Some(encoding);
          return Ok(true);
        }
      }
    }
  }

  #[inline]
  fn read_rep_levels(&mut self, buffer: &mut [i16]) -> Result<usize> {
    self.rep_level_decoder.as_mut().expect("rep_level_decoder must be set").get_batch(buffer)
  }

  #[inline]
  fn read_def_levels(&mut self, buffer: &mut [i16]) -> Result<usize> {
    self.def_level_decoder.as_mut().expect("def_level_decoder must be set").get_batch(buffer)
  }

  #[inline]
  fn read_values(&mut self, buffer: &mut [T::T]) -> Result<usize> {
    let encoding = self.current_encoding.expect("current_encoding must be set");
    let current_decoder = self
      .decoders
      .get_mut(&encoding)
      .unwrap_or_else(|| panic!("decoder for encoding {} must be set", encoding));
    current_decoder.get(buffer)
  }

  fn configure_dictionary(
    &mut self,
    buf: crate::util::memory::ByteBufferPtr,
    num_values: u32,
    page_encoding: Encoding,
  ) -> Result<()> {
    let encoding = match page_encoding {
      Encoding::PLAIN | Encoding::PLAIN_DICTIONARY => Encoding::RLE_DICTIONARY,
      other => return Err(nyi_err!("unsupported dictionary page encoding {}", other)),
    };

    if self.decoders.contains_key(&encoding) {
      return Err(general_err!("a column chunk cannot have more than one dictionary page"));
    }

    let mut dictionary = PlainDecoder::<T>::new(self.descr.type_length());
    dictionary.set_data(buf, num_values as usize)?;

    let mut decoder = DictDecoder::<T>::new();
    decoder.set_dict(Box::new(dictionary))?;
    self.decoders.insert(encoding, Box::new(decoder));
    Ok(())
  }
}
