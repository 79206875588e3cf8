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

//! Top-level file/row-group readers: random-access byte sources
//! (`ChunkReader`), a page reader that walks a column chunk's bytes one
//! Thrift-framed page at a time, and the `FileReader`/`RowGroupReader`
//! traits that tie everything together.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;

use log::debug;
use parquet_format_safe::PageHeader;
use thrift::protocol::TCompactInputProtocol;

use crate::basic::{Compression, Encoding, LogicalType, PageType, Type};
use crate::column::page::{Page, PageReader};
use crate::column::reader::{get_column_reader, get_typed_column_reader, ColumnReader, FromColumnReader};
use crate::compression::create_codec;
use crate::data_type::{BoolType, ByteArrayType, DataType, DoubleType, FixedLenByteArrayType, FloatType, Int32Type, Int64Type, Int96Type};
use crate::encodings::decoding::{DictDecoder, Decoder, PlainDecoder};
use crate::errors::{ParquetError, Result};
use crate::file::footer;
use crate::file::metadata::{ParquetMetaData, RowGroupMetaData};
use crate::record::api::{Row, RowField};
use crate::schema::types::{ColumnDescPtr, ColumnPath};
use crate::util::memory::ByteBufferPtr;

/// Total length in bytes of the underlying byte source.
pub trait Length {
  fn len(&self) -> u64;
}

/// Types that can be cloned into an independent handle onto the same
/// underlying bytes (e.g. a second file descriptor position).
pub trait TryClone: Sized {
  fn try_clone(&self) -> std::io::Result<Self>;
}

/// Random access into a byte source, used to pull the footer and
/// individual column chunks without holding the whole file in memory.
pub trait ChunkReader: Length {
  fn get_read(&self, start: u64, length: usize) -> Result<Box<dyn Read>>;
}

impl Length for File {
  fn len(&self) -> u64 {
    self.metadata().map(|m| m.len()).unwrap_or(0)
  }
}

impl TryClone for File {
  fn try_clone(&self) -> std::io::Result<Self> {
    File::try_clone(self)
  }
}

impl ChunkReader for File {
  fn get_read(&self, start: u64, length: usize) -> Result<Box<dyn Read>> {
    let mut file = TryClone::try_clone(self)?;
    file.seek(SeekFrom::Start(start))?;
    Ok(Box::new(file.take(length as u64)))
  }
}

/// An in-memory `ChunkReader`, useful for tests and embedded data that
/// doesn't warrant a temporary file.
#[derive(Clone)]
pub struct SliceableCursor {
  data: Rc<Vec<u8>>,
}

impl SliceableCursor {
  pub fn new(data: Vec<u8>) -> Self {
    SliceableCursor { data: Rc::new(data) }
  }
}

impl Length for SliceableCursor {
  fn len(&self) -> u64 {
    self.data.len() as u64
  }
}

impl ChunkReader for SliceableCursor {
  fn get_read(&self, start: u64, length: usize) -> Result<Box<dyn Read>> {
    let start = start as usize;
    let end = start.checked_add(length).ok_or_else(|| eof_err!("requested range overflows"))?;
    if end > self.data.len() {
      return Err(eof_err!("requested range [{}, {}) is out of bounds for a {}-byte source", start, end, self.data.len()));
    }
    Ok(Box::new(Cursor::new(self.data[start..end].to_vec())))
  }
}

/// Walks the Thrift-framed pages of a single, already-buffered column
/// chunk. `DATA_PAGE_V2` and `INDEX_PAGE` are skipped.
pub struct SerializedPageReader {
  data: ByteBufferPtr,
  offset: usize,
  seen_num_values: i64,
  total_num_values: i64,
  compression: Compression,
}

impl SerializedPageReader {
  pub fn new(data: ByteBufferPtr, total_num_values: i64, compression: Compression) -> Self {
    SerializedPageReader { data, offset: 0, seen_num_values: 0, total_num_values, compression }
  }

  fn decompress(&self, buf: &[u8], uncompressed_len: usize) -> Result<ByteBufferPtr> {
    match create_codec(self.compression)? {
      None => Ok(ByteBufferPtr::new(buf.to_vec())),
      Some(mut codec) => {
        let mut out = Vec::with_capacity(uncompressed_len);
        codec.decompress(buf, &mut out, uncompressed_len)?;
        if out.len() != uncompressed_len {
          return Err(general_err!(
            "corrupt page: decompressed size {} does not match expected {}",
            out.len(),
            uncompressed_len
          ));
        }
        Ok(ByteBufferPtr::new(out))
      }
    }
  }
}

impl PageReader for SerializedPageReader {
  fn get_next_page(&mut self) -> Result<Option<Page>> {
    loop {
      if self.seen_num_values >= self.total_num_values || self.offset >= self.data.len() {
        return Ok(None);
      }

      let remaining = self.data.range(self.offset, self.data.len() - self.offset);
      let mut cursor = Cursor::new(remaining.as_ref());
      let mut protocol = TCompactInputProtocol::new(&mut cursor);
      let page_header = PageHeader::read_from_in_protocol(&mut protocol)
        .map_err(|e| general_err!("could not parse page header: {}", e))?;
      let header_len = cursor.position() as usize;
      self.offset += header_len;

      let compressed_len = page_header.compressed_page_size as usize;
      let uncompressed_len = page_header.uncompressed_page_size as usize;
      if self.offset + compressed_len > self.data.len() {
        return Err(eof_err!("page payload runs past the end of the column chunk"));
      }
      let payload = &self.data.as_ref()[self.offset..self.offset + compressed_len];
      self.offset += compressed_len;

      match PageType::from(page_header.type_) {
        PageType::DICTIONARY_PAGE => {
          let header = page_header
            .dictionary_page_header
            .ok_or_else(|| general_err!("DICTIONARY_PAGE is missing its DictionaryPageHeader"))?;
          let buf = self.decompress(payload, uncompressed_len)?;
          return Ok(Some(Page::DictionaryPage {
            buf,
            num_values: header.num_values as u32,
            encoding: Encoding::from(header.encoding),
            is_sorted: header.is_sorted.unwrap_or(false),
          }));
        }
        PageType::DATA_PAGE => {
          let header =
            page_header.data_page_header.ok_or_else(|| general_err!("DATA_PAGE is missing its DataPageHeader"))?;
          self.seen_num_values += header.num_values as i64;
          let buf = self.decompress(payload, uncompressed_len)?;
          return Ok(Some(Page::DataPage {
            buf,
            num_values: header.num_values as u32,
            encoding: Encoding::from(header.encoding),
            def_level_encoding: Encoding::from(header.definition_level_encoding),
            rep_level_encoding: Encoding::from(header.repetition_level_encoding),
          }));
        }
        PageType::DATA_PAGE_V2 => {
          if let Some(header) = page_header.data_page_header_v2 {
            self.seen_num_values += header.num_values as i64;
          }
          debug!("skipping DATA_PAGE_V2 page, which is out of scope for this decoder");
        }
        PageType::INDEX_PAGE => {
          debug!("skipping INDEX_PAGE page, which is out of scope for this decoder");
        }
      }
    }
  }
}

/// Reads a whole Parquet file: its footer, plus on-demand access to each
/// row group's column chunks.
pub trait FileReader {
  fn metadata(&self) -> &ParquetMetaData;
  fn num_row_groups(&self) -> usize;
  fn get_row_group(&self, i: usize) -> Result<Box<dyn RowGroupReader + '_>>;
}

/// Reads the column chunks of a single row group.
pub trait RowGroupReader {
  fn metadata(&self) -> &RowGroupMetaData;
  fn num_columns(&self) -> usize;
  fn get_column_page_reader(&self, i: usize) -> Result<Box<dyn PageReader>>;
  fn get_column_reader(&self, i: usize) -> Result<ColumnReader<'static>>;
}

/// `FileReader` over any `ChunkReader` byte source (a `File`, or an
/// in-memory `SliceableCursor`).
pub struct SerializedFileReader<R> {
  chunk_reader: Rc<R>,
  metadata: ParquetMetaData,
}

impl<R: ChunkReader> SerializedFileReader<R> {
  pub fn new(chunk_reader: R) -> Result<Self> {
    let metadata = footer::parse_metadata(&chunk_reader)?;
    Ok(SerializedFileReader { chunk_reader: Rc::new(chunk_reader), metadata })
  }
}

impl<R: ChunkReader> FileReader for SerializedFileReader<R> {
  fn metadata(&self) -> &ParquetMetaData {
    &self.metadata
  }

  fn num_row_groups(&self) -> usize {
    self.metadata.num_row_groups()
  }

  fn get_row_group(&self, i: usize) -> Result<Box<dyn RowGroupReader + '_>> {
    let row_group_metadata = self.metadata.row_group(i).clone();
    Ok(Box::new(SerializedRowGroupReader { chunk_reader: self.chunk_reader.clone(), row_group_metadata }))
  }
}

struct SerializedRowGroupReader<R> {
  chunk_reader: Rc<R>,
  row_group_metadata: RowGroupMetaData,
}

impl<R: ChunkReader> RowGroupReader for SerializedRowGroupReader<R> {
  fn metadata(&self) -> &RowGroupMetaData {
    &self.row_group_metadata
  }

  fn num_columns(&self) -> usize {
    self.row_group_metadata.num_columns()
  }

  fn get_column_page_reader(&self, i: usize) -> Result<Box<dyn PageReader>> {
    let col = self.row_group_metadata.column(i);
    let (start, len) = col.byte_range();
    let mut data = Vec::with_capacity(len as usize);
    self.chunk_reader.get_read(start, len as usize)?.read_to_end(&mut data)?;
    Ok(Box::new(SerializedPageReader::new(ByteBufferPtr::new(data), col.num_values(), col.compression())))
  }

  fn get_column_reader(&self, i: usize) -> Result<ColumnReader<'static>> {
    let col_descr = self.row_group_metadata.column(i).column_descr().clone();
    let page_reader = self.get_column_page_reader(i)?;
    Ok(get_column_reader(col_descr, page_reader))
  }
}

/// Reads every value of one column, filling `Null` wherever the definition
/// level fell short of the column's max (an optional value absent for that
/// row). Only flat (non-repeated) columns are supported: `col_descr`'s
/// `max_rep_level` must be `0`.
fn collect_column<T>(
  col_descr: ColumnDescPtr,
  page_reader: Box<dyn PageReader>,
  num_rows: usize,
  convert: fn(Type, LogicalType, T::T) -> RowField,
) -> Result<Vec<RowField>>
where
  T: FromColumnReader,
  PlainDecoder<T>: Decoder<T>,
  DictDecoder<T>: Decoder<T>,
{
  if col_descr.max_rep_level() > 0 {
    return Err(nyi_err!("repeated columns are not supported by the flat Row reader"));
  }

  let column_reader = get_column_reader(col_descr.clone(), page_reader);
  let mut typed = get_typed_column_reader::<T>(column_reader);

  let mut values = vec![T::T::default(); num_rows];
  let mut def_levels = vec![0i16; num_rows];
  let (_, levels_read) = typed.read_batch(num_rows, Some(&mut def_levels), None, &mut values)?;

  let max_def = col_descr.max_def_level();
  let physical_type = col_descr.physical_type();
  let logical_type = col_descr.logical_type();

  let mut result = Vec::with_capacity(levels_read);
  let mut vi = 0;
  for &level in &def_levels[..levels_read] {
    if max_def == 0 || level == max_def {
      result.push(convert(physical_type, logical_type, values[vi].clone()));
      vi += 1;
    } else {
      result.push(RowField::Null);
    }
  }
  Ok(result)
}

/// Runs the column readers for `col_indices` (in the given order) to
/// completion, returning each column's name alongside its `num_rows` values.
fn collect_row_group_columns(
  row_group: &dyn RowGroupReader,
  col_indices: &[usize],
  num_rows: usize,
) -> Result<Vec<(String, Vec<RowField>)>> {
  let mut columns = Vec::with_capacity(col_indices.len());
  for &col_idx in col_indices {
    let col_descr = row_group.metadata().column(col_idx).column_descr().clone();
    let page_reader = row_group.get_column_page_reader(col_idx)?;
    let name = col_descr.name().to_string();

    let values = match col_descr.physical_type() {
      Type::BOOLEAN => collect_column::<BoolType>(col_descr, page_reader, num_rows, RowField::convert_bool)?,
      Type::INT32 => collect_column::<Int32Type>(col_descr, page_reader, num_rows, RowField::convert_int32)?,
      Type::INT64 => collect_column::<Int64Type>(col_descr, page_reader, num_rows, RowField::convert_int64)?,
      Type::INT96 => collect_column::<Int96Type>(col_descr, page_reader, num_rows, RowField::convert_int96)?,
      Type::FLOAT => collect_column::<FloatType>(col_descr, page_reader, num_rows, RowField::convert_float)?,
      Type::DOUBLE => collect_column::<DoubleType>(col_descr, page_reader, num_rows, RowField::convert_double)?,
      Type::BYTE_ARRAY => {
        collect_column::<ByteArrayType>(col_descr, page_reader, num_rows, RowField::convert_byte_array)?
      }
      Type::FIXED_LEN_BYTE_ARRAY => {
        collect_column::<FixedLenByteArrayType>(col_descr, page_reader, num_rows, RowField::convert_byte_array)?
      }
    };
    columns.push((name, values));
  }
  Ok(columns)
}

/// Resolves `column_selection` (dotted leaf-column paths) against a row
/// group's schema order, returning the matching column indices in selection
/// order. An empty selection means every leaf column, in schema order.
fn resolve_column_selection(row_group: &dyn RowGroupReader, column_selection: &[ColumnPath]) -> Result<Vec<usize>> {
  if column_selection.is_empty() {
    return Ok((0..row_group.num_columns()).collect());
  }
  column_selection
    .iter()
    .map(|path| {
      (0..row_group.num_columns())
        .find(|&i| row_group.metadata().column(i).column_path() == path)
        .ok_or_else(|| ParquetError::UnknownColumn(path.to_string()))
    })
    .collect()
}

impl<R: ChunkReader> SerializedFileReader<R> {
  /// Streams at most `limit` rows (or every row, if `None`) of row group
  /// `rg_idx` through `sink`, restricted to `column_selection` (dotted leaf
  /// paths in the order they should appear in each `Row`; an empty slice
  /// selects every leaf column in schema order). A path not present in the
  /// schema is an `UnknownColumn` error, raised before any row is emitted.
  pub fn dump(
    &self,
    rg_idx: usize,
    column_selection: &[ColumnPath],
    limit: Option<usize>,
    mut sink: impl FnMut(Row),
  ) -> Result<()> {
    let row_group = self.get_row_group(rg_idx)?;
    let num_rows = row_group.metadata().num_rows() as usize;

    let col_indices = resolve_column_selection(row_group.as_ref(), column_selection)?;
    let columns = collect_row_group_columns(row_group.as_ref(), &col_indices, num_rows)?;

    let emit = match limit {
      Some(l) => std::cmp::min(l, num_rows),
      None => num_rows,
    };
    for r in 0..emit {
      let fields = columns.iter().map(|(name, values)| (name.clone(), values[r].clone())).collect();
      sink(Row::new(fields));
    }
    Ok(())
  }
}

/// Reads every row of a flat (no repeated fields) Parquet file into
/// `Row`s, across all row groups. Nested record assembly for repeated
/// fields is out of scope; such schemas return `NYI`.
pub fn read_rows<R: ChunkReader>(file_reader: &SerializedFileReader<R>) -> Result<Vec<Row>> {
  let mut rows = Vec::new();

  for rg_idx in 0..file_reader.num_row_groups() {
    let row_group = file_reader.get_row_group(rg_idx)?;
    let num_rows = row_group.metadata().num_rows() as usize;
    let col_indices: Vec<usize> = (0..row_group.num_columns()).collect();
    let columns = collect_row_group_columns(row_group.as_ref(), &col_indices, num_rows)?;

    for r in 0..num_rows {
      let fields = columns.iter().map(|(name, values)| (name.clone(), values[r].clone())).collect();
      rows.push(Row::new(fields));
    }
  }

  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sliceable_cursor_range() {
    let cursor = SliceableCursor::new(vec![1, 2, 3, 4, 5]);
    let mut buf = Vec::new();
    cursor.get_read(1, 3).unwrap().read_to_end(&mut buf).unwrap();
    assert_eq!(buf, vec![2, 3, 4]);
  }

  #[test]
  fn test_sliceable_cursor_out_of_bounds() {
    let cursor = SliceableCursor::new(vec![1, 2, 3]);
    assert!(cursor.get_read(1, 10).is_err());
  }
}
