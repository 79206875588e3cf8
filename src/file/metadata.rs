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

//! Typed wrappers over the Thrift-decoded footer: per-file, per-row-group
//! and per-column-chunk metadata, keyed to the flattened schema.

use parquet_format_safe as format;

use crate::basic::{Compression, Encoding, Type};
use crate::errors::Result;
use crate::schema::types::{self, ColumnDescPtr, ColumnPath, SchemaDescPtr, SchemaDescriptor};

/// Metadata for the whole file: everything in the footer except the
/// per-row-group/per-column-chunk details.
#[derive(Debug, Clone)]
pub struct FileMetaData {
  version: i32,
  num_rows: i64,
  created_by: Option<String>,
  schema_descr: SchemaDescPtr,
}

impl FileMetaData {
  pub fn new(version: i32, num_rows: i64, created_by: Option<String>, schema_descr: SchemaDescPtr) -> Self {
    FileMetaData { version, num_rows, created_by, schema_descr }
  }

  pub fn version(&self) -> i32 {
    self.version
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn created_by(&self) -> Option<&str> {
    self.created_by.as_deref()
  }

  pub fn schema_descr(&self) -> &SchemaDescPtr {
    &self.schema_descr
  }
}

/// Metadata for a single column chunk within a row group.
#[derive(Debug, Clone)]
pub struct ColumnChunkMetaData {
  column_descr: ColumnDescPtr,
  encodings: Vec<Encoding>,
  num_values: i64,
  compression: Compression,
  total_compressed_size: i64,
  total_uncompressed_size: i64,
  data_page_offset: i64,
  dictionary_page_offset: Option<i64>,
}

impl ColumnChunkMetaData {
  pub fn column_descr(&self) -> &ColumnDescPtr {
    &self.column_descr
  }

  pub fn column_type(&self) -> Type {
    self.column_descr.physical_type()
  }

  pub fn column_path(&self) -> &ColumnPath {
    self.column_descr.path()
  }

  pub fn encodings(&self) -> &[Encoding] {
    &self.encodings
  }

  pub fn num_values(&self) -> i64 {
    self.num_values
  }

  pub fn compression(&self) -> Compression {
    self.compression
  }

  pub fn total_compressed_size(&self) -> i64 {
    self.total_compressed_size
  }

  pub fn total_uncompressed_size(&self) -> i64 {
    self.total_uncompressed_size
  }

  pub fn data_page_offset(&self) -> i64 {
    self.data_page_offset
  }

  pub fn dictionary_page_offset(&self) -> Option<i64> {
    self.dictionary_page_offset
  }

  /// Byte offset of the first page (dictionary page if present and before
  /// the first data page, else the first data page) belonging to this
  /// column chunk.
  pub fn byte_range(&self) -> (u64, u64) {
    let start = match self.dictionary_page_offset {
      Some(d) if d < self.data_page_offset => d,
      _ => self.data_page_offset,
    } as u64;
    (start, self.total_compressed_size as u64)
  }

  fn from_thrift(column_descr: ColumnDescPtr, col_metadata: format::ColumnMetaData) -> Result<Self> {
    let encodings = col_metadata.encodings.into_iter().map(Encoding::from).collect();
    Ok(ColumnChunkMetaData {
      column_descr,
      encodings,
      num_values: col_metadata.num_values,
      compression: Compression::from(col_metadata.codec),
      total_compressed_size: col_metadata.total_compressed_size,
      total_uncompressed_size: col_metadata.total_uncompressed_size,
      data_page_offset: col_metadata.data_page_offset,
      dictionary_page_offset: col_metadata.dictionary_page_offset,
    })
  }
}

/// Metadata for a single row group: its column chunks plus row/byte counts.
#[derive(Debug, Clone)]
pub struct RowGroupMetaData {
  columns: Vec<ColumnChunkMetaData>,
  num_rows: i64,
  total_byte_size: i64,
  schema_descr: SchemaDescPtr,
}

impl RowGroupMetaData {
  pub fn num_columns(&self) -> usize {
    self.columns.len()
  }

  pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
    &self.columns[i]
  }

  pub fn columns(&self) -> &[ColumnChunkMetaData] {
    &self.columns
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn total_byte_size(&self) -> i64 {
    self.total_byte_size
  }

  pub fn schema_descr(&self) -> &SchemaDescPtr {
    &self.schema_descr
  }

  fn from_thrift(schema_descr: SchemaDescPtr, row_group: format::RowGroup) -> Result<Self> {
    if row_group.columns.len() != schema_descr.num_columns() {
      return Err(general_err!(
        "row group has {} column chunks but schema has {} leaf columns",
        row_group.columns.len(),
        schema_descr.num_columns()
      ));
    }
    let mut columns = Vec::with_capacity(row_group.columns.len());
    for (i, chunk) in row_group.columns.into_iter().enumerate() {
      let col_metadata =
        chunk.meta_data.ok_or_else(|| general_err!("column chunk {} is missing its ColumnMetaData", i))?;
      columns.push(ColumnChunkMetaData::from_thrift(schema_descr.column(i), col_metadata)?);
    }
    Ok(RowGroupMetaData { columns, num_rows: row_group.num_rows, total_byte_size: row_group.total_byte_size, schema_descr })
  }
}

/// The fully-decoded footer: file-level metadata plus every row group.
#[derive(Debug, Clone)]
pub struct ParquetMetaData {
  file_metadata: FileMetaData,
  row_groups: Vec<RowGroupMetaData>,
}

impl ParquetMetaData {
  pub fn new(file_metadata: FileMetaData, row_groups: Vec<RowGroupMetaData>) -> Self {
    ParquetMetaData { file_metadata, row_groups }
  }

  pub fn file_metadata(&self) -> &FileMetaData {
    &self.file_metadata
  }

  pub fn num_row_groups(&self) -> usize {
    self.row_groups.len()
  }

  pub fn row_group(&self, i: usize) -> &RowGroupMetaData {
    &self.row_groups[i]
  }

  pub fn row_groups(&self) -> &[RowGroupMetaData] {
    &self.row_groups
  }
}

/// Converts a Thrift-decoded `format::FileMetaData` footer into the typed
/// `ParquetMetaData` the rest of the crate works with.
pub fn parse_file_metadata(t_file_metadata: format::FileMetaData) -> Result<ParquetMetaData> {
  let schema = types::from_thrift(&t_file_metadata.schema)?;
  let schema_descr: SchemaDescPtr = std::rc::Rc::new(SchemaDescriptor::new(schema));

  let mut row_groups = Vec::with_capacity(t_file_metadata.row_groups.len());
  for row_group in t_file_metadata.row_groups {
    row_groups.push(RowGroupMetaData::from_thrift(schema_descr.clone(), row_group)?);
  }

  let file_metadata =
    FileMetaData::new(t_file_metadata.version, t_file_metadata.num_rows, t_file_metadata.created_by, schema_descr);

  Ok(ParquetMetaData::new(file_metadata, row_groups))
}
