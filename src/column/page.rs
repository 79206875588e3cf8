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

//! In-memory representation of a decompressed page and the pull-based
//! `PageReader` that produces them one at a time from a column chunk.

use crate::basic::{Encoding, PageType};
use crate::errors::Result;
use crate::util::memory::ByteBufferPtr;

/// A single decompressed page from a column chunk. Only `DATA_PAGE` (v1)
/// and `DICTIONARY_PAGE` are modeled; `DATA_PAGE_V2` and `INDEX_PAGE` are
/// out of scope and are skipped by `PageReader` implementations.
#[derive(Clone, Debug)]
pub enum Page {
  DataPage {
    buf: ByteBufferPtr,
    num_values: u32,
    encoding: Encoding,
    def_level_encoding: Encoding,
    rep_level_encoding: Encoding,
  },
  DictionaryPage { buf: ByteBufferPtr, num_values: u32, encoding: Encoding, is_sorted: bool },
}

impl Page {
  pub fn page_type(&self) -> PageType {
    match self {
      Page::DataPage { .. } => PageType::DATA_PAGE,
      Page::DictionaryPage { .. } => PageType::DICTIONARY_PAGE,
    }
  }

  pub fn buffer(&self) -> &ByteBufferPtr {
    match self {
      Page::DataPage { buf, .. } => buf,
      Page::DictionaryPage { buf, .. } => buf,
    }
  }

  pub fn num_values(&self) -> u32 {
    match self {
      Page::DataPage { num_values, .. } => *num_values,
      Page::DictionaryPage { num_values, .. } => *num_values,
    }
  }

  pub fn encoding(&self) -> Encoding {
    match self {
      Page::DataPage { encoding, .. } => *encoding,
      Page::DictionaryPage { encoding, .. } => *encoding,
    }
  }
}

/// Produces the decompressed pages of a single column chunk, in on-disk
/// order, one at a time.
pub trait PageReader {
  /// Returns the next page, or `None` once the column chunk is exhausted.
  /// `DATA_PAGE_V2` and `INDEX_PAGE` pages are silently skipped.
  fn get_next_page(&mut self) -> Result<Option<Page>>;
}
