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

//! A cheaply-clonable view over an owned byte buffer, used everywhere a page
//! payload or a sub-slice of one needs to be passed around without copying.

use std::ops::Deref;
use std::rc::Rc;

/// A reference-counted byte buffer together with a `start`/`len` window into
/// it. Cloning a `ByteBufferPtr` is O(1); slicing with `range`/`start_from`
/// creates a new window over the same backing storage.
#[derive(Clone, Debug)]
pub struct ByteBufferPtr {
  data: Rc<Vec<u8>>,
  start: usize,
  len: usize,
}

impl ByteBufferPtr {
  /// Creates a new `ByteBufferPtr` taking ownership of `v`, covering it
  /// entirely.
  pub fn new(v: Vec<u8>) -> Self {
    let len = v.len();
    ByteBufferPtr { data: Rc::new(v), start: 0, len }
  }

  /// Returns the number of bytes in this window.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns a new `ByteBufferPtr` sharing the same backing storage, windowed
  /// to `[start, start + len)` of the current window.
  pub fn range(&self, start: usize, len: usize) -> Self {
    assert!(
      start + len <= self.len,
      "range [{}, {}) out of bounds for buffer of length {}",
      start,
      start + len,
      self.len
    );
    ByteBufferPtr { data: self.data.clone(), start: self.start + start, len }
  }

  /// Returns a new `ByteBufferPtr` covering this window starting at `start`
  /// through to its end.
  pub fn start_from(&self, start: usize) -> Self {
    assert!(start <= self.len, "start {} out of bounds for buffer of length {}", start, self.len);
    self.range(start, self.len - start)
  }

  /// Returns a new `ByteBufferPtr` covering this window in its entirety.
  pub fn all(&self) -> Self {
    self.start_from(0)
  }
}

impl AsRef<[u8]> for ByteBufferPtr {
  fn as_ref(&self) -> &[u8] {
    &self.data[self.start..self.start + self.len]
  }
}

impl Deref for ByteBufferPtr {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    self.as_ref()
  }
}

/// A plain growable byte buffer, used by decoders that need to accumulate
/// scratch bytes (e.g. the per-mini-block width table in a delta decoder).
#[derive(Clone, Debug, Default)]
pub struct ByteBuffer {
  data: Vec<u8>,
}

impl ByteBuffer {
  pub fn new() -> Self {
    ByteBuffer { data: Vec::new() }
  }

  pub fn data(&self) -> &[u8] {
    &self.data
  }

  pub fn set_data(&mut self, data: Vec<u8>) {
    self.data = data;
  }

  pub fn clear(&mut self) {
    self.data.clear();
  }

  pub fn size(&self) -> usize {
    self.data.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_range_and_start_from() {
    let buf = ByteBufferPtr::new(vec![1, 2, 3, 4, 5]);
    assert_eq!(buf.as_ref(), &[1, 2, 3, 4, 5]);

    let sub = buf.start_from(2);
    assert_eq!(sub.as_ref(), &[3, 4, 5]);

    let sub2 = sub.range(1, 2);
    assert_eq!(sub2.as_ref(), &[4, 5]);
  }

  #[test]
  fn test_clone_is_cheap_view() {
    let buf = ByteBufferPtr::new(vec![9, 9, 9]);
    let clone = buf.clone();
    assert_eq!(buf.as_ref(), clone.as_ref());
  }

  #[test]
  #[should_panic]
  fn test_range_out_of_bounds() {
    let buf = ByteBufferPtr::new(vec![1, 2, 3]);
    let _ = buf.range(2, 5);
  }
}
