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

//! The schema tree: group/primitive nodes mirroring the flat
//! `Vec<SchemaElement>` the file footer carries, plus the flattened
//! column descriptors (one per leaf, with precomputed max definition/
//! repetition levels) that the column readers key off of.

use std::fmt;
use std::rc::Rc;

use parquet_format_safe::SchemaElement;

use crate::basic::{LogicalType, Repetition, Type};
use crate::errors::Result;

/// A node in the schema tree: either a primitive (leaf) column or a group
/// of child nodes.
#[derive(Clone, Debug)]
pub enum SchemaType {
  Primitive {
    name: String,
    repetition: Repetition,
    physical_type: Type,
    type_length: i32,
    logical_type: LogicalType,
  },
  Group { name: String, repetition: Option<Repetition>, fields: Vec<Rc<SchemaType>> },
}

impl SchemaType {
  pub fn primitive(name: &str, repetition: Repetition, physical_type: Type, type_length: i32) -> Self {
    SchemaType::Primitive {
      name: name.to_string(),
      repetition,
      physical_type,
      type_length,
      logical_type: LogicalType::NONE,
    }
  }

  pub fn group(name: &str, repetition: Option<Repetition>, fields: Vec<Rc<SchemaType>>) -> Self {
    SchemaType::Group { name: name.to_string(), repetition, fields }
  }

  pub fn name(&self) -> &str {
    match self {
      SchemaType::Primitive { name, .. } => name,
      SchemaType::Group { name, .. } => name,
    }
  }

  pub fn repetition(&self) -> Option<Repetition> {
    match self {
      SchemaType::Primitive { repetition, .. } => Some(*repetition),
      SchemaType::Group { repetition, .. } => *repetition,
    }
  }

  pub fn is_primitive(&self) -> bool {
    matches!(self, SchemaType::Primitive { .. })
  }

  pub fn get_physical_type(&self) -> Type {
    match self {
      SchemaType::Primitive { physical_type, .. } => *physical_type,
      SchemaType::Group { .. } => panic!("get_physical_type() called on a group node"),
    }
  }

  pub fn type_length(&self) -> i32 {
    match self {
      SchemaType::Primitive { type_length, .. } => *type_length,
      SchemaType::Group { .. } => 0,
    }
  }

  pub fn logical_type(&self) -> LogicalType {
    match self {
      SchemaType::Primitive { logical_type, .. } => *logical_type,
      SchemaType::Group { .. } => LogicalType::NONE,
    }
  }

  pub fn fields(&self) -> &[Rc<SchemaType>] {
    match self {
      SchemaType::Primitive { .. } => &[],
      SchemaType::Group { fields, .. } => fields,
    }
  }
}

impl fmt::Display for SchemaType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Dot-separated path from the schema root to a leaf column, e.g.
/// `a.b.c` for a column nested two groups deep.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnPath {
  parts: Vec<String>,
}

impl ColumnPath {
  pub fn new(parts: Vec<String>) -> Self {
    ColumnPath { parts }
  }

  pub fn parts(&self) -> &[String] {
    &self.parts
  }
}

impl fmt::Display for ColumnPath {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.parts.join("."))
  }
}

/// A leaf column: its schema node plus the precomputed max definition and
/// repetition levels along its path from the schema root.
pub struct ColumnDescriptor {
  schema: Rc<SchemaType>,
  max_def_level: i16,
  max_rep_level: i16,
  path: ColumnPath,
}

impl ColumnDescriptor {
  pub fn new(schema: Rc<SchemaType>, max_def_level: i16, max_rep_level: i16, path: ColumnPath) -> Self {
    ColumnDescriptor { schema, max_def_level, max_rep_level, path }
  }

  pub fn max_def_level(&self) -> i16 {
    self.max_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.max_rep_level
  }

  pub fn path(&self) -> &ColumnPath {
    &self.path
  }

  pub fn physical_type(&self) -> Type {
    self.schema.get_physical_type()
  }

  pub fn type_length(&self) -> i32 {
    self.schema.type_length()
  }

  pub fn logical_type(&self) -> LogicalType {
    self.schema.logical_type()
  }

  pub fn name(&self) -> &str {
    self.schema.name()
  }

  /// A column with `REQUIRED` repetition (and every ancestor group also
  /// `REQUIRED`) never carries a null sentinel at its own level: its
  /// "emptiness" is entirely implied by an ancestor's definition level.
  pub fn is_required(&self) -> bool {
    matches!(self.schema.repetition(), Some(Repetition::REQUIRED))
  }
}

pub type ColumnDescPtr = Rc<ColumnDescriptor>;
pub type SchemaDescPtr = Rc<SchemaDescriptor>;

/// The full schema for a file: the root group node plus a flattened,
/// indexable list of leaf column descriptors in depth-first order (the
/// same order column chunks appear within a row group).
pub struct SchemaDescriptor {
  root: Rc<SchemaType>,
  leaves: Vec<ColumnDescPtr>,
}

impl SchemaDescriptor {
  pub fn new(root: Rc<SchemaType>) -> Self {
    let mut leaves = Vec::new();
    // The root message's own name is not part of any column path.
    for child in root.fields() {
      build_leaves(child, 0, 0, &mut Vec::new(), &mut leaves);
    }
    SchemaDescriptor { root, leaves }
  }

  pub fn root_schema(&self) -> &Rc<SchemaType> {
    &self.root
  }

  pub fn num_columns(&self) -> usize {
    self.leaves.len()
  }

  pub fn column(&self, i: usize) -> ColumnDescPtr {
    self.leaves[i].clone()
  }

  pub fn columns(&self) -> &[ColumnDescPtr] {
    &self.leaves
  }
}

fn build_leaves(
  node: &Rc<SchemaType>,
  parent_max_def: i16,
  parent_max_rep: i16,
  path: &mut Vec<String>,
  leaves: &mut Vec<ColumnDescPtr>,
) {
  let is_repeated = matches!(node.repetition(), Some(Repetition::REPEATED));
  let is_optional = matches!(node.repetition(), Some(Repetition::OPTIONAL));
  let max_def = parent_max_def + if is_optional || is_repeated { 1 } else { 0 };
  let max_rep = parent_max_rep + if is_repeated { 1 } else { 0 };

  path.push(node.name().to_string());
  match node.as_ref() {
    SchemaType::Primitive { .. } => {
      leaves.push(Rc::new(ColumnDescriptor::new(node.clone(), max_def, max_rep, ColumnPath::new(path.clone()))));
    }
    SchemaType::Group { fields, .. } => {
      for child in fields {
        build_leaves(child, max_def, max_rep, path, leaves);
      }
    }
  }
  path.pop();
}

/// Builds a `SchemaType` tree from the flat, depth-first-encoded
/// `Vec<SchemaElement>` carried in `FileMetaData`. Element `0` is the root
/// message; `num_children` on each element says how many of the following
/// elements are its direct children.
pub fn from_thrift(elements: &[SchemaElement]) -> Result<Rc<SchemaType>> {
  if elements.is_empty() {
    return Err(general_err!("schema has no elements"));
  }
  let mut index = 0usize;
  let root = from_thrift_helper(elements, &mut index)?;
  if index != elements.len() {
    return Err(general_err!(
      "schema conversion did not consume all elements: stopped at {} of {}",
      index,
      elements.len()
    ));
  }
  Ok(Rc::new(root))
}

fn from_thrift_helper(elements: &[SchemaElement], index: &mut usize) -> Result<SchemaType> {
  if *index >= elements.len() {
    return Err(general_err!("malformed schema: ran out of elements"));
  }
  let element = &elements[*index];
  let name = element.name.clone();
  *index += 1;

  match element.num_children {
    Some(n) if n > 0 => {
      let repetition = element.repetition_type.map(Repetition::from);
      let mut fields = Vec::with_capacity(n as usize);
      for _ in 0..n {
        fields.push(Rc::new(from_thrift_helper(elements, index)?));
      }
      let mut seen = std::collections::HashSet::with_capacity(fields.len());
      for field in &fields {
        if !seen.insert(field.name().to_string()) {
          return Err(general_err!("duplicate field name '{}' in group '{}'", field.name(), name));
        }
      }
      Ok(SchemaType::group(&name, repetition, fields))
    }
    _ => {
      let repetition = element
        .repetition_type
        .ok_or_else(|| general_err!("leaf schema element '{}' is missing repetition_type", name))?;
      let physical_type = element
        .type_
        .ok_or_else(|| general_err!("leaf schema element '{}' is missing its physical type", name))?;
      let type_length = element.type_length.unwrap_or(0);
      Ok(SchemaType::Primitive {
        name,
        repetition: Repetition::from(repetition),
        physical_type: Type::from(physical_type),
        type_length,
        logical_type: LogicalType::from(element.converted_type),
      })
    }
  }
}
