//! End-to-end test: hand-assembles a minimal Parquet file in memory (no
//! fixture file available) and reads it back through `SerializedFileReader`.

use parquet_format_safe as format;
use parquet_format_safe::thrift::protocol::{TCompactOutputProtocol, TOutputProtocol};

use parquet::column::reader::ColumnReader;
use parquet::errors::ParquetError;
use parquet::file::reader::{read_rows, FileReader, RowGroupReader, SerializedFileReader, SliceableCursor};
use parquet::record::api::RowField;
use parquet::schema::types::ColumnPath;

fn encode_page_header(header: &format::PageHeader) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut protocol = TCompactOutputProtocol::new(&mut buf);
        header.write_to_out_protocol(&mut protocol).expect("thrift encode should not fail");
        protocol.flush().unwrap();
    }
    buf
}

fn encode_file_metadata(metadata: &format::FileMetaData) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut protocol = TCompactOutputProtocol::new(&mut buf);
        metadata.write_to_out_protocol(&mut protocol).expect("thrift encode should not fail");
        protocol.flush().unwrap();
    }
    buf
}

fn page_bytes(header: format::PageHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = encode_page_header(&header);
    out.extend_from_slice(payload);
    out
}

fn int32_plain(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn byte_array_plain(values: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        out.extend_from_slice(&(v.len() as u32).to_le_bytes());
        out.extend_from_slice(v.as_bytes());
    }
    out
}

/// One bit-packed run of 8 def-level slots (values beyond `len` are padded
/// with 0), matching the RLE/bit-packed hybrid levels decode.
fn bit_packed_def_levels(values: &[u32]) -> Vec<u8> {
    assert!(values.len() <= 8);
    let header = (1u8 << 1) | 1; // one group of 8, bit-packed
    let mut byte = 0u8;
    for (i, v) in values.iter().enumerate() {
        byte |= (*v as u8) << i;
    }
    vec![header, byte]
}

fn length_prefixed(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Builds a single-row-group file with two columns: `id` (required int32)
/// and `name` (optional, UTF8-annotated byte array, middle row null).
fn build_sample_file() -> Vec<u8> {
    let mut file = Vec::new();
    file.extend_from_slice(b"PAR1");

    // id: required int32, no levels at all.
    let id_payload = int32_plain(&[1, 2, 3]);
    let id_header = format::PageHeader {
        type_: format::PageType::DATA_PAGE,
        uncompressed_page_size: id_payload.len() as i32,
        compressed_page_size: id_payload.len() as i32,
        crc: None,
        data_page_header: Some(format::DataPageHeader {
            num_values: 3,
            encoding: format::Encoding::PLAIN,
            definition_level_encoding: format::Encoding::RLE,
            repetition_level_encoding: format::Encoding::RLE,
            statistics: None,
        }),
        index_page_header: None,
        dictionary_page_header: None,
        data_page_header_v2: None,
    };
    let id_page_offset = file.len() as i64;
    let id_page_bytes = page_bytes(id_header, &id_payload);
    file.extend_from_slice(&id_page_bytes);

    // name: optional byte array, rows [Some("x"), None, Some("z")].
    let def_levels = length_prefixed(&bit_packed_def_levels(&[1, 0, 1]));
    let values = byte_array_plain(&["x", "z"]);
    let mut name_payload = def_levels;
    name_payload.extend_from_slice(&values);
    let name_header = format::PageHeader {
        type_: format::PageType::DATA_PAGE,
        uncompressed_page_size: name_payload.len() as i32,
        compressed_page_size: name_payload.len() as i32,
        crc: None,
        data_page_header: Some(format::DataPageHeader {
            num_values: 3,
            encoding: format::Encoding::PLAIN,
            definition_level_encoding: format::Encoding::RLE,
            repetition_level_encoding: format::Encoding::RLE,
            statistics: None,
        }),
        index_page_header: None,
        dictionary_page_header: None,
        data_page_header_v2: None,
    };
    let name_page_offset = file.len() as i64;
    let name_page_bytes = page_bytes(name_header, &name_payload);
    file.extend_from_slice(&name_page_bytes);

    let schema = vec![
        format::SchemaElement {
            type_: None,
            type_length: None,
            repetition_type: None,
            name: "schema".to_string(),
            num_children: Some(2),
            converted_type: None,
            scale: None,
            precision: None,
            field_id: None,
            logical_type: None,
        },
        format::SchemaElement {
            type_: Some(format::Type::INT32),
            type_length: None,
            repetition_type: Some(format::FieldRepetitionType::REQUIRED),
            name: "id".to_string(),
            num_children: None,
            converted_type: None,
            scale: None,
            precision: None,
            field_id: None,
            logical_type: None,
        },
        format::SchemaElement {
            type_: Some(format::Type::BYTE_ARRAY),
            type_length: None,
            repetition_type: Some(format::FieldRepetitionType::OPTIONAL),
            name: "name".to_string(),
            num_children: None,
            converted_type: Some(format::ConvertedType::UTF8),
            scale: None,
            precision: None,
            field_id: None,
            logical_type: None,
        },
    ];

    let id_chunk = format::ColumnChunk {
        file_path: None,
        file_offset: id_page_offset,
        meta_data: Some(format::ColumnMetaData {
            type_: format::Type::INT32,
            encodings: vec![format::Encoding::PLAIN],
            path_in_schema: vec!["id".to_string()],
            codec: format::CompressionCodec::UNCOMPRESSED,
            num_values: 3,
            total_uncompressed_size: id_page_bytes.len() as i64,
            total_compressed_size: id_page_bytes.len() as i64,
            key_value_metadata: None,
            data_page_offset: id_page_offset,
            index_page_offset: None,
            dictionary_page_offset: None,
            statistics: None,
            encoding_stats: None,
            bloom_filter_offset: None,
            bloom_filter_length: None,
        }),
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
        crypto_metadata: None,
        encrypted_column_metadata: None,
    };
    let name_chunk = format::ColumnChunk {
        file_path: None,
        file_offset: name_page_offset,
        meta_data: Some(format::ColumnMetaData {
            type_: format::Type::BYTE_ARRAY,
            encodings: vec![format::Encoding::PLAIN],
            path_in_schema: vec!["name".to_string()],
            codec: format::CompressionCodec::UNCOMPRESSED,
            num_values: 3,
            total_uncompressed_size: name_page_bytes.len() as i64,
            total_compressed_size: name_page_bytes.len() as i64,
            key_value_metadata: None,
            data_page_offset: name_page_offset,
            index_page_offset: None,
            dictionary_page_offset: None,
            statistics: None,
            encoding_stats: None,
            bloom_filter_offset: None,
            bloom_filter_length: None,
        }),
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
        crypto_metadata: None,
        encrypted_column_metadata: None,
    };

    let row_group = format::RowGroup {
        columns: vec![id_chunk, name_chunk],
        total_byte_size: (id_page_bytes.len() + name_page_bytes.len()) as i64,
        num_rows: 3,
        sorting_columns: None,
        file_offset: None,
        total_compressed_size: None,
        ordinal: None,
    };

    let file_metadata = format::FileMetaData {
        version: 1,
        schema,
        num_rows: 3,
        row_groups: vec![row_group],
        key_value_metadata: None,
        created_by: Some("parquet-rs test".to_string()),
        column_orders: None,
        encryption_algorithm: None,
        footer_signing_key_metadata: None,
    };

    let footer_bytes = encode_file_metadata(&file_metadata);
    file.extend_from_slice(&footer_bytes);
    file.extend_from_slice(&(footer_bytes.len() as u32).to_le_bytes());
    file.extend_from_slice(b"PAR1");

    file
}

#[test]
fn reads_footer_and_row_group_metadata() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).expect("valid parquet bytes should parse");

    let file_meta = reader.metadata().file_metadata();
    assert_eq!(file_meta.num_rows(), 3);
    assert_eq!(file_meta.created_by(), Some("parquet-rs test"));
    assert_eq!(file_meta.schema_descr().num_columns(), 2);

    assert_eq!(reader.num_row_groups(), 1);
    let row_group = reader.get_row_group(0).unwrap();
    assert_eq!(row_group.num_columns(), 2);
    assert_eq!(row_group.metadata().num_rows(), 3);
}

#[test]
fn reads_required_int32_column_values() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).unwrap();
    let row_group = reader.get_row_group(0).unwrap();

    let column_reader = row_group.get_column_reader(0).unwrap();
    let mut typed = match column_reader {
        ColumnReader::Int32ColumnReader(r) => r,
        _ => panic!("expected an Int32 column reader"),
    };

    let mut values = [0i32; 3];
    let (values_read, levels_read) = typed.read_batch(3, None, None, &mut values).unwrap();
    assert_eq!(values_read, 3);
    assert_eq!(levels_read, 3);
    assert_eq!(values, [1, 2, 3]);
}

#[test]
fn reads_rows_across_columns_with_nulls() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).unwrap();

    let rows = read_rows(&reader).expect("flat schema should be readable as rows");
    assert_eq!(rows.len(), 3);

    let id_of = |row: &parquet::record::api::Row| match row.fields().iter().find(|(n, _)| n == "id").unwrap().1 {
        RowField::Int(v) => v,
        ref other => panic!("expected Int, got {:?}", other),
    };
    let name_of = |row: &parquet::record::api::Row| row.fields().iter().find(|(n, _)| n == "name").unwrap().1.clone();

    assert_eq!(id_of(&rows[0]), 1);
    assert_eq!(id_of(&rows[1]), 2);
    assert_eq!(id_of(&rows[2]), 3);

    assert_eq!(name_of(&rows[0]), RowField::Str("x".to_string()));
    assert_eq!(name_of(&rows[1]), RowField::Null);
    assert_eq!(name_of(&rows[2]), RowField::Str("z".to_string()));
}

#[test]
fn dump_respects_column_selection_and_limit() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).unwrap();

    let mut names = Vec::new();
    reader
        .dump(0, &[ColumnPath::new(vec!["name".to_string()])], Some(2), |row| {
            assert_eq!(row.fields().len(), 1);
            names.push(row.fields()[0].1.clone());
        })
        .expect("selecting a known column should succeed");

    assert_eq!(names, vec![RowField::Str("x".to_string()), RowField::Null]);
}

#[test]
fn dump_with_empty_selection_yields_every_column() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).unwrap();

    let mut rows = Vec::new();
    reader.dump(0, &[], None, |row| rows.push(row)).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].fields().len(), 2);
}

#[test]
fn dump_rejects_unknown_column() {
    let bytes = build_sample_file();
    let cursor = SliceableCursor::new(bytes);
    let reader = SerializedFileReader::new(cursor).unwrap();

    let err = reader
        .dump(0, &[ColumnPath::new(vec!["does_not_exist".to_string()])], None, |_row| {})
        .unwrap_err();
    assert!(matches!(err, ParquetError::UnknownColumn(ref path) if path.as_str() == "does_not_exist"));
}

#[test]
fn rejects_truncated_file() {
    let mut bytes = build_sample_file();
    bytes.truncate(10);
    let cursor = SliceableCursor::new(bytes);
    assert!(SerializedFileReader::new(cursor).is_err());
}
