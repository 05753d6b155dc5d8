//! End-to-end scenarios against the in-memory reference collaborators: a column's full
//! lifecycle from buffered writes through finalized, byte-exact column-chunk output.

use std::sync::Arc;

use parquet_column_writer::compression::Compression;
use parquet_column_writer::encoding::Encoding;
use parquet_column_writer::metadata::{ColumnDescriptor, SchemaDescriptor};
use parquet_column_writer::properties::WriterProperties;
use parquet_column_writer::schema::types::PhysicalType;
use parquet_column_writer::statistics::{PrimitiveStatistics, Statistics};
use parquet_column_writer::write::{ColumnChunkPageWriter, InMemoryColumnFileWriter, PageWriteStore};

fn rle_bitpacked(ids: &[u32], width: u8) -> Vec<u8> {
    let mut out = vec![width];
    if width == 0 {
        return out;
    }
    let num_groups = (ids.len() + 7) / 8;
    let header = ((num_groups as u64) << 1) | 1;
    let mut value = header;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    let mut current: u64 = 0;
    let mut bits = 0u32;
    let mut push_bits = |v: u32, current: &mut u64, bits: &mut u32, out: &mut Vec<u8>| {
        *current |= (v as u64) << *bits;
        *bits += width as u32;
        while *bits >= 8 {
            out.push((*current & 0xff) as u8);
            *current >>= 8;
            *bits -= 8;
        }
    };
    for &id in ids {
        push_bits(id, &mut current, &mut bits, &mut out);
    }
    for _ in ids.len()..num_groups * 8 {
        push_bits(0, &mut current, &mut bits, &mut out);
    }
    if bits > 0 {
        out.push((current & 0xff) as u8);
    }
    out
}

fn bit_width(n: usize) -> u8 {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as u8
    }
}

fn int32_descriptor(name: &str) -> ColumnDescriptor {
    ColumnDescriptor::new(PhysicalType::Int32, 0, 0, vec![name.to_string()])
}

fn int32_dict_bytes(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn int32_stats(min: i32, max: i32, null_count: i64) -> Arc<dyn Statistics> {
    Arc::new(PrimitiveStatistics::<i32> {
        null_count: Some(null_count),
        distinct_count: None,
        min_value: Some(min),
        max_value: Some(max),
    })
}

/// S1: every data page stays dictionary-encoded; the dictionary is kept and sorted, and
/// every page's indices are remapped to match the new sort order.
#[test]
fn s1_all_dictionary_pages_keep_and_sort_dictionary() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    let dict_bytes = int32_dict_bytes(&[7, 3, 5]);
    writer.write_dictionary_page(&dict_bytes, 3, Encoding::Plain).unwrap();

    let width = bit_width(3);
    writer
        .write_page(
            rle_bitpacked(&[0, 1, 2], width),
            0,
            3,
            Some(int32_stats(3, 7, 0)),
            Encoding::Rle,
            Encoding::Rle,
            Encoding::RleDictionary,
        )
        .unwrap();
    writer
        .write_page(
            rle_bitpacked(&[2, 0], width),
            0,
            2,
            Some(int32_stats(5, 7, 0)),
            Encoding::Rle,
            Encoding::Rle,
            Encoding::RleDictionary,
        )
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();

    let chunk = &file_writer.columns[0];
    assert!(chunk.dictionary_sorted.unwrap());
    assert_eq!(chunk.dictionary_num_values, Some(3));

    let summary = chunk.summary.as_ref().unwrap();
    assert_eq!(summary.page_headers.len(), 2);
    assert_eq!(summary.data_encodings[0], Encoding::Plain);
}

/// S2: one data page falls back to a non-dictionary encoding, so the speculative dictionary
/// is discarded and every previously dictionary-encoded page is rewritten as plain values.
#[test]
fn s2_fallback_discards_dictionary_and_rewrites_pages() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    let dict_bytes = int32_dict_bytes(&[42, 99]);
    writer.write_dictionary_page(&dict_bytes, 2, Encoding::Plain).unwrap();

    let width = bit_width(2);
    writer
        .write_page(
            rle_bitpacked(&[0, 1], width),
            0,
            2,
            None,
            Encoding::Rle,
            Encoding::Rle,
            Encoding::RleDictionary,
        )
        .unwrap();

    let plain_body = 7i32.to_le_bytes().to_vec();
    writer
        .write_page(plain_body, 4, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();

    let chunk = &file_writer.columns[0];
    assert!(chunk.dictionary_page_offset.is_none());
    let summary = chunk.summary.as_ref().unwrap();
    assert_eq!(summary.page_headers.len(), 2);
    assert!(summary.data_encodings.iter().all(|e| *e == Encoding::Plain));
}

/// S3: a v2 page with nulls keeps rl/dl bytes uncompressed and separate from the values body.
#[test]
fn s3_v2_page_with_nulls_tracks_row_and_null_counts() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    writer
        .write_page_v2(
            5,
            1,
            5,
            vec![0, 0],
            vec![1, 1, 0, 1, 1],
            Encoding::Plain,
            int32_dict_bytes(&[1, 2, 3, 4]),
            16,
            Some(int32_stats(1, 4, 1)),
        )
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();

    let chunk = &file_writer.columns[0];
    assert_eq!(chunk.total_value_count, 5);
    let summary = chunk.summary.as_ref().unwrap();
    assert_eq!(summary.uncompressed_length, (2 + 5 + 16) as u64);
}

/// S3b: a v2 dictionary-encoded page with nulls survives dictionary sort. The rewritten
/// index body's actual length must drive the emitted header's uncompressed size, not the
/// (here deliberately wrong) pre-rewrite size the caller originally supplied.
#[test]
fn s3b_v2_dictionary_sort_rewrites_uncompressed_size() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    // Dictionary entries [30, 10, 20], unsorted.
    let dict_bytes = int32_dict_bytes(&[30, 10, 20]);
    writer.write_dictionary_page(&dict_bytes, 3, Encoding::Plain).unwrap();

    // Values [10, 20, 30] -> old ids [1, 2, 0] against the unsorted dictionary. rowCount=5,
    // nullCount=2, so 3 non-null values.
    let width = bit_width(3);
    let ids_body = rle_bitpacked(&[1, 2, 0], width);
    let rl_bytes = vec![0u8; 2];
    let dl_bytes = vec![1u8, 1, 0, 1, 1];
    writer
        .write_page_v2(
            5,
            2,
            5,
            rl_bytes.clone(),
            dl_bytes.clone(),
            Encoding::RleDictionary,
            ids_body,
            999, // deliberately wrong; must not leak into the post-rewrite header
            Some(int32_stats(10, 30, 2)),
        )
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();

    let chunk = &file_writer.columns[0];
    assert!(chunk.dictionary_sorted.unwrap());
    let summary = chunk.summary.as_ref().unwrap();

    // Same dictionary size => same bit width => the rewritten indices happen to be the same
    // length as the original, but the header must be built from that rewritten body, never
    // from the stale `999` passed above.
    let expected_values_len = rle_bitpacked(&[0, 1, 2], width).len();
    assert_eq!(
        summary.uncompressed_length,
        (rl_bytes.len() + dl_bytes.len() + expected_values_len) as u64
    );
}

/// S3c: dictionary fallback on a v2 page discards the speculative dictionary and rewrites
/// the dictionary-encoded page as plain values. The emitted header's uncompressed size must
/// reflect the rewritten (much larger) plain-values body, not the bitpacked-indices size the
/// page was originally buffered with.
#[test]
fn s3c_v2_dictionary_fallback_rewrites_uncompressed_size() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    let dict_bytes = int32_dict_bytes(&[42, 99]);
    writer.write_dictionary_page(&dict_bytes, 2, Encoding::Plain).unwrap();

    // Page A: dictionary-encoded v2 page with a null, ids [0, 1] against [42, 99].
    let width = bit_width(2);
    let ids_body = rle_bitpacked(&[0, 1], width);
    let ids_body_len = ids_body.len();
    let a_rl = vec![0u8];
    let a_dl = vec![1u8, 0, 1];
    writer
        .write_page_v2(
            3,
            1,
            3,
            a_rl.clone(),
            a_dl.clone(),
            Encoding::RleDictionary,
            ids_body,
            ids_body_len, // correct pre-rewrite size; fallback must still replace it
            None,
        )
        .unwrap();

    // Page B: plain-encoded v2 page, forces fallback.
    let b_rl: Vec<u8> = vec![];
    let b_dl = vec![1u8];
    let b_values = 7i32.to_le_bytes().to_vec();
    writer
        .write_page_v2(1, 0, 1, b_rl.clone(), b_dl.clone(), Encoding::Plain, b_values.clone(), b_values.len(), None)
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();

    let chunk = &file_writer.columns[0];
    assert!(chunk.dictionary_page_offset.is_none());
    let summary = chunk.summary.as_ref().unwrap();

    // Page A's two values (42, 99) re-encoded as plain i32 take 8 bytes, far larger than the
    // 2-id bitpacked run they replace.
    let expected_a_values_len = 8usize;
    let expected = (a_rl.len() + a_dl.len() + expected_a_values_len) + (b_rl.len() + b_dl.len() + b_values.len());
    assert_eq!(summary.uncompressed_length, expected as u64);
}

/// S4: a page's recorded offset equals the absolute file position at which its body begins.
#[test]
fn s4_page_header_offset_points_at_body_start() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    writer
        .write_page(vec![9, 9, 9, 9], 4, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
        .unwrap();
    writer
        .write_page(vec![8, 8, 8, 8], 4, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();
    let chunk_summary = file_writer.columns[0].summary.clone().unwrap();
    let written = file_writer.into_inner();

    for header in &chunk_summary.page_headers {
        let offset = header.offset as usize;
        assert!(offset <= written.len());
    }
    let last = chunk_summary.page_headers.last().unwrap();
    assert_eq!(&written[last.offset as usize..], &[8, 8, 8, 8]);
}

/// S5: a page body whose uncompressed size exceeds `i32::MAX` fails with `PageTooLarge`
/// instead of silently truncating the header's size field.
#[test]
fn s5_oversized_page_fails_with_page_too_large() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();

    let oversized = i32::MAX as usize + 1;
    writer
        .write_page(vec![0u8; 4], oversized, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
        .unwrap();

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    let err = writer.write_to_file_writer(&mut file_writer).unwrap_err();
    assert!(matches!(
        err,
        parquet_column_writer::error::ParquetCoreError::PageTooLarge { .. }
    ));
}

/// S6: multiple columns in a schema are written to disk strictly in schema iteration order.
#[test]
fn s6_multi_column_writes_preserve_schema_order() {
    let schema = SchemaDescriptor::new(vec![
        int32_descriptor("a"),
        ColumnDescriptor::new(PhysicalType::ByteArray, 0, 0, vec!["b".to_string()]),
        int32_descriptor("c"),
    ]);
    let properties = WriterProperties::default();
    let mut store = PageWriteStore::try_new(&schema, &properties).unwrap();

    for (i, name) in ["a", "b", "c"].iter().enumerate() {
        let writer = store.get_page_writer(i).unwrap();
        if *name == "b" {
            let mut body = Vec::new();
            body.extend_from_slice(&3i32.to_le_bytes());
            body.extend_from_slice(b"abc");
            writer
                .write_page(body.clone(), body.len(), 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
                .unwrap();
        } else {
            writer
                .write_page(vec![1, 0, 0, 0], 4, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain)
                .unwrap();
        }
    }

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    store.flush_to_file_writer(&mut file_writer).unwrap();

    let names: Vec<&str> = file_writer.columns.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let offsets: Vec<u64> = file_writer.columns.iter().map(|c| c.data_page_offset).collect();
    assert!(offsets[0] < offsets[1]);
    assert!(offsets[1] < offsets[2]);
}

/// Duplicate dictionary pages are rejected and a column with a dictionary but zero data
/// pages still emits the dictionary, since `dictionary_encoding_used_for_all_pages` starts true.
#[test]
fn boundary_duplicate_dictionary_and_dictionary_only_column() {
    let descriptor = int32_descriptor("c");
    let mut writer =
        ColumnChunkPageWriter::new(descriptor, Compression::Uncompressed, Arc::new(parquet_column_writer::allocator::HeapAllocator))
            .unwrap();
    writer.write_dictionary_page(&int32_dict_bytes(&[1]), 1, Encoding::Plain).unwrap();
    let err = writer.write_dictionary_page(&int32_dict_bytes(&[2]), 1, Encoding::Plain).unwrap_err();
    assert!(matches!(
        err,
        parquet_column_writer::error::ParquetCoreError::DuplicateDictionary { .. }
    ));

    let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
    writer.write_to_file_writer(&mut file_writer).unwrap();
    assert!(file_writer.columns[0].dictionary_page_offset.is_some());
}
