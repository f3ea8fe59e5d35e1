use std::sync::Arc;

use super::*;
use crate::{
    schema::{RowSchema, SchemaField},
    varint,
};

fn schema_of(kinds: &[FieldKind], version: u64) -> Arc<dyn SchemaProvider> {
    let fields = kinds
        .iter()
        .enumerate()
        .map(|(idx, kind)| SchemaField::new(format!("f{idx}"), *kind))
        .collect();
    Arc::new(RowSchema::new(fields).with_version(version))
}

#[test]
fn eighteen_bools_end_to_end() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool; 18], 0));
    for _ in 0..18 {
        writer.write(true).unwrap();
    }

    assert_eq!(writer.block_offsets(), &[17]);
    assert_eq!(writer.body_size(), 18);
    assert_eq!(writer.size(), 20);

    let row = writer.encode().unwrap();
    let mut expected = vec![0x00, 17];
    expected.extend_from_slice(&[1; 18]);
    assert_eq!(row, expected);
}

#[test]
fn block_offsets_land_on_multiples_of_sixteen() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Int; 50], 0));
    let mut body_size = 0usize;
    let mut expected = Vec::new();
    for idx in 0..50i64 {
        let value = idx * 37;
        writer.write(value).unwrap();
        body_size += varint::encoded_len(value as u64);
        if idx != 0 && idx % 16 == 0 {
            expected.push(body_size as u64);
        }
        assert_eq!(writer.body_size(), body_size);
    }

    assert_eq!(expected.len(), 3);
    assert_eq!(writer.block_offsets(), expected.as_slice());
}

#[test]
fn size_matches_finalized_length() {
    for version in [0u64, 1, 300, 70_000] {
        for len in [1usize, 10, 2_000] {
            let text = "x".repeat(len);
            let mut writer = RowWriter::new(schema_of(&[FieldKind::String; 40], version));
            for _ in 0..40 {
                writer.write(text.as_str()).unwrap();
            }

            let predicted = writer.size();
            let row = writer.finalize().unwrap();
            assert_eq!(predicted, row.size(), "version={version} len={len}");
            assert_eq!(writer.size(), row.size());
        }
    }
}

#[test]
fn wide_body_uses_wide_offsets() {
    let text = "y".repeat(2_000);
    let mut writer = RowWriter::new(schema_of(&[FieldKind::String; 40], 0));
    for _ in 0..40 {
        writer.write(text.as_str()).unwrap();
    }
    let row = writer.encode().unwrap();

    // 40 * (2 byte length + 2000 bytes) needs three offset bytes.
    assert_eq!(row[0] & header::OFFSET_WIDTH_MASK, 2);
    let first_offset = u64::from_le_bytes([row[1], row[2], row[3], 0, 0, 0, 0, 0]);
    assert_eq!(first_offset, 17 * 2_002);
}

#[test]
fn finalize_is_idempotent() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Int; 20], 9));
    for idx in 0..20 {
        writer.write(idx).unwrap();
    }

    let first = writer.finalize().unwrap();
    let offsets = writer.block_offsets().to_vec();
    let body_size = writer.body_size();

    let second = writer.finalize().unwrap();
    assert_eq!(first.to_vec(), second.to_vec());
    assert_eq!(writer.block_offsets(), offsets.as_slice());
    assert_eq!(writer.body_size(), body_size);
    assert_eq!(writer.encode().unwrap(), first.to_vec());
}

#[test]
fn versioned_header_layout() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool], 300));
    writer.write(true).unwrap();
    assert_eq!(writer.encode().unwrap(), vec![2 << 5, 0x2C, 0x01, 0x01]);
}

#[test]
fn mismatched_values_fall_back_to_declared_defaults() {
    let mut writer = RowWriter::new(schema_of(
        &[
            FieldKind::Int,
            FieldKind::Bool,
            FieldKind::String,
            FieldKind::Double,
            FieldKind::Vid,
            FieldKind::Float,
        ],
        0,
    ));
    writer
        .write("text")
        .unwrap()
        .write(5)
        .unwrap()
        .write(true)
        .unwrap()
        .write(1.5f32)
        .unwrap()
        .write(7)
        .unwrap()
        .write(2.5f64)
        .unwrap();

    let row = writer.encode().unwrap();
    let mut expected = vec![0x00];
    expected.extend_from_slice(&[0, 0, 0]);
    expected.extend_from_slice(&1.5f64.to_ne_bytes());
    expected.extend_from_slice(&7i64.to_ne_bytes());
    expected.extend_from_slice(&2.5f32.to_ne_bytes());
    assert_eq!(row, expected);
}

#[test]
fn negative_ints_take_full_varint() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Timestamp], 0));
    writer.write(-1i64).unwrap();
    assert_eq!(writer.body_size(), varint::MAX_VARINT_LEN);
}

#[test]
fn unknown_kind_is_rejected() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Unknown], 0));
    assert_eq!(
        writer.write(1).unwrap_err(),
        RowError::UnsupportedKind {
            index: 0,
            kind: FieldKind::Unknown
        }
    );

    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool, FieldKind::Unknown], 0));
    writer.write(true).unwrap();
    assert!(matches!(
        writer.finalize(),
        Err(RowError::UnsupportedKind { index: 1, .. })
    ));
}

#[test]
fn writing_past_schema_is_rejected() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool], 0));
    writer.write(true).unwrap();
    assert_eq!(
        writer.write(false).unwrap_err(),
        RowError::ColumnOutOfRange {
            index: 1,
            num_fields: 1
        }
    );
}

#[test]
fn modes_do_not_mix() {
    let mut fixed = RowWriter::new(schema_of(&[FieldKind::Bool], 0));
    assert!(matches!(
        fixed.declare_name("a"),
        Err(RowError::ModeViolation(_))
    ));
    assert!(matches!(
        fixed.declare_kind(FieldKind::Int),
        Err(RowError::ModeViolation(_))
    ));

    let mut defining = RowWriter::schema_defining();
    assert!(matches!(defining.skip(1), Err(RowError::ModeViolation(_))));
}

#[test]
fn finalized_rows_take_no_more_fields() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool, FieldKind::Bool], 0));
    writer.write(true).unwrap();
    writer.finalize().unwrap();
    assert_eq!(writer.write(true).unwrap_err(), RowError::Finalized);
    assert_eq!(writer.skip(1).unwrap_err(), RowError::Finalized);
}

#[test]
fn finalize_pads_missing_fields() {
    let mut writer = RowWriter::new(schema_of(
        &[
            FieldKind::Bool,
            FieldKind::Int,
            FieldKind::String,
            FieldKind::Double,
        ],
        0,
    ));
    writer.write(true).unwrap();
    let row = writer.encode().unwrap();

    let mut expected = vec![0x00, 1, 0, 0];
    expected.extend_from_slice(&0f64.to_ne_bytes());
    assert_eq!(row, expected);
    assert_eq!(writer.column_index(), 4);
}

#[test]
fn skip_is_bounded_by_schema() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Int; 3], 0));
    writer.skip(0).unwrap();
    assert_eq!(writer.column_index(), 0);
    writer.skip(10).unwrap();
    assert_eq!(writer.column_index(), 3);
    assert_eq!(writer.body_size(), 3);
}

#[test]
fn skip_records_block_offsets() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool; 33], 0));
    writer.write(true).unwrap();
    writer.skip(40).unwrap();
    assert_eq!(writer.block_offsets(), &[17, 33]);
}

#[test]
fn schema_defining_mode_builds_schema() {
    let mut writer = RowWriter::schema_defining();
    writer
        .declare_name("name")
        .unwrap()
        .declare_kind(FieldKind::String)
        .unwrap()
        .write("alice")
        .unwrap()
        .write(30)
        .unwrap()
        .declare_kind(FieldKind::Double)
        .unwrap()
        .write(1.5f32)
        .unwrap();

    let row = writer.encode().unwrap();
    let mut expected = vec![0x00, 5];
    expected.extend_from_slice(b"alice");
    expected.push(30);
    expected.extend_from_slice(&1.5f64.to_ne_bytes());
    assert_eq!(row, expected);

    let schema = writer.into_schema().expect("defined schema");
    assert_eq!(
        schema.fields(),
        &[
            SchemaField::new("name", FieldKind::String),
            SchemaField::new("Column1", FieldKind::Int),
            SchemaField::new("Column2", FieldKind::Double),
        ]
    );
}

#[test]
fn schema_defining_version_is_stamped() {
    let mut writer = RowWriter::schema_defining_with_version(5);
    writer.write(false).unwrap();
    assert_eq!(writer.encode().unwrap(), vec![1 << 5, 5, 0]);
}

#[test]
fn commands_replay_through_apply() {
    let commands = vec![
        WriterCommand::FieldName("flag".to_string()),
        WriterCommand::from(Value::Bool(true)),
        WriterCommand::FieldKind(FieldKind::Vid),
        WriterCommand::Value(Value::Int(42)),
    ];

    let mut writer = RowWriter::schema_defining();
    for command in commands {
        writer.apply(command).unwrap();
    }
    let row = writer.encode().unwrap();

    let mut expected = vec![0x00, 1];
    expected.extend_from_slice(&42i64.to_ne_bytes());
    assert_eq!(row, expected);
    assert_eq!(writer.schema().field_name(0), Some("flag"));
    assert_eq!(writer.schema().field_kind(1), Some(FieldKind::Vid));

    let mut fixed = RowWriter::new(schema_of(&[FieldKind::Int; 4], 0));
    fixed.apply(WriterCommand::Skip(2)).unwrap();
    assert_eq!(fixed.column_index(), 2);
}

#[test]
fn owned_row_keeps_headroom() {
    let mut writer = RowWriter::new(schema_of(&[FieldKind::Bool], 0));
    writer.write(true).unwrap();
    let row = writer.into_cord().unwrap();
    assert_eq!(row.headroom(), MAX_VARINT_LEN);
    assert_eq!(row.to_vec(), vec![0x00, 0x01]);
}

#[test]
fn fixed_writer_has_no_defined_schema() {
    let writer = RowWriter::new(schema_of(&[FieldKind::Bool], 0));
    assert!(!writer.is_schema_defining());
    assert!(writer.into_schema().is_none());
}

#[test]
fn rejected_kind_leaves_defined_schema_untouched() {
    let mut writer = RowWriter::schema_defining();
    writer
        .declare_name("bad")
        .unwrap()
        .declare_kind(FieldKind::Unknown)
        .unwrap();
    assert_eq!(
        writer.write(1).unwrap_err(),
        RowError::UnsupportedKind {
            index: 0,
            kind: FieldKind::Unknown
        }
    );
    assert_eq!(writer.schema().num_fields(), 0);
    assert_eq!(writer.column_index(), 0);

    writer.write(7).unwrap();
    assert_eq!(writer.encode().unwrap(), vec![0x00, 7]);

    let schema = writer.into_schema().expect("defined schema");
    assert_eq!(
        schema.fields(),
        &[SchemaField::new("Column0", FieldKind::Int)]
    );
}
