//! Conversions between domain types and the column values stored in SQLite.

use callbook_core::provider::{DataKind, DataRow};

/// `LIKE` pattern matching `text` anywhere, with `%`, `_` and `\` escaped.
/// Use together with `ESCAPE '\'`.
pub fn like_contains(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for ch in text.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(ch);
  }
  pattern.push('%');
  pattern
}

/// A data row flattened to `(mimetype, data1, data2)`.
pub struct EncodedDataRow {
  pub mimetype: &'static str,
  pub data1:    String,
  pub data2:    Option<i64>,
}

pub fn encode_data_row(row: DataRow) -> EncodedDataRow {
  let mimetype: &'static str = row.kind().into();
  match row {
    DataRow::StructuredName { display_name } => EncodedDataRow {
      mimetype,
      data1: display_name,
      data2: None,
    },
    DataRow::Phone { number, kind } => EncodedDataRow {
      mimetype,
      data1: number,
      data2: Some(kind.code()),
    },
  }
}

pub fn mimetype(kind: DataKind) -> &'static str { kind.into() }

#[cfg(test)]
mod tests {
  use callbook_core::provider::PhoneType;

  use super::*;

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_contains("lin"), "%lin%");
    assert_eq!(like_contains("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_contains("a\\b"), "%a\\\\b%");
  }

  #[test]
  fn phone_rows_carry_type_code() {
    let encoded = encode_data_row(DataRow::Phone {
      number: "0933444555".into(),
      kind:   PhoneType::Mobile,
    });
    assert_eq!(encoded.mimetype, "vnd.android.cursor.item/phone_v2");
    assert_eq!(encoded.data1, "0933444555");
    assert_eq!(encoded.data2, Some(2));
  }
}
