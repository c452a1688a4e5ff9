// スキーマドメインモデル
//
// データベース方言に依存しないテーブル定義を表現する型システム。
// Table, Column, DataType の構造体を提供します。
// アダプター層はこのモデルを入力として各方言のDDLを生成します。

use serde::{Deserialize, Serialize};

use crate::core::error::SchemaError;

/// 汎用データ型
///
/// サポートされるデータ型の列挙。各方言アダプターが
/// ネイティブのカラム型文字列へマッピングします。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 整数型
    Integer,

    /// 浮動小数点数型
    Float,

    /// 文字列型
    String,

    /// 日時型
    Datetime,

    /// 真偽値型
    Boolean,

    /// バイナリ型
    Bytes,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => write!(f, "integer"),
            DataType::Float => write!(f, "float"),
            DataType::String => write!(f, "string"),
            DataType::Datetime => write!(f, "datetime"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Bytes => write!(f, "bytes"),
        }
    }
}

/// カラム定義
///
/// テーブル内の単一カラムの構造を表現します。
/// Tableの構築後は変更されない値として扱います。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// カラム名（テーブル内で一意）
    pub name: String,

    /// データ型
    #[serde(rename = "type")]
    pub data_type: DataType,

    /// NULL許可フラグ
    pub nullable: bool,

    /// セカンダリインデックス作成フラグ
    ///
    /// trueの場合、テーブル作成後にこのカラム単体のインデックスが作成されます。
    pub indexed: bool,
}

impl Column {
    /// 新しいカラムを作成
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            indexed: false,
        }
    }

    /// インデックス作成フラグを立てたカラムを返す
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// テーブル定義
///
/// 単一のテーブルの構造を表現します。カラムの並び順は生成される
/// DDLの宣言順をそのまま決定します。プライマリキーはカラム名の
/// リストで保持し、空リストはプライマリキーなしを意味します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// テーブル名
    pub name: String,

    /// スキーマ（名前空間）修飾子
    pub schema: Option<String>,

    /// カラム定義のリスト（宣言順）
    pub columns: Vec<Column>,

    /// プライマリキーを構成するカラム名のリスト
    pub primary_keys: Vec<String>,
}

impl Table {
    /// 新しいテーブルを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_keys: Vec::new(),
        }
    }

    /// スキーマ修飾子付きのテーブルを作成
    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Some(schema.into()),
            columns: Vec::new(),
            primary_keys: Vec::new(),
        }
    }

    /// カラムを追加
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// プライマリキーカラムを追加
    pub fn add_primary_key(&mut self, column_name: impl Into<String>) {
        self.primary_keys.push(column_name.into());
    }

    /// 指定されたカラムを取得
    pub fn get_column(&self, column_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == column_name)
    }

    /// プライマリキーを持つかどうか
    pub fn has_primary_key(&self) -> bool {
        !self.primary_keys.is_empty()
    }

    /// 修飾済みテーブル名を取得
    ///
    /// スキーマ修飾子がある場合は `schema.name` 形式、
    /// ない場合はテーブル名のみを返します。
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// テーブル定義の整合性を検証
    ///
    /// カラム名の重複と、定義されていないカラムを指すプライマリキーを
    /// 検出します。アダプターは入力を検証しないため、呼び出し側が
    /// 構築後に呼び出すことを想定しています。
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        for pk in &self.primary_keys {
            if self.get_column(pk).is_none() {
                return Err(SchemaError::UnknownPrimaryKeyColumn {
                    table: self.name.clone(),
                    column: pk.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new("users");
        assert_eq!(table.name, "users");
        assert!(table.schema.is_none());
        assert_eq!(table.columns.len(), 0);
        assert!(!table.has_primary_key());
    }

    #[test]
    fn test_column_new() {
        let column = Column::new("id", DataType::Integer, false);
        assert_eq!(column.name, "id");
        assert!(!column.nullable);
        assert!(!column.indexed);
    }

    #[test]
    fn test_column_indexed_builder() {
        let column = Column::new("email", DataType::String, false).indexed();
        assert!(column.indexed);
    }

    #[test]
    fn test_full_name_without_schema() {
        let table = Table::new("users");
        assert_eq!(table.full_name(), "users");
    }

    #[test]
    fn test_full_name_with_schema() {
        let table = Table::with_schema("public", "users");
        assert_eq!(table.full_name(), "public.users");
    }

    #[test]
    fn test_column_order_is_preserved() {
        let mut table = Table::new("orders");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_column(Column::new("total", DataType::Float, true));
        table.add_column(Column::new("note", DataType::String, true));

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "total", "note"]);
    }

    #[test]
    fn test_validate_ok() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_column(Column::new("email", DataType::String, false));
        table.add_primary_key("id");

        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_primary_key_is_legal() {
        // プライマリキーなしのテーブルは正当
        let mut table = Table::new("logs");
        table.add_column(Column::new("message", DataType::String, true));

        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_primary_key_column() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_primary_key("missing");

        let err = table.validate().unwrap_err();
        assert!(err.is_unknown_primary_key_column());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validate_duplicate_column() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_column(Column::new("id", DataType::String, true));

        let err = table.validate().unwrap_err();
        assert!(err.is_duplicate_column());
    }

    #[test]
    fn test_get_column() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", DataType::Integer, false));

        assert!(table.get_column("id").is_some());
        assert!(table.get_column("nope").is_none());
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Integer.to_string(), "integer");
        assert_eq!(DataType::Datetime.to_string(), "datetime");
    }
}
