// 型マッピング
//
// 汎用データ型から各方言のネイティブなカラム型文字列への変換を提供します。
// 各方言アダプターは自身のマッパーを保持し、カラム定義の生成時に使用します。

use crate::core::schema::DataType;

/// 方言固有の型マッピング
///
/// 各データベース方言固有の型変換ロジックを提供するトレイト。
pub trait TypeMapper: Send + Sync {
    /// DataTypeからネイティブのSQL型文字列へ変換
    fn format_sql_type(&self, data_type: &DataType) -> &'static str;
}

/// PostgreSQL用型マッパー
#[derive(Debug, Clone, Default)]
pub struct PostgresTypeMapper;

impl TypeMapper for PostgresTypeMapper {
    fn format_sql_type(&self, data_type: &DataType) -> &'static str {
        match data_type {
            DataType::Integer => "INTEGER",
            DataType::Float => "DOUBLE PRECISION",
            DataType::String => "TEXT",
            DataType::Datetime => "TIMESTAMP",
            DataType::Boolean => "BOOLEAN",
            DataType::Bytes => "BYTEA",
        }
    }
}

/// MySQL用型マッパー
///
/// 文字列型はTEXTではなくVARCHAR(255)へマッピングします。MySQLのTEXT型は
/// プレフィックス長なしでインデックスを作成できないため、indexedフラグ付きの
/// カラムがそのままインデックス対象になるようにします。
#[derive(Debug, Clone, Default)]
pub struct MySqlTypeMapper;

impl TypeMapper for MySqlTypeMapper {
    fn format_sql_type(&self, data_type: &DataType) -> &'static str {
        match data_type {
            DataType::Integer => "INT",
            DataType::Float => "DOUBLE",
            DataType::String => "VARCHAR(255)",
            DataType::Datetime => "DATETIME",
            DataType::Boolean => "TINYINT(1)",
            DataType::Bytes => "BLOB",
        }
    }
}

/// SQLite用型マッパー
#[derive(Debug, Clone, Default)]
pub struct SqliteTypeMapper;

impl TypeMapper for SqliteTypeMapper {
    fn format_sql_type(&self, data_type: &DataType) -> &'static str {
        match data_type {
            DataType::Integer => "INTEGER",
            DataType::Float => "REAL",
            DataType::String => "TEXT",
            DataType::Datetime => "TEXT",
            DataType::Boolean => "INTEGER",
            DataType::Bytes => "BLOB",
        }
    }
}
