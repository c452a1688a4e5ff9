// エラー型定義
//
// ライブラリ全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、SqlError, DialectError, SchemaError を定義します。

use thiserror::Error;

/// SQL実行エラー
///
/// SQLクライアントが報告したエラーを、失敗したステートメント本文と
/// バインドパラメータ付きでラップします。呼び出し側はバックエンド固有の
/// ツールなしで失敗を診断できます。
#[derive(Debug, Clone, Error)]
#[error("SQL statement failed: {cause} (statement: {statement}{})", format_params(.params))]
pub struct SqlError {
    /// 失敗したSQLステートメント
    pub statement: String,
    /// バインドパラメータ（文字列表現）
    pub params: Vec<String>,
    /// ドライバーが報告したエラー原因
    pub cause: String,
}

impl SqlError {
    /// 新しいSQLエラーを作成
    pub fn new(cause: impl std::fmt::Display, statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            params: Vec::new(),
            cause: cause.to_string(),
        }
    }

    /// バインドパラメータ付きのSQLエラーを作成
    pub fn with_params(
        cause: impl std::fmt::Display,
        statement: impl Into<String>,
        params: &[&str],
    ) -> Self {
        Self {
            statement: statement.into(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
            cause: cause.to_string(),
        }
    }

    /// 失敗したステートメントを取得
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// バインドパラメータを取得
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// バインドパラメータが含まれているかどうか
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

/// バインドパラメータをフォーマットするヘルパー関数
fn format_params(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!(", params: [{}]", params.join(", "))
    }
}

/// 方言レジストリエラー
///
/// 方言の登録・解決時に発生するエラーを表現します。
/// 未登録の識別子での解決は設定時の誤りであり、リトライ対象ではありません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    /// Dialect not registered
    #[error("Dialect '{name}' is not registered")]
    NotRegistered {
        /// 方言識別子
        name: String,
    },

    /// Dialect already registered
    #[error("Dialect '{name}' is already registered")]
    AlreadyRegistered {
        /// 方言識別子
        name: String,
    },
}

impl DialectError {
    /// 未登録エラーかどうか
    pub fn is_not_registered(&self) -> bool {
        matches!(self, DialectError::NotRegistered { .. })
    }

    /// 二重登録エラーかどうか
    pub fn is_already_registered(&self) -> bool {
        matches!(self, DialectError::AlreadyRegistered { .. })
    }
}

/// スキーマ定義エラー
///
/// テーブル定義の整合性検証時に発生するエラーを表現します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Primary key references an undefined column
    #[error("Primary key column '{column}' is not defined in table '{table}'")]
    UnknownPrimaryKeyColumn {
        /// テーブル名
        table: String,
        /// カラム名
        column: String,
    },

    /// Duplicate column name
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// テーブル名
        table: String,
        /// カラム名
        column: String,
    },
}

impl SchemaError {
    /// プライマリキー参照エラーかどうか
    pub fn is_unknown_primary_key_column(&self) -> bool {
        matches!(self, SchemaError::UnknownPrimaryKeyColumn { .. })
    }

    /// カラム重複エラーかどうか
    pub fn is_duplicate_column(&self) -> bool {
        matches!(self, SchemaError::DuplicateColumn { .. })
    }
}
