// 方言アダプター
//
// 汎用スキーマモデルを各データベース方言のDDL/イントロスペクションSQLへ
// 変換・実行するアダプター層。すべての方言実装が満たすべき契約
// （DialectAdapterトレイト）と、共有の組み立てヘルパーを提供します。

pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use async_trait::async_trait;
use sqlx::AnyPool;

use crate::adapters::type_mapping::TypeMapper;
use crate::core::error::SqlError;
use crate::core::schema::{Column, Table};

/// 方言アダプタートレイト
///
/// 各データベース方言の実装が満たすべきインターフェース。
/// アダプターは状態を持たず、すべての入力は引数として受け取ります。
/// 複数の呼び出し側から並行に使用しても安全です。
#[async_trait]
pub trait DialectAdapter: Send + Sync + std::fmt::Debug {
    /// この方言の固定識別子（レジストリへの登録名）
    fn name(&self) -> &'static str;

    /// NULL値をフォールバック値へ置き換える方言ネイティブな関数名
    ///
    /// 汎用SQL断片を組み立てる呼び出し側が、方言固有の関数名を
    /// ハードコードしなくて済むように契約に含めています。
    fn coalesce_function(&self) -> &'static str;

    /// テーブルを作成
    ///
    /// カラム定義と（空でなければ）`<テーブル名>_pkey` 制約を単一の
    /// CREATE TABLE文で発行した後、indexedフラグ付きのカラムごとに
    /// セカンダリインデックスを1文ずつ作成します。
    ///
    /// # エラー時の状態
    ///
    /// CREATE TABLEが失敗した場合は即座に中断します。インデックス作成が
    /// 失敗した場合、テーブルとそれ以前に作成されたインデックスは残り、
    /// 以降のインデックスは作成されません。ロールバックは行わないため、
    /// 失敗後の残存状態は呼び出し側がバックエンドを調べて判断します。
    async fn create_table(&self, pool: &AnyPool, table: &Table) -> Result<(), SqlError>;

    /// クエリ結果を新しいテーブルとして実体化
    ///
    /// `CREATE TABLE <name> AS <query>` と、プライマリキーを後付けする
    /// 2文目からなる非アトミックな操作です。1文目が失敗した場合テーブルは
    /// 存在しません。1文目が成功して2文目が失敗した場合（キー列の重複・
    /// NULL等）、テーブルはプライマリキーなしのまま残ります。
    async fn create_table_as(
        &self,
        pool: &AnyPool,
        table_name: &str,
        query: &str,
        primary_keys: &[String],
    ) -> Result<(), SqlError>;

    /// テーブルの存在を確認
    ///
    /// `schema.table` 形式または裸のテーブル名を受け付けます。未修飾の
    /// 場合は方言固有のイントロスペクションクエリで現在のデフォルト
    /// スキーマを先に解決し、その解決が失敗すれば操作全体が失敗します。
    /// スキーマ名・テーブル名とも大文字小文字を区別せずに照合します。
    async fn table_exists(&self, pool: &AnyPool, table_ref: &str) -> Result<bool, SqlError>;

    /// 現在のスキーマで可視なテーブル名の一覧を取得
    ///
    /// 戻り値は常に辞書順の昇順ソート済みです。空のスキーマでは
    /// 空のベクターを返します（エラーではありません）。
    async fn table_names(&self, pool: &AnyPool) -> Result<Vec<String>, SqlError>;
}

/// カラム定義の共通組み立てヘルパー
///
/// `名前 型 [NOT NULL]` 形式の断片を生成します。識別子はモデルの
/// 命名規則に従いそのまま出力します。
pub(crate) fn build_column_definition(column: &Column, mapper: &dyn TypeMapper) -> String {
    let mut parts = Vec::new();

    parts.push(column.name.clone());
    parts.push(mapper.format_sql_type(&column.data_type).to_string());

    if !column.nullable {
        parts.push("NOT NULL".to_string());
    }

    parts.join(" ")
}

/// CREATE TABLE文の共通組み立てヘルパー
///
/// プライマリキーが指定されている場合は `CONSTRAINT <名前>_pkey` 制約を
/// 同一文内に埋め込みます。制約名には修飾子なしのテーブル名を使用します。
pub(crate) fn render_create_table(table: &Table, mapper: &dyn TypeMapper) -> String {
    let cols: Vec<String> = table
        .columns
        .iter()
        .map(|c| build_column_definition(c, mapper))
        .collect();

    if table.has_primary_key() {
        format!(
            "CREATE TABLE {}(\n{},\nCONSTRAINT {}_pkey PRIMARY KEY({})\n)",
            table.full_name(),
            cols.join(",\n"),
            table.name,
            table.primary_keys.join(",")
        )
    } else {
        format!("CREATE TABLE {}(\n{}\n)", table.full_name(), cols.join(",\n"))
    }
}

/// カラムインデックス名を生成
///
/// テーブル名とカラム名から決定的に導出します。同じ入力からは常に
/// 同じ名前が得られ、名前だけで対象テーブルとカラムを追跡できます。
pub(crate) fn column_index_name(table_name: &str, column_name: &str) -> String {
    format!("idx_{}_{}", table_name, column_name)
}

/// テーブル参照をスキーマ修飾子とテーブル名に分解
///
/// 最初の区切り文字のみで分割します。区切り文字を複数含む参照は、
/// 先頭セグメントをスキーマ、残り全体をテーブル名として扱います。
pub(crate) fn split_table_ref(table_ref: &str) -> (Option<&str>, &str) {
    match table_ref.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table_ref),
    }
}

/// SQLエラーをラップしてログ出力
///
/// 失敗したステートメントごとに1行のエラーログを出力します。
pub(crate) fn wrap_sql_error(cause: sqlx::Error, statement: &str) -> SqlError {
    let error = SqlError::new(cause, statement);
    tracing::error!("{}", error);
    error
}

/// バインドパラメータ付きでSQLエラーをラップしてログ出力
pub(crate) fn wrap_sql_error_with_params(
    cause: sqlx::Error,
    statement: &str,
    params: &[&str],
) -> SqlError {
    let error = SqlError::with_params(cause, statement, params);
    tracing::error!("{}", error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::type_mapping::PostgresTypeMapper;
    use crate::core::schema::DataType;

    #[test]
    fn test_build_column_definition_not_null() {
        let column = Column::new("id", DataType::Integer, false);
        let def = build_column_definition(&column, &PostgresTypeMapper);
        assert_eq!(def, "id INTEGER NOT NULL");
    }

    #[test]
    fn test_build_column_definition_nullable() {
        let column = Column::new("total", DataType::Float, true);
        let def = build_column_definition(&column, &PostgresTypeMapper);
        assert_eq!(def, "total DOUBLE PRECISION");
    }

    #[test]
    fn test_render_create_table_without_primary_key() {
        // プライマリキーなしでは制約句を出力しない
        let mut table = Table::new("logs");
        table.add_column(Column::new("message", DataType::String, true));

        let sql = render_create_table(&table, &PostgresTypeMapper);
        assert_eq!(sql, "CREATE TABLE logs(\nmessage TEXT\n)");
        assert!(!sql.contains("CONSTRAINT"));
    }

    #[test]
    fn test_render_create_table_constraint_uses_bare_name() {
        // 制約名はスキーマ修飾子なしのテーブル名から生成される
        let mut table = Table::with_schema("public", "users");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_primary_key("id");

        let sql = render_create_table(&table, &PostgresTypeMapper);
        assert!(sql.starts_with("CREATE TABLE public.users(\n"));
        assert!(sql.contains("CONSTRAINT users_pkey PRIMARY KEY(id)"));
    }

    #[test]
    fn test_column_index_name_is_deterministic() {
        assert_eq!(column_index_name("users", "email"), "idx_users_email");
        assert_eq!(column_index_name("users", "email"), "idx_users_email");
    }

    #[test]
    fn test_split_table_ref_unqualified() {
        assert_eq!(split_table_ref("users"), (None, "users"));
    }

    #[test]
    fn test_split_table_ref_qualified() {
        assert_eq!(split_table_ref("public.users"), (Some("public"), "users"));
    }

    #[test]
    fn test_split_table_ref_excess_separators() {
        // 最初の区切り文字のみで分割し、残りはテーブル名として扱う
        assert_eq!(split_table_ref("a.b.c"), (Some("a"), "b.c"));
    }
}
