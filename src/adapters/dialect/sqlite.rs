// SQLite用方言アダプター
//
// 汎用スキーマモデルからSQLiteのDDLを生成・実行し、
// sqlite_masterとPRAGMA関数を通じたイントロスペクションを提供します。
// SQLiteのスキーマ修飾子はアタッチ済みデータベース名（通常は main）です。

use async_trait::async_trait;
use sqlx::AnyPool;

use crate::adapters::dialect::{
    column_index_name, render_create_table, split_table_ref, wrap_sql_error,
    wrap_sql_error_with_params, DialectAdapter,
};
use crate::adapters::type_mapping::SqliteTypeMapper;
use crate::core::error::SqlError;
use crate::core::schema::Table;

/// SQLite用方言アダプター
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect {
    type_mapping: SqliteTypeMapper,
}

impl SqliteDialect {
    /// 新しいSqliteDialectを作成
    pub fn new() -> Self {
        Self {
            type_mapping: SqliteTypeMapper,
        }
    }

    /// CREATE TABLE文を生成
    pub fn create_table_sql(&self, table: &Table) -> String {
        render_create_table(table, &self.type_mapping)
    }

    /// カラムインデックス作成文を生成
    ///
    /// SQLiteではインデックス名側にスキーマ修飾子を付け、ON句の
    /// テーブル名は修飾しません（インデックスは対象テーブルと同じ
    /// データベースに作成されます）。
    pub fn column_index_sql(&self, table: &Table, column_name: &str) -> String {
        let index_name = column_index_name(&table.name, column_name);
        match &table.schema {
            Some(schema) => format!(
                "CREATE INDEX {}.{} ON {}({})",
                schema, index_name, table.name, column_name
            ),
            None => format!(
                "CREATE INDEX {} ON {}({})",
                index_name, table.name, column_name
            ),
        }
    }

    /// CREATE TABLE AS文を生成
    pub fn create_table_as_sql(&self, table_name: &str, query: &str) -> String {
        format!("CREATE TABLE {} AS {}", table_name, query)
    }

    /// プライマリキー相当のユニークインデックス作成文を生成
    ///
    /// SQLiteは既存テーブルへのプライマリキー追加をサポートしないため、
    /// `<テーブル名>_pkey` という名前のユニークインデックスで代替します。
    /// キー列に重複やNULLがあればこの文が失敗し、テーブルはキーなしの
    /// まま残ります。
    pub fn add_primary_key_sql(&self, table_name: &str, primary_keys: &[String]) -> String {
        let (schema, bare_name) = split_table_ref(table_name);
        match schema {
            Some(schema) => format!(
                "CREATE UNIQUE INDEX {}.{}_pkey ON {}({})",
                schema,
                bare_name,
                bare_name,
                primary_keys.join(",")
            ),
            None => format!(
                "CREATE UNIQUE INDEX {}_pkey ON {}({})",
                bare_name,
                bare_name,
                primary_keys.join(",")
            ),
        }
    }
}

#[async_trait]
impl DialectAdapter for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn coalesce_function(&self) -> &'static str {
        "IFNULL"
    }

    async fn create_table(&self, pool: &AnyPool, table: &Table) -> Result<(), SqlError> {
        let sql = self.create_table_sql(table);
        if let Err(e) = sqlx::query(&sql).execute(pool).await {
            return Err(wrap_sql_error(e, &sql));
        }
        tracing::info!("{}", sql);

        // 最後にインデックスを処理
        for column in &table.columns {
            if column.indexed {
                let index_sql = self.column_index_sql(table, &column.name);
                if let Err(e) = sqlx::query(&index_sql).execute(pool).await {
                    return Err(wrap_sql_error(e, &index_sql));
                }
            }
        }

        Ok(())
    }

    async fn create_table_as(
        &self,
        pool: &AnyPool,
        table_name: &str,
        query: &str,
        primary_keys: &[String],
    ) -> Result<(), SqlError> {
        let sql = self.create_table_as_sql(table_name, query);
        if let Err(e) = sqlx::query(&sql).execute(pool).await {
            return Err(wrap_sql_error(e, &sql));
        }

        let sql = self.add_primary_key_sql(table_name, primary_keys);
        if let Err(e) = sqlx::query(&sql).execute(pool).await {
            return Err(wrap_sql_error(e, &sql));
        }

        Ok(())
    }

    async fn table_exists(&self, pool: &AnyPool, table_ref: &str) -> Result<bool, SqlError> {
        use sqlx::Row;

        let (schema, table_name) = split_table_ref(table_ref);
        let schema_name = match schema {
            Some(s) => s.to_string(),
            None => {
                // 先頭のアタッチ済みデータベースが現在のデフォルトスキーマ
                let sql = "SELECT name FROM pragma_database_list ORDER BY seq LIMIT 1";
                let row = sqlx::query(sql)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| wrap_sql_error(e, sql))?;
                row.get::<String, _>(0)
            }
        };

        let sql = "SELECT count(*) FROM pragma_table_list \
                   WHERE schema = ? COLLATE NOCASE AND name = ? COLLATE NOCASE \
                   AND type = 'table'";
        let row = sqlx::query(sql)
            .bind(&schema_name)
            .bind(table_name)
            .fetch_one(pool)
            .await
            .map_err(|e| wrap_sql_error_with_params(e, sql, &[&schema_name, table_name]))?;
        let count: i64 = row.get(0);

        Ok(count > 0)
    }

    async fn table_names(&self, pool: &AnyPool) -> Result<Vec<String>, SqlError> {
        use sqlx::Row;

        let sql = "SELECT name FROM sqlite_master \
                   WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";
        let rows = sqlx::query(sql)
            .fetch_all(pool)
            .await
            .map_err(|e| wrap_sql_error(e, sql))?;

        let mut names = Vec::new();
        for row in &rows {
            let name: String = row.get(0);
            names.push(name);
        }

        names.sort();
        Ok(names)
    }
}
