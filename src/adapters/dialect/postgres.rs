// PostgreSQL用方言アダプター
//
// 汎用スキーマモデルからPostgreSQLのDDLを生成・実行し、
// information_schemaを通じたイントロスペクションを提供します。

use async_trait::async_trait;
use sqlx::AnyPool;

use crate::adapters::dialect::{
    column_index_name, render_create_table, split_table_ref, wrap_sql_error,
    wrap_sql_error_with_params, DialectAdapter,
};
use crate::adapters::type_mapping::PostgresTypeMapper;
use crate::core::error::SqlError;
use crate::core::schema::Table;

/// PostgreSQL用方言アダプター
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    type_mapping: PostgresTypeMapper,
}

impl PostgresDialect {
    /// 新しいPostgresDialectを作成
    pub fn new() -> Self {
        Self {
            type_mapping: PostgresTypeMapper,
        }
    }

    /// CREATE TABLE文を生成
    pub fn create_table_sql(&self, table: &Table) -> String {
        render_create_table(table, &self.type_mapping)
    }

    /// カラムインデックス作成文を生成
    pub fn column_index_sql(&self, table: &Table, column_name: &str) -> String {
        format!(
            "CREATE INDEX {} ON {}({})",
            column_index_name(&table.name, column_name),
            table.full_name(),
            column_name
        )
    }

    /// CREATE TABLE AS文を生成
    pub fn create_table_as_sql(&self, table_name: &str, query: &str) -> String {
        format!("CREATE TABLE {} AS {}", table_name, query)
    }

    /// プライマリキー後付けのALTER TABLE文を生成
    pub fn add_primary_key_sql(&self, table_name: &str, primary_keys: &[String]) -> String {
        format!(
            "ALTER TABLE {} ADD PRIMARY KEY({})",
            table_name,
            primary_keys.join(",")
        )
    }
}

#[async_trait]
impl DialectAdapter for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn coalesce_function(&self) -> &'static str {
        "COALESCE"
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
                let sql = "SELECT current_schema()";
                let row = sqlx::query(sql)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| wrap_sql_error(e, sql))?;
                row.get::<String, _>(0)
            }
        };

        let sql = "SELECT count(*) FROM information_schema.tables \
                   WHERE table_schema ILIKE $1 AND table_name ILIKE $2";
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

        let sql = "SELECT table_name FROM information_schema.tables \
                   WHERE table_schema = current_schema()";
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
