// MySQL用方言アダプター
//
// 汎用スキーマモデルからMySQLのDDLを生成・実行し、
// information_schemaを通じたイントロスペクションを提供します。

use async_trait::async_trait;
use sqlx::AnyPool;

use crate::adapters::dialect::{
    column_index_name, render_create_table, split_table_ref, wrap_sql_error,
    wrap_sql_error_with_params, DialectAdapter,
};
use crate::adapters::type_mapping::MySqlTypeMapper;
use crate::core::error::SqlError;
use crate::core::schema::Table;

/// MySQL用方言アダプター
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect {
    type_mapping: MySqlTypeMapper,
}

impl MysqlDialect {
    /// 新しいMysqlDialectを作成
    pub fn new() -> Self {
        Self {
            type_mapping: MySqlTypeMapper,
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
impl DialectAdapter for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
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
                // デフォルトデータベース未選択の場合はNULLが返るため、
                // 空文字列として扱い存在クエリは0件にマッチする
                let sql = "SELECT DATABASE()";
                let row = sqlx::query(sql)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| wrap_sql_error(e, sql))?;
                row.get::<Option<String>, _>(0).unwrap_or_default()
            }
        };

        let sql = "SELECT count(*) FROM information_schema.tables \
                   WHERE UPPER(table_schema) = UPPER(?) AND UPPER(table_name) = UPPER(?)";
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
                   WHERE table_schema = DATABASE()";
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, DataType};

    #[test]
    fn test_create_table_sql_with_primary_key() {
        let mut table = Table::new("orders");
        table.add_column(Column::new("id", DataType::Integer, false));
        table.add_column(Column::new("total", DataType::Float, true));
        table.add_primary_key("id");

        let dialect = MysqlDialect::new();
        let sql = dialect.create_table_sql(&table);

        assert_eq!(
            sql,
            "CREATE TABLE orders(\nid INT NOT NULL,\ntotal DOUBLE,\nCONSTRAINT orders_pkey PRIMARY KEY(id)\n)"
        );
    }

    #[test]
    fn test_create_table_sql_maps_string_to_varchar() {
        // TEXTはプレフィックス長なしでインデックスできないためVARCHAR(255)
        let mut table = Table::new("users");
        table.add_column(Column::new("email", DataType::String, false).indexed());

        let dialect = MysqlDialect::new();
        let sql = dialect.create_table_sql(&table);

        assert!(
            sql.contains("email VARCHAR(255) NOT NULL"),
            "Expected 'email VARCHAR(255) NOT NULL' in SQL: {}",
            sql
        );
    }

    #[test]
    fn test_column_index_sql() {
        let mut table = Table::new("users");
        table.add_column(Column::new("email", DataType::String, false).indexed());

        let dialect = MysqlDialect::new();
        let sql = dialect.column_index_sql(&table, "email");

        assert_eq!(sql, "CREATE INDEX idx_users_email ON users(email)");
    }

    #[test]
    fn test_add_primary_key_sql() {
        let dialect = MysqlDialect::new();
        let sql = dialect.add_primary_key_sql("archive", &["id".to_string()]);

        assert_eq!(sql, "ALTER TABLE archive ADD PRIMARY KEY(id)");
    }

    #[test]
    fn test_dialect_identity() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.coalesce_function(), "IFNULL");
    }
}
