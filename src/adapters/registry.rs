// 方言レジストリ
//
// 方言識別子から方言アダプターへの明示的なマッピングを提供します。
// グローバルな暗黙の登録ではなく、注入可能なレジストリオブジェクトとして
// 構築し、起動時に登録を済ませた後はArcで共有して読み取り専用で使います。

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::dialect::{DialectAdapter, MysqlDialect, PostgresDialect, SqliteDialect};
use crate::core::error::DialectError;

/// 方言レジストリ
///
/// 方言識別子と方言アダプターの対応を保持します。登録は`&mut self`を
/// 要求するため、構築フェーズ完了後に`Arc`で共有すれば以降の変更は
/// 型システムにより禁止され、同期なしで並行に参照できます。
#[derive(Default)]
pub struct DialectRegistry {
    /// 登録済みアダプター（識別子 -> アダプター）
    adapters: HashMap<String, Arc<dyn DialectAdapter>>,
}

impl DialectRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みの方言をすべて登録したレジストリを作成
    ///
    /// postgres, mysql, sqlite がそれぞれの固定識別子で登録されます。
    pub fn with_builtin_dialects() -> Self {
        let mut registry = Self::new();

        // 固定識別子での登録は重複しないため失敗しない
        let _ = registry.register(Arc::new(PostgresDialect::new()));
        let _ = registry.register(Arc::new(MysqlDialect::new()));
        let _ = registry.register(Arc::new(SqliteDialect::new()));

        registry
    }

    /// アダプターを自身の固定識別子で登録
    ///
    /// 同じ識別子がすでに登録されている場合は
    /// `DialectError::AlreadyRegistered` を返し、既存の束縛を変更しません。
    pub fn register(&mut self, adapter: Arc<dyn DialectAdapter>) -> Result<(), DialectError> {
        self.register_as(adapter.name(), adapter)
    }

    /// アダプターを任意の識別子で登録
    ///
    /// # Arguments
    ///
    /// * `name` - 方言識別子
    /// * `adapter` - 登録するアダプター
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        adapter: Arc<dyn DialectAdapter>,
    ) -> Result<(), DialectError> {
        let name = name.into();
        if self.adapters.contains_key(&name) {
            return Err(DialectError::AlreadyRegistered { name });
        }

        self.adapters.insert(name, adapter);
        Ok(())
    }

    /// 識別子からアダプターを解決
    ///
    /// 未登録の識別子は `DialectError::NotRegistered` になります。
    /// 暗黙のフォールバック方言はありません。
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn DialectAdapter>, DialectError> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| DialectError::NotRegistered {
                name: name.to_string(),
            })
    }

    /// 指定された方言が登録されているかどうか
    pub fn has_dialect(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    /// 登録済みの方言識別子一覧を取得（ソート済み）
    pub fn dialect_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.dialect_names())
            .finish()
    }
}
