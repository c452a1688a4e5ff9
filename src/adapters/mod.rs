// Adapters
// 方言レジストリと各データベース方言のDDL/イントロスペクション実装

pub mod dialect;
pub mod registry;
pub mod type_mapping;
