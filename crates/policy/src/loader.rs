//! 策略文件加载
//!
//! ```toml
//! [roles]
//! system_admin = [{ resource = "*", action = "*", scope = "all" }]
//! driver = [{ resource = "delivery", action = "read" }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Toml},
};
use freight_config::PolicyConfig;
use serde::Deserialize;
use tracing::info;

use crate::error::PolicyError;
use crate::permission::Permission;
use crate::role::Role;
use crate::table::PolicyTable;

/// 策略文件结构
#[derive(Debug, Default, Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    roles: BTreeMap<Role, Vec<Permission>>,
}

impl PolicyDocument {
    fn into_table(self) -> PolicyTable {
        self.roles
            .into_iter()
            .fold(PolicyTable::builder(), |builder, (role, permissions)| {
                builder.grants(role, permissions)
            })
            .build()
    }
}

impl PolicyTable {
    /// 从 TOML 文本构建策略表，文档中未出现的角色为空授权
    pub fn from_toml_str(source: &str) -> Result<Self, PolicyError> {
        let document: PolicyDocument = Figment::from(Toml::string(source)).extract()?;
        Ok(document.into_table())
    }

    /// 从 TOML 文件构建策略表
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        // figment 会静默忽略不存在的文件，这里必须显式报错，否则得到一张全拒绝的表
        if !path.is_file() {
            return Err(PolicyError::TableNotFound(path.display().to_string()));
        }

        let document: PolicyDocument = Figment::from(Toml::file(path)).extract()?;
        let table = document.into_table();

        info!(
            path = %path.display(),
            grants = table.grant_count(),
            "Policy table loaded"
        );

        Ok(table)
    }

    /// 按配置加载: 指定了文件则读取文件，否则使用内置物流策略表
    pub fn load(config: &PolicyConfig) -> Result<Self, PolicyError> {
        match &config.table_path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::logistics()),
        }
    }
}
