//! 角色映射
//!
//! 把登录响应里的角色字符串映射为策略核心的 [`Role`]。
//! 映射只发生在身份接入边界，评估器永远只接收已校验的枚举值。

use std::collections::HashMap;

use freight_errors::{AppError, AppResult};
use freight_policy::Role;
use tracing::warn;

/// 角色映射表
#[derive(Debug, Clone)]
pub struct RoleMapping {
    codes: HashMap<String, Role>,
}

impl RoleMapping {
    /// 后端角色代码 + 策略文件中的规范标识，另含旧版 `ADMIN`
    pub fn standard() -> Self {
        let mut codes = HashMap::new();
        for role in Role::ALL {
            codes.insert(Self::backend_code(role).to_string(), role);
            codes.insert(role.as_str().to_string(), role);
        }
        codes.insert("ADMIN".to_string(), Role::SystemAdmin);
        Self { codes }
    }

    /// 追加别名
    pub fn with_alias(mut self, code: impl Into<String>, role: Role) -> Self {
        self.codes.insert(code.into(), role);
        self
    }

    /// 后端使用的角色代码
    pub fn backend_code(role: Role) -> &'static str {
        match role {
            Role::Customer => "CUSTOMER",
            Role::Management => "MANAGEMENT",
            Role::StoreManager => "STORE_MANAGER",
            Role::WarehouseStaff => "WAREHOUSE_STAFF",
            Role::Driver => "DRIVER",
            Role::DriverAssistant => "DRIVER_ASSISTANT",
            Role::SystemAdmin => "SYSTEM_ADMIN",
        }
    }

    /// 解析角色代码，精确匹配，未知代码视为认证失败
    pub fn resolve(&self, code: &str) -> AppResult<Role> {
        self.codes.get(code).copied().ok_or_else(|| {
            warn!(role = %code, "Unknown role code in identity claims");
            AppError::unauthorized(format!("Unknown role: {}", code))
        })
    }
}

impl Default for RoleMapping {
    fn default() -> Self {
        Self::standard()
    }
}
