//! 角色

use serde::{Deserialize, Serialize};

/// 角色
///
/// 登录时由身份提供方签发，会话内不可变。
/// 后端返回的角色字符串在身份接入层映射为该枚举，策略核心不接收原始字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 客户
    Customer,
    /// 管理层
    Management,
    /// 门店经理
    StoreManager,
    /// 仓库员工
    WarehouseStaff,
    /// 司机
    Driver,
    /// 司机助理
    DriverAssistant,
    /// 系统管理员
    SystemAdmin,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Customer,
        Role::Management,
        Role::StoreManager,
        Role::WarehouseStaff,
        Role::Driver,
        Role::DriverAssistant,
        Role::SystemAdmin,
    ];

    /// 策略文件中使用的规范标识
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Management => "management",
            Role::StoreManager => "store_manager",
            Role::WarehouseStaff => "warehouse_staff",
            Role::Driver => "driver",
            Role::DriverAssistant => "driver_assistant",
            Role::SystemAdmin => "system_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
