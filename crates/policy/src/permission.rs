//! 权限实体

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

const WILDCARD: &str = "*";

/// 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Execute,
    Assign,
    /// 所有操作
    #[serde(rename = "*")]
    Wildcard,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Execute => "execute",
            Action::Assign => "assign",
            Action::Wildcard => WILDCARD,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Action::Wildcard)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = PolicyError;

    /// 区分大小写，不做规范化
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "execute" => Ok(Action::Execute),
            "assign" => Ok(Action::Assign),
            WILDCARD => Ok(Action::Wildcard),
            other => Err(PolicyError::UnknownAction(other.to_string())),
        }
    }
}

/// 资源标识
///
/// `*` 或小写规范标识 (`[a-z][a-z0-9_]*`)。集合是开放的：
/// 通配授权需要覆盖策略表中从未出现过的资源。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resource(Cow<'static, str>);

impl Resource {
    /// 所有资源
    pub const ANY: Resource = Resource(Cow::Borrowed(WILDCARD));

    /// 仅供本 crate 定义内置常量，调用方须保证标识合法
    pub(crate) const fn known(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn parse(name: &str) -> Result<Self, PolicyError> {
        if name == WILDCARD || Self::is_canonical(name) {
            Ok(Self(Cow::Owned(name.to_string())))
        } else {
            Err(PolicyError::InvalidResource(name.to_string()))
        }
    }

    fn is_canonical(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => chars
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == WILDCARD
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Resource {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Resource {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Resource> for String {
    fn from(resource: Resource) -> Self {
        resource.0.into_owned()
    }
}

/// 内置物流资源
pub mod resources {
    use super::Resource;

    pub const ORDER: Resource = Resource::known("order");
    pub const SHIPMENT: Resource = Resource::known("shipment");
    pub const DELIVERY: Resource = Resource::known("delivery");
    pub const ROUTE: Resource = Resource::known("route");
    pub const VEHICLE: Resource = Resource::known("vehicle");
    pub const WAREHOUSE: Resource = Resource::known("warehouse");
    pub const INVENTORY: Resource = Resource::known("inventory");
    pub const PACKAGE: Resource = Resource::known("package");
    pub const INVOICE: Resource = Resource::known("invoice");
    pub const PRICING: Resource = Resource::known("pricing");
    pub const REPORTS: Resource = Resource::known("reports");
    pub const USER: Resource = Resource::known("user");
    pub const STAFF: Resource = Resource::known("staff");
    pub const TRACKING: Resource = Resource::known("tracking");
    pub const PROFILE: Resource = Resource::known("profile");
    pub const PROOF_OF_DELIVERY: Resource = Resource::known("proof_of_delivery");
}

/// 授权作用域
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 不受组织边界限制
    All,
    /// 仅限主体自己拥有的资源实例 (归属由调用方事先确认)
    #[default]
    Own,
    /// 仅限主体所属仓库的资源实例
    Warehouse,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Own => "own",
            Scope::Warehouse => "warehouse",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "own" => Ok(Scope::Own),
            "warehouse" => Ok(Scope::Warehouse),
            other => Err(PolicyError::UnknownScope(other.to_string())),
        }
    }
}

/// 权限
///
/// 策略表的最小单元: 在某作用域内对某资源执行某操作的许可。
/// 策略文件中省略 `scope` 时取最窄的 `own`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
    #[serde(default)]
    pub scope: Scope,
}

impl Permission {
    pub fn new(resource: Resource, action: Action, scope: Scope) -> Self {
        Self {
            resource,
            action,
            scope,
        }
    }

    /// 全局授权
    pub fn all(resource: Resource, action: Action) -> Self {
        Self::new(resource, action, Scope::All)
    }

    /// 本人资源授权
    pub fn own(resource: Resource, action: Action) -> Self {
        Self::new(resource, action, Scope::Own)
    }

    /// 本仓库授权
    pub fn warehouse(resource: Resource, action: Action) -> Self {
        Self::new(resource, action, Scope::Warehouse)
    }

    /// 权限代码，如 "order:read"
    pub fn code(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }

    /// 资源或操作任一侧为通配
    pub fn is_wildcard(&self) -> bool {
        self.resource.is_wildcard() || self.action.is_wildcard()
    }

    /// 检查是否匹配资源和操作
    pub fn matches(&self, resource: &Resource, action: Action) -> bool {
        (self.resource.is_wildcard() || &self.resource == resource)
            && (self.action.is_wildcard() || self.action == action)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}@{}", self.resource, self.action, self.scope)
    }
}
