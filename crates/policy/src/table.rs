//! 策略表

use std::collections::HashMap;

use crate::permission::Permission;
use crate::role::Role;

/// 策略表
///
/// 角色到有序授权列表的只读映射。每个角色都有条目 (可能为空)，
/// 构建完成后不再修改，可通过 `Arc` 在线程间共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    grants: HashMap<Role, Vec<Permission>>,
}

impl PolicyTable {
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::new()
    }

    /// 所有角色均无授权
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// 角色的授权列表，无授权时返回空切片
    pub fn permissions(&self, role: Role) -> &[Permission] {
        self.grants.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.grants.contains_key(role))
    }

    /// 授权总数
    pub fn grant_count(&self) -> usize {
        self.grants.values().map(Vec::len).sum()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::empty()
    }
}

/// 策略表构建器
#[derive(Debug)]
pub struct PolicyTableBuilder {
    grants: HashMap<Role, Vec<Permission>>,
}

impl PolicyTableBuilder {
    fn new() -> Self {
        Self {
            grants: Role::ALL.into_iter().map(|role| (role, Vec::new())).collect(),
        }
    }

    /// 添加授权，重复授权忽略
    pub fn grant(mut self, role: Role, permission: Permission) -> Self {
        let entry = self.grants.entry(role).or_default();
        if !entry.contains(&permission) {
            entry.push(permission);
        }
        self
    }

    pub fn grants(self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        permissions
            .into_iter()
            .fold(self, |builder, permission| builder.grant(role, permission))
    }

    pub fn build(self) -> PolicyTable {
        PolicyTable {
            grants: self.grants,
        }
    }
}
