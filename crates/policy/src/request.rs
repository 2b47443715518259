//! 授权请求与决策

use freight_common::WarehouseId;

use crate::permission::{Action, Permission, Resource};
use crate::role::Role;

/// 授权请求
///
/// 单次调用的临时输入，不持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub role: Role,
    pub resource: Resource,
    pub action: Action,
    /// 请求主体所属仓库
    pub caller_unit: Option<WarehouseId>,
    /// 目标资源实例所属仓库
    pub target_unit: Option<WarehouseId>,
}

impl AuthorizationRequest {
    pub fn new(role: Role, resource: Resource, action: Action) -> Self {
        Self {
            role,
            resource,
            action,
            caller_unit: None,
            target_unit: None,
        }
    }

    pub fn with_caller_unit(mut self, unit: impl Into<WarehouseId>) -> Self {
        self.caller_unit = Some(unit.into());
        self
    }

    pub fn with_target_unit(mut self, unit: impl Into<WarehouseId>) -> Self {
        self.target_unit = Some(unit.into());
        self
    }
}

/// 决策原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionReason {
    /// 命中通配授权 (资源或操作为 `*`)，不检查作用域
    WildcardGrant,
    /// 命中 `all` 作用域授权
    ScopeAll,
    /// 命中 `warehouse` 授权，双方仓库一致
    WarehouseMatch,
    /// 命中 `warehouse` 授权，粗粒度检查不比对仓库
    WarehouseDeferred,
    /// 命中 `warehouse` 授权，但缺少仓库上下文
    WarehouseContextMissing,
    /// 命中 `warehouse` 授权，但双方仓库不一致
    WarehouseMismatch,
    /// 命中 `own` 授权，归属由调用方确认
    OwnScope,
    /// 没有匹配的授权
    NoMatchingGrant,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::WildcardGrant => "wildcard_grant",
            DecisionReason::ScopeAll => "scope_all",
            DecisionReason::WarehouseMatch => "warehouse_match",
            DecisionReason::WarehouseDeferred => "warehouse_deferred",
            DecisionReason::WarehouseContextMissing => "warehouse_context_missing",
            DecisionReason::WarehouseMismatch => "warehouse_mismatch",
            DecisionReason::OwnScope => "own_scope",
            DecisionReason::NoMatchingGrant => "no_matching_grant",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 授权决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
    /// 决定结果的授权 (拒绝且无匹配时为空)
    pub matched: Option<Permission>,
}

impl Decision {
    pub(crate) fn allow(reason: DecisionReason, permission: &Permission) -> Self {
        Self {
            allowed: true,
            reason,
            matched: Some(permission.clone()),
        }
    }

    pub(crate) fn deny(reason: DecisionReason, permission: Option<&Permission>) -> Self {
        Self {
            allowed: false,
            reason,
            matched: permission.cloned(),
        }
    }
}
