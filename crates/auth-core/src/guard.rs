//! 访问守卫
//!
//! 把评估器的 `false` 转换为 [`AppError::Forbidden`] (HTTP 403)，供路由守卫、
//! API 中间件等调用方使用。守卫不做额外判定，结果与评估器完全一致。

use std::sync::Arc;

use freight_common::WarehouseId;
use freight_errors::{AppError, AppResult};
use freight_policy::{Action, AuthorizationRequest, Decision, PolicyEvaluator, Resource};
use metrics::counter;
use tracing::warn;

use crate::principal::Principal;

/// 访问守卫
#[derive(Debug, Clone)]
pub struct AccessGuard {
    evaluator: Arc<PolicyEvaluator>,
}

impl AccessGuard {
    pub fn new(evaluator: Arc<PolicyEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &PolicyEvaluator {
        &self.evaluator
    }

    /// 条件渲染用的布尔检查 (粗粒度)
    pub fn can(&self, principal: &Principal, resource: &Resource, action: Action) -> bool {
        self.evaluator.authorize(principal.role, resource, action)
    }

    /// 要求权限 (粗粒度，不比对仓库)
    pub fn require(
        &self,
        principal: &Principal,
        resource: &Resource,
        action: Action,
    ) -> AppResult<()> {
        let decision = self.evaluator.decide_coarse(principal.role, resource, action);
        Self::enforce(principal, resource, action, decision)
    }

    /// 要求权限并比对主体仓库与目标资源仓库
    pub fn require_in(
        &self,
        principal: &Principal,
        resource: &Resource,
        action: Action,
        target_unit: Option<&WarehouseId>,
    ) -> AppResult<()> {
        let mut request = AuthorizationRequest::new(principal.role, resource.clone(), action);
        request.caller_unit = principal.warehouse.clone();
        request.target_unit = target_unit.cloned();

        let decision = self.evaluator.decide(&request);
        Self::enforce(principal, resource, action, decision)
    }

    fn enforce(
        principal: &Principal,
        resource: &Resource,
        action: Action,
        decision: Decision,
    ) -> AppResult<()> {
        counter!("authorization_checks_total",
            "allowed" => decision.allowed.to_string(),
            "reason" => decision.reason.as_str()
        )
        .increment(1);

        if decision.allowed {
            return Ok(());
        }

        warn!(
            user_id = %principal.user_id,
            role = %principal.role,
            %resource,
            %action,
            reason = %decision.reason,
            "Access denied"
        );

        Err(AppError::forbidden(format!(
            "Missing permission: {}:{} ({})",
            resource, action, decision.reason
        )))
    }
}

/// 权限检查宏
#[macro_export]
macro_rules! require_permission {
    ($guard:expr, $principal:expr, $resource:expr, $action:expr) => {
        if let Err(e) = $guard.require($principal, $resource, $action) {
            return Err(e.into());
        }
    };
    ($guard:expr, $principal:expr, $resource:expr, $action:expr, $target:expr) => {
        if let Err(e) = $guard.require_in($principal, $resource, $action, $target) {
            return Err(e.into());
        }
    };
}

/// 角色检查宏
#[macro_export]
macro_rules! require_role {
    ($principal:expr, $role:expr) => {
        if $principal.role != $role {
            return Err(freight_errors::AppError::forbidden(format!(
                "Missing role: {}",
                $role
            ))
            .into());
        }
    };
}
