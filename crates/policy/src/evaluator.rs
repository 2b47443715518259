//! 策略评估器

use std::sync::Arc;

use freight_common::WarehouseId;
use freight_config::{PolicyConfig, ScopeMode};
use tracing::{debug, trace};

use crate::error::PolicyError;
use crate::permission::{Action, Permission, Resource, Scope};
use crate::request::{AuthorizationRequest, Decision, DecisionReason};
use crate::role::Role;
use crate::table::PolicyTable;

/// 组织上下文
#[derive(Debug, Clone, Copy)]
enum OrgContext<'a> {
    /// 粗粒度检查: 不比对仓库
    Deferred,
    /// 细粒度检查: 比对主体与目标的仓库
    Enforced {
        caller: Option<&'a WarehouseId>,
        target: Option<&'a WarehouseId>,
    },
}

/// 策略评估器
///
/// 对注入的只读策略表做纯判定: 不做 I/O，不修改状态，不会失败。
/// 未授权一律以 `false` 表达。
///
/// 算法:
/// 1. 命中通配授权 (`*:*`、`*:action`、`resource:*`) 直接允许，不看作用域
/// 2. 筛选资源和操作都精确匹配的授权，没有则拒绝
/// 3. 任一授权为 `all` 则允许
/// 4. 任一授权为 `warehouse` 时按仓库上下文判定
/// 5. 任一授权为 `own` 则允许 (归属由调用方事先确认)
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    table: Arc<PolicyTable>,
    scope_mode: ScopeMode,
}

impl PolicyEvaluator {
    pub fn new(table: Arc<PolicyTable>) -> Self {
        Self {
            table,
            scope_mode: ScopeMode::default(),
        }
    }

    pub fn with_scope_mode(mut self, scope_mode: ScopeMode) -> Self {
        self.scope_mode = scope_mode;
        self
    }

    /// 使用进程级共享的内置策略表
    pub fn logistics() -> Self {
        Self::new(crate::shared_table())
    }

    /// 按配置构建: 加载策略表并应用作用域模式
    pub fn from_config(config: &PolicyConfig) -> Result<Self, PolicyError> {
        let table = match config.table_path {
            Some(_) => Arc::new(PolicyTable::load(config)?),
            None => crate::shared_table(),
        };
        Ok(Self::new(table).with_scope_mode(config.scope_mode))
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    pub fn scope_mode(&self) -> ScopeMode {
        self.scope_mode
    }

    pub fn permissions_for(&self, role: Role) -> &[Permission] {
        self.table.permissions(role)
    }

    /// 粗粒度检查
    ///
    /// `warehouse` 授权不比对仓库，只确认授权存在；仓库边界由资源服务层负责。
    pub fn authorize(&self, role: Role, resource: &Resource, action: Action) -> bool {
        self.evaluate(role, resource, action, OrgContext::Deferred)
            .allowed
    }

    /// 细粒度检查
    ///
    /// `warehouse` 授权: 双方仓库都给出时必须相等；
    /// 缺少任一方时由 [`ScopeMode`] 决定 (`Lenient` 放行，`Strict` 拒绝)。
    pub fn authorize_with_scope(
        &self,
        role: Role,
        resource: &Resource,
        action: Action,
        caller_unit: Option<&WarehouseId>,
        target_unit: Option<&WarehouseId>,
    ) -> bool {
        let org = OrgContext::Enforced {
            caller: caller_unit,
            target: target_unit,
        };
        self.evaluate(role, resource, action, org).allowed
    }

    /// 细粒度检查并返回决策原因
    pub fn decide(&self, request: &AuthorizationRequest) -> Decision {
        let org = OrgContext::Enforced {
            caller: request.caller_unit.as_ref(),
            target: request.target_unit.as_ref(),
        };
        self.evaluate(request.role, &request.resource, request.action, org)
    }

    /// 粗粒度检查并返回决策原因
    pub fn decide_coarse(&self, role: Role, resource: &Resource, action: Action) -> Decision {
        self.evaluate(role, resource, action, OrgContext::Deferred)
    }

    /// 批量评估
    pub fn batch_decide(&self, requests: &[AuthorizationRequest]) -> Vec<Decision> {
        requests.iter().map(|request| self.decide(request)).collect()
    }

    /// 字符串入口的粗粒度检查，标识非法 (未知操作、大小写不符、空串) 时返回 `false`
    pub fn authorize_raw(&self, role: Role, resource: &str, action: &str) -> bool {
        match parse_pair(resource, action) {
            Some((resource, action)) => self.authorize(role, &resource, action),
            None => false,
        }
    }

    /// 字符串入口的细粒度检查，标识非法时返回 `false`
    pub fn authorize_with_scope_raw(
        &self,
        role: Role,
        resource: &str,
        action: &str,
        caller_unit: Option<&str>,
        target_unit: Option<&str>,
    ) -> bool {
        let Some((resource, action)) = parse_pair(resource, action) else {
            return false;
        };
        let caller = caller_unit.map(WarehouseId::from);
        let target = target_unit.map(WarehouseId::from);
        self.authorize_with_scope(role, &resource, action, caller.as_ref(), target.as_ref())
    }

    fn evaluate(
        &self,
        role: Role,
        resource: &Resource,
        action: Action,
        org: OrgContext<'_>,
    ) -> Decision {
        let decision = self.resolve(role, resource, action, org);

        if decision.allowed {
            trace!(%role, %resource, %action, reason = %decision.reason, "Access granted");
        } else {
            debug!(%role, %resource, %action, reason = %decision.reason, "Access denied");
        }

        decision
    }

    fn resolve(
        &self,
        role: Role,
        resource: &Resource,
        action: Action,
        org: OrgContext<'_>,
    ) -> Decision {
        let grants = self.table.permissions(role);

        if let Some(grant) = grants
            .iter()
            .find(|grant| grant.is_wildcard() && grant.matches(resource, action))
        {
            return Decision::allow(DecisionReason::WildcardGrant, grant);
        }

        let matching: Vec<&Permission> = grants
            .iter()
            .filter(|grant| !grant.is_wildcard() && grant.matches(resource, action))
            .collect();
        let with_scope = |scope: Scope| matching.iter().copied().find(|grant| grant.scope == scope);

        if let Some(grant) = with_scope(Scope::All) {
            return Decision::allow(DecisionReason::ScopeAll, grant);
        }

        // 仓库不符时仍可能被 own 授权放行
        let mut denial = None;
        if let Some(grant) = with_scope(Scope::Warehouse) {
            let (allowed, reason) = self.resolve_warehouse(org);
            if allowed {
                return Decision::allow(reason, grant);
            }
            denial = Some(Decision::deny(reason, Some(grant)));
        }

        if let Some(grant) = with_scope(Scope::Own) {
            return Decision::allow(DecisionReason::OwnScope, grant);
        }

        denial.unwrap_or_else(|| Decision::deny(DecisionReason::NoMatchingGrant, None))
    }

    fn resolve_warehouse(&self, org: OrgContext<'_>) -> (bool, DecisionReason) {
        match org {
            OrgContext::Deferred => (true, DecisionReason::WarehouseDeferred),
            OrgContext::Enforced {
                caller: Some(caller),
                target: Some(target),
            } => {
                if caller == target {
                    (true, DecisionReason::WarehouseMatch)
                } else {
                    (false, DecisionReason::WarehouseMismatch)
                }
            }
            OrgContext::Enforced { .. } => (
                self.scope_mode == ScopeMode::Lenient,
                DecisionReason::WarehouseContextMissing,
            ),
        }
    }
}

fn parse_pair(resource: &str, action: &str) -> Option<(Resource, Action)> {
    match (resource.parse::<Resource>(), action.parse::<Action>()) {
        (Ok(resource), Ok(action)) => Some((resource, action)),
        (Err(e), _) | (_, Err(e)) => {
            debug!(error = %e, "Rejected malformed authorization input");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::resources::*;

    fn evaluator(table: PolicyTable) -> PolicyEvaluator {
        PolicyEvaluator::new(Arc::new(table))
    }

    fn wh(code: &str) -> WarehouseId {
        WarehouseId::from(code)
    }

    #[test]
    fn test_exact_grant() {
        let eval = evaluator(
            PolicyTable::builder()
                .grant(Role::Customer, Permission::own(ORDER, Action::Read))
                .build(),
        );

        assert!(eval.authorize(Role::Customer, &ORDER, Action::Read));
        assert!(!eval.authorize(Role::Customer, &ORDER, Action::Delete));
        assert!(!eval.authorize(Role::Driver, &ORDER, Action::Read));
    }

    #[test]
    fn test_wildcard_grant_ignores_scope() {
        let eval = evaluator(
            PolicyTable::builder()
                .grant(
                    Role::StoreManager,
                    Permission::warehouse(INVENTORY, Action::Wildcard),
                )
                .build(),
        );

        let decision = eval.decide(
            &AuthorizationRequest::new(Role::StoreManager, INVENTORY, Action::Delete)
                .with_caller_unit("WH-01")
                .with_target_unit("WH-02"),
        );

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::WildcardGrant);
        assert_eq!(
            decision.matched,
            Some(Permission::warehouse(INVENTORY, Action::Wildcard))
        );
    }

    #[test]
    fn test_coarse_check_defers_warehouse() {
        let eval = evaluator(
            PolicyTable::builder()
                .grant(Role::WarehouseStaff, Permission::warehouse(ORDER, Action::Read))
                .build(),
        );

        assert!(eval.authorize(Role::WarehouseStaff, &ORDER, Action::Read));
        assert_eq!(
            eval.decide_coarse(Role::WarehouseStaff, &ORDER, Action::Read).reason,
            DecisionReason::WarehouseDeferred
        );
        assert!(!eval.authorize_with_scope(
            Role::WarehouseStaff,
            &ORDER,
            Action::Read,
            Some(&wh("W1")),
            Some(&wh("W2")),
        ));
    }

    #[test]
    fn test_missing_context_depends_on_scope_mode() {
        let table = Arc::new(
            PolicyTable::builder()
                .grant(Role::WarehouseStaff, Permission::warehouse(ORDER, Action::Read))
                .build(),
        );
        let lenient = PolicyEvaluator::new(Arc::clone(&table));
        let strict = PolicyEvaluator::new(table).with_scope_mode(ScopeMode::Strict);
        let caller = wh("W1");

        for (caller, target) in [(Some(&caller), None), (None, Some(&caller)), (None, None)] {
            assert!(lenient.authorize_with_scope(
                Role::WarehouseStaff,
                &ORDER,
                Action::Read,
                caller,
                target
            ));
            assert!(!strict.authorize_with_scope(
                Role::WarehouseStaff,
                &ORDER,
                Action::Read,
                caller,
                target
            ));
        }

        // 严格模式下仓库一致仍然放行
        assert!(strict.authorize_with_scope(
            Role::WarehouseStaff,
            &ORDER,
            Action::Read,
            Some(&caller),
            Some(&wh("W1")),
        ));
    }

    #[test]
    fn test_own_grant_survives_warehouse_mismatch() {
        let eval = evaluator(
            PolicyTable::builder()
                .grants(
                    Role::StoreManager,
                    [
                        Permission::warehouse(ORDER, Action::Read),
                        Permission::own(ORDER, Action::Read),
                    ],
                )
                .build(),
        );

        let decision = eval.decide(
            &AuthorizationRequest::new(Role::StoreManager, ORDER, Action::Read)
                .with_caller_unit("WH-01")
                .with_target_unit("WH-02"),
        );

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::OwnScope);
    }

    #[test]
    fn test_scope_all_wins_over_warehouse() {
        let eval = evaluator(
            PolicyTable::builder()
                .grants(
                    Role::Management,
                    [
                        Permission::warehouse(ORDER, Action::Read),
                        Permission::all(ORDER, Action::Read),
                    ],
                )
                .build(),
        );

        let decision = eval.decide(
            &AuthorizationRequest::new(Role::Management, ORDER, Action::Read)
                .with_caller_unit("WH-01")
                .with_target_unit("WH-02"),
        );

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::ScopeAll);
    }

    #[test]
    fn test_denial_reports_reason() {
        let eval = PolicyEvaluator::logistics();

        let mismatch = eval.decide(
            &AuthorizationRequest::new(Role::StoreManager, ORDER, Action::Update)
                .with_caller_unit("WH-01")
                .with_target_unit("WH-02"),
        );
        assert!(!mismatch.allowed);
        assert_eq!(mismatch.reason, DecisionReason::WarehouseMismatch);
        assert_eq!(
            mismatch.matched,
            Some(Permission::warehouse(ORDER, Action::Update))
        );

        let none = eval.decide(&AuthorizationRequest::new(Role::Driver, WAREHOUSE, Action::Read));
        assert!(!none.allowed);
        assert_eq!(none.reason, DecisionReason::NoMatchingGrant);
        assert!(none.matched.is_none());
    }

    #[test]
    fn test_batch_decide_preserves_order() {
        let eval = PolicyEvaluator::logistics();
        let requests = [
            AuthorizationRequest::new(Role::Driver, DELIVERY, Action::Update),
            AuthorizationRequest::new(Role::Driver, PRICING, Action::Update),
            AuthorizationRequest::new(Role::SystemAdmin, PRICING, Action::Delete),
        ];

        let allowed: Vec<bool> = eval
            .batch_decide(&requests)
            .into_iter()
            .map(|decision| decision.allowed)
            .collect();

        assert_eq!(allowed, vec![true, false, true]);
    }

    #[test]
    fn test_raw_entry_points_reject_malformed_input() {
        let eval = PolicyEvaluator::logistics();

        assert!(eval.authorize_raw(Role::Customer, "order", "read"));
        assert!(!eval.authorize_raw(Role::Customer, "Order", "read"));
        assert!(!eval.authorize_raw(Role::Customer, "order", "READ"));
        assert!(!eval.authorize_raw(Role::Customer, "", "read"));
        assert!(!eval.authorize_raw(Role::Customer, "order", ""));

        assert!(eval.authorize_with_scope_raw(
            Role::StoreManager,
            "order",
            "update",
            Some("WH-01"),
            Some("WH-01"),
        ));
        assert!(!eval.authorize_with_scope_raw(
            Role::StoreManager,
            "order",
            "update",
            Some("WH-01"),
            Some("wh-01"),
        ));
    }

    #[test]
    fn test_from_config() {
        let config = PolicyConfig {
            table_path: None,
            scope_mode: ScopeMode::Strict,
        };

        let eval = PolicyEvaluator::from_config(&config).unwrap();

        assert_eq!(eval.scope_mode(), ScopeMode::Strict);
        assert_eq!(eval.table(), &PolicyTable::logistics());
        assert!(!eval.permissions_for(Role::Driver).is_empty());
    }

    #[test]
    fn test_from_config_with_missing_file() {
        let config = PolicyConfig {
            table_path: Some("/nonexistent/policy.toml".to_string()),
            scope_mode: ScopeMode::Lenient,
        };

        assert!(matches!(
            PolicyEvaluator::from_config(&config),
            Err(PolicyError::TableNotFound(_))
        ));
    }
}
