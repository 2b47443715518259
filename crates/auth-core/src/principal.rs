//! 已认证主体

use freight_common::{UserId, WarehouseId};
use freight_errors::AppResult;
use freight_policy::Role;

use crate::role_mapping::RoleMapping;
use crate::token::Claims;

/// 已认证主体
///
/// 会话内角色不可变，更换角色需要重新登录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    /// 所属仓库 (客户、司机等角色通常没有)
    pub warehouse: Option<WarehouseId>,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            warehouse: None,
        }
    }

    pub fn with_warehouse(mut self, warehouse: impl Into<WarehouseId>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    /// 从已验证的 Claims 构建
    pub fn from_claims(claims: &Claims, mapping: &RoleMapping) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            role: mapping.resolve(&claims.role)?,
            warehouse: claims.warehouse(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenService;
    use freight_errors::AppError;

    fn tokens() -> TokenService {
        TokenService::new(
            "test_secret",
            3600,
            "freight-identity".to_string(),
            "freight-portal".to_string(),
        )
    }

    #[test]
    fn test_from_claims() {
        let tokens = tokens();
        let user_id = UserId::new();
        let token = tokens
            .issue(&user_id, "WAREHOUSE_STAFF", Some(&WarehouseId::from("WH-03")))
            .unwrap();
        let claims = tokens.validate(&token).unwrap();

        let principal = Principal::from_claims(&claims, &RoleMapping::standard()).unwrap();

        assert_eq!(
            principal,
            Principal::new(user_id, Role::WarehouseStaff).with_warehouse("WH-03")
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let tokens = tokens();
        let token = tokens.issue(&UserId::new(), "SUPERUSER", None).unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert!(matches!(
            Principal::from_claims(&claims, &RoleMapping::standard()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
