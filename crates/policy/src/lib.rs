//! freight-policy - 物流权限策略核心
//!
//! 角色 / 资源 / 操作 / 作用域 (全局、本仓库、本人) 的 RBAC 判定。
//! 策略表在进程启动时构建一次，之后只读；评估是无副作用的纯函数。

pub mod defaults;
pub mod error;
pub mod evaluator;
mod loader;
pub mod permission;
pub mod request;
pub mod role;
pub mod table;

pub use defaults::shared_table;
pub use error::PolicyError;
pub use evaluator::PolicyEvaluator;
pub use freight_config::ScopeMode;
pub use permission::{Action, Permission, Resource, Scope, resources};
pub use request::{AuthorizationRequest, Decision, DecisionReason};
pub use role::Role;
pub use table::{PolicyTable, PolicyTableBuilder};
