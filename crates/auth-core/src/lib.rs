//! freight-auth-core - 身份接入
//!
//! JWT Claims -> 角色映射 -> [`Principal`]，以及把策略判定转换为 403 的 [`AccessGuard`]

pub mod guard;
pub mod principal;
pub mod role_mapping;
pub mod token;

pub use guard::AccessGuard;
pub use principal::Principal;
pub use role_mapping::RoleMapping;
pub use token::{Claims, TokenService};
