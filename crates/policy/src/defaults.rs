//! 内置物流策略表

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::permission::{Action, Permission, Resource, resources::*};
use crate::role::Role;
use crate::table::PolicyTable;

static LOGISTICS: Lazy<Arc<PolicyTable>> = Lazy::new(|| Arc::new(PolicyTable::logistics()));

/// 进程级共享的内置策略表，首次访问时构建，之后只读
pub fn shared_table() -> Arc<PolicyTable> {
    Arc::clone(&LOGISTICS)
}

impl PolicyTable {
    /// 内置物流策略表
    pub fn logistics() -> Self {
        use Action::*;

        PolicyTable::builder()
            .grant(Role::SystemAdmin, Permission::all(Resource::ANY, Wildcard))
            .grants(
                Role::Management,
                [
                    Permission::all(Resource::ANY, Read),
                    Permission::all(REPORTS, Execute),
                    Permission::all(REPORTS, Create),
                    Permission::all(ORDER, Wildcard),
                    Permission::all(WAREHOUSE, Wildcard),
                    Permission::all(USER, Create),
                    Permission::all(USER, Update),
                    Permission::all(PRICING, Update),
                    Permission::all(ROUTE, Assign),
                ],
            )
            .grants(
                Role::StoreManager,
                [
                    Permission::warehouse(ORDER, Read),
                    Permission::warehouse(ORDER, Update),
                    Permission::warehouse(ORDER, Assign),
                    Permission::warehouse(INVENTORY, Wildcard),
                    Permission::warehouse(WAREHOUSE, Read),
                    Permission::warehouse(SHIPMENT, Create),
                    Permission::warehouse(SHIPMENT, Read),
                    Permission::warehouse(SHIPMENT, Update),
                    Permission::warehouse(STAFF, Read),
                    Permission::warehouse(REPORTS, Read),
                    Permission::warehouse(VEHICLE, Read),
                ],
            )
            .grants(
                Role::WarehouseStaff,
                [
                    Permission::warehouse(INVENTORY, Read),
                    Permission::warehouse(INVENTORY, Update),
                    Permission::warehouse(ORDER, Read),
                    Permission::warehouse(SHIPMENT, Read),
                    Permission::warehouse(SHIPMENT, Update),
                    Permission::warehouse(PACKAGE, Create),
                    Permission::warehouse(PACKAGE, Update),
                ],
            )
            .grants(
                Role::Driver,
                [
                    Permission::own(DELIVERY, Read),
                    Permission::own(DELIVERY, Update),
                    Permission::own(ROUTE, Read),
                    Permission::own(SHIPMENT, Read),
                    Permission::own(VEHICLE, Read),
                    Permission::own(PROOF_OF_DELIVERY, Create),
                ],
            )
            .grants(
                Role::DriverAssistant,
                [
                    Permission::own(DELIVERY, Read),
                    Permission::own(ROUTE, Read),
                    Permission::own(SHIPMENT, Read),
                    Permission::own(PROOF_OF_DELIVERY, Create),
                ],
            )
            .grants(
                Role::Customer,
                [
                    Permission::own(ORDER, Create),
                    Permission::own(ORDER, Read),
                    Permission::own(ORDER, Update),
                    Permission::own(SHIPMENT, Read),
                    Permission::own(INVOICE, Read),
                    Permission::all(TRACKING, Read),
                    Permission::own(PROFILE, Read),
                    Permission::own(PROFILE, Update),
                ],
            )
            .build()
    }
}
