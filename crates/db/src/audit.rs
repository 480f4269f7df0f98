//! Audit-column contract shared by every `sales` table.
//!
//! Each table carries a surrogate `id`, a server-generated `uuid`, and the six
//! `sys_*` columns. A row is live while `sys_deleted_at IS NULL`.

use crm_shared::Resource;
use sea_orm::EntityTrait;
use uuid::Uuid;

/// Entity whose rows are soft-deleted and stamped with actor columns.
pub trait Audited: EntityTrait {
    /// Resource used for guard errors.
    const RESOURCE: Resource;

    /// Surrogate key, used for stable ordering.
    fn id_column() -> Self::Column;
    /// External identifier.
    fn uuid_column() -> Self::Column;
    /// Last update timestamp.
    fn updated_at_column() -> Self::Column;
    /// Last update actor.
    fn updated_by_column() -> Self::Column;
    /// Soft-delete timestamp.
    fn deleted_at_column() -> Self::Column;
    /// Soft-delete actor.
    fn deleted_by_column() -> Self::Column;
    /// Reads the external identifier of a row.
    fn uuid_of(model: &Self::Model) -> Uuid;
}

/// Implements [`Audited`] for the `Entity` of the enclosing entity module.
macro_rules! audited {
    ($resource:expr) => {
        impl $crate::audit::Audited for Entity {
            const RESOURCE: crm_shared::Resource = $resource;

            fn id_column() -> Column {
                Column::Id
            }

            fn uuid_column() -> Column {
                Column::Uuid
            }

            fn updated_at_column() -> Column {
                Column::SysUpdatedAt
            }

            fn updated_by_column() -> Column {
                Column::SysUpdatedBy
            }

            fn deleted_at_column() -> Column {
                Column::SysDeletedAt
            }

            fn deleted_by_column() -> Column {
                Column::SysDeletedBy
            }

            fn uuid_of(model: &Model) -> uuid::Uuid {
                model.uuid
            }
        }
    };
}

pub(crate) use audited;
