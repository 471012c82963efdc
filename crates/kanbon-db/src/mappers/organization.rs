//! Organization entity <-> model mapper

use kanbon_core::entities::Organization;
use kanbon_core::value_objects::Snowflake;

use crate::models::OrganizationModel;

impl From<OrganizationModel> for Organization {
    fn from(model: OrganizationModel) -> Self {
        Organization {
            id: Snowflake::new(model.id),
            name: model.name,
            created_at: model.created_at,
        }
    }
}
