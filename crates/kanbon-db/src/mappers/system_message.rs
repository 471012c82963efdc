//! System message entity <-> model mapper

use kanbon_core::entities::SystemMessage;
use kanbon_core::value_objects::Snowflake;

use crate::models::SystemMessageModel;

impl From<SystemMessageModel> for SystemMessage {
    fn from(model: SystemMessageModel) -> Self {
        SystemMessage {
            id: Snowflake::new(model.id),
            account_id: Snowflake::new(model.account_id),
            code: model.code,
            message: model.message.0,
            read: model.read,
            read_at: model.read_at,
            created_at: model.created_at,
        }
    }
}
