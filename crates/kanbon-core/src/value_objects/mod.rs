//! Value objects - immutable types that represent domain concepts

mod address;
mod global_id;
mod security_token;
mod snowflake;

pub use address::AddressKind;
pub use global_id::{GlobalId, NodeType};
pub use security_token::{generate_token, seconds_until_next_request, token_valid, TokenPolicy};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
