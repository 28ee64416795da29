pub mod auth;
pub mod logger;
pub mod model;
pub mod routes;
pub mod view;

pub type Snowcloud = snowcloud::MultiThread<43, 8, 12>;
pub const EPOCH: u64 = 1650667342;
pub const PRIMARY_ID: i64 = 1;
