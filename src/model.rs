pub mod database;
pub mod discussion;
pub mod message;
pub mod session;
pub mod snowflake;
pub mod thread;
pub mod user;

pub use database::{Database, StoreError};
pub use discussion::{Discussion, ItemType};
pub use message::{Author, Message};
pub use session::Session;
pub use snowflake::Snowflake;
pub use user::User;

use tokio::sync::Mutex;

pub struct AppState {
    pub database: Mutex<Database>,
    pub snowcloud: crate::Snowcloud,
}

impl AppState {
    pub fn new() -> AppState {
        let database = Database::build().expect("database opens and initializes");
        let snowcloud = crate::Snowcloud::new(crate::PRIMARY_ID, crate::EPOCH)
            .expect("snowcloud config is valid");

        AppState {
            database: Mutex::new(database),
            snowcloud,
        }
    }

    pub fn next_snowflake(&self) -> Snowflake {
        self.snowcloud
            .next_id()
            .expect("generates a snowflake")
            .into()
    }
}

impl Default for AppState {
    fn default() -> AppState {
        AppState::new()
    }
}
