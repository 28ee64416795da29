pub mod hash;
pub mod permissions;
pub mod token;
pub mod verify_session;
