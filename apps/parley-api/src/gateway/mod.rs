pub mod events;
pub mod history;
pub mod presence;
pub mod registry;
pub mod replies;
pub mod server;
