pub mod config;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod routes;

use std::sync::Arc;

use config::Config;
use directory::UserDirectory;
use gateway::history::ConversationStore;
use gateway::presence::{Dice, PresenceStore, ThreadRngDice};
use gateway::registry::ConnectionRegistry;
use gateway::replies::CannedReplies;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<UserDirectory>,
    pub presence: Arc<PresenceStore>,
    pub history: Arc<ConversationStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub replies: Arc<CannedReplies>,
}

impl AppState {
    /// Build state with the production random source.
    pub fn new(config: Config) -> Self {
        Self::with_dice(config, Box::new(ThreadRngDice))
    }

    /// Build state with an injected random source so tests can pin
    /// presence rolls.
    pub fn with_dice(config: Config, dice: Box<dyn Dice>) -> Self {
        let presence = Arc::new(PresenceStore::new(dice));
        Self {
            config: Arc::new(config),
            directory: Arc::new(UserDirectory::new(presence.clone())),
            presence,
            history: Arc::new(ConversationStore::new()),
            registry: Arc::new(ConnectionRegistry::new()),
            replies: Arc::new(CannedReplies::new()),
        }
    }
}
