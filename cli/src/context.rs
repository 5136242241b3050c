use std::sync::Arc;

use clanboard_core::{ClanBattleEngine, EngineBuilder, EngineConfig, EngineConfigExt, FileStore, MemoryStore, Store};
use clanboard_types::{GroupId, MemberId};
use tokio::sync::RwLock;

/// Group and member the shell issues commands as
#[derive(Debug, Clone, Copy, Default)]
pub struct Actor {
    pub group: GroupId,
    pub member: MemberId,
}

/// Holds all shared state for the CLI application.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<EngineConfig>,
    pub engine: Arc<ClanBattleEngine>,
    actor: Arc<RwLock<Actor>>,
}

impl CliContext {
    /// Load config and open the configured store (in-memory when no data file is set)
    pub fn new() -> Result<Self, String> {
        let config = EngineConfig::load();
        let store: Arc<dyn Store> = match &config.data_file {
            Some(path) => Arc::new(FileStore::open(path).map_err(|e| format!("cannot open {path}: {e}"))?),
            None => Arc::new(MemoryStore::new()),
        };
        let engine = EngineBuilder::from_config(&config).store(store).build();
        Ok(Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            actor: Arc::new(RwLock::new(Actor::default())),
        })
    }

    pub async fn actor(&self) -> Actor {
        *self.actor.read().await
    }

    pub async fn set_group(&self, group: GroupId) {
        self.actor.write().await.group = group;
    }

    pub async fn set_member(&self, member: MemberId) {
        self.actor.write().await.member = member;
    }
}
