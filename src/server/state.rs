use axum::extract::FromRef;

use crate::kv_store::KeyValueStore;
use crate::oauth::SpotifyOAuthClient;
use crate::voting::VotingService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedKeyValueStore = Arc<dyn KeyValueStore>;
pub type GuardedVotingService = Arc<VotingService>;
pub type GuardedOAuthClient = Arc<SpotifyOAuthClient>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedKeyValueStore,
    pub voting: GuardedVotingService,
    pub oauth: GuardedOAuthClient,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        store: GuardedKeyValueStore,
        voting: GuardedVotingService,
        oauth: GuardedOAuthClient,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            store,
            voting,
            oauth,
            hash: env!("BUILD_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedKeyValueStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedVotingService {
    fn from_ref(input: &ServerState) -> Self {
        input.voting.clone()
    }
}

impl FromRef<ServerState> for GuardedOAuthClient {
    fn from_ref(input: &ServerState) -> Self {
        input.oauth.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
