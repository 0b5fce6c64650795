use axum::extract::ws::{Message, WebSocket};
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use futures::stream::SplitSink;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{db::SharedGateway, models::DisplayConfig};

#[derive(Clone)]
pub struct AppState {
    pub gateway: SharedGateway,
    pub display: Arc<DisplayConfig>,
    pub viewers: ViewerConnectionMap,
}

impl AppState {
    pub fn new(gateway: SharedGateway, display: DisplayConfig) -> Self {
        Self {
            gateway,
            display: Arc::new(display),
            viewers: Default::default(),
        }
    }
}

#[derive(Debug)]
pub struct ViewerConnection {
    pub sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
}

// One live display session per socket
pub type ViewerConnectionMap = Arc<Mutex<HashMap<Uuid, Arc<ViewerConnection>>>>;

pub type RedisClient = Pool<RedisConnectionManager>;
