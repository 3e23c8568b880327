//! Shared application state for the patchwire server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::doc::{DocumentSink, InMemorySink};
use crate::handlers::{PatchDocHandler, ServerInfoHandler};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    dispatcher: Dispatcher,
    sink: Arc<InMemorySink>,
}

impl AppState {
    /// Build application state and register the built-in handlers.
    pub fn new(cfg: ServerConfig) -> Self {
        let sink = InMemorySink::new();
        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(PatchDocHandler::new(
            sink.clone() as Arc<dyn DocumentSink>
        )));
        dispatcher.register(Arc::new(ServerInfoHandler::new()));

        tracing::info!(
            msgtypes = ?dispatcher.registered_msgtypes(),
            "handlers registered"
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                dispatcher,
                sink,
            }),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn sink(&self) -> &InMemorySink {
        &self.inner.sink
    }
}
