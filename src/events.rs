//! Configuration change notifications.
//!
//! Editors of the engine configuration go through [`ConfigStore`], which
//! publishes a [`BoardEvent`] after every change. A single [`BoardListener`]
//! task owns the initialized board and handles events one at a time, so two
//! applies never overlap.

use std::sync::Arc;

use async_trait::async_trait;
use hellen_shared::EngineConfiguration;
use hellen_shared::event_interface::EventInterface;
use hellen_shared::hardware_traits::{PinProvider, WakeSource};
use tokio::sync::mpsc::{Receiver, Sender, channel};
use tokio::sync::{Mutex, RwLock};

use crate::board::InitializedBoard;
use crate::error::BoardError;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// The configuration record was modified. `previous` is informational.
    ConfigurationChanged { previous: Option<Box<EngineConfiguration>> },
    PrepareForStop,
    Shutdown,
}

/// Tokio channel carrying board events.
pub struct ConfigChangeBus {
    sender: Sender<BoardEvent>,
    receiver: Mutex<Receiver<BoardEvent>>,
}

impl ConfigChangeBus {
    pub fn new(buffer: usize) -> Self {
        let (sender, receiver) = channel(buffer);
        Self { sender, receiver: Mutex::new(receiver) }
    }

    pub fn sender(&self) -> Sender<BoardEvent> {
        self.sender.clone()
    }
}

#[async_trait]
impl EventInterface for ConfigChangeBus {
    type Event = BoardEvent;

    async fn send_event(&self, event: Self::Event) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.sender.send(event).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    }

    async fn recv_event(&self) -> Option<Self::Event> {
        let mut rx = self.receiver.lock().await;
        rx.recv().await
    }
}

/// Shared engine configuration that notifies the board on every edit.
#[derive(Clone)]
pub struct ConfigStore {
    config: Arc<RwLock<EngineConfiguration>>,
    sender: Sender<BoardEvent>,
}

impl ConfigStore {
    pub fn new(config: EngineConfiguration, bus: &ConfigChangeBus) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            sender: bus.sender(),
        }
    }

    pub async fn snapshot(&self) -> EngineConfiguration {
        self.config.read().await.clone()
    }

    /// Applies `edit` and publishes a change notification.
    pub async fn update<F>(&self, edit: F) -> Result<(), BoardError>
    where
        F: FnOnce(&mut EngineConfiguration),
    {
        let previous = {
            let mut config = self.config.write().await;
            let previous = config.clone();
            edit(&mut config);
            previous
        };
        self.sender
            .send(BoardEvent::ConfigurationChanged { previous: Some(Box::new(previous)) })
            .await
            .map_err(|_| BoardError::EventBusClosed)
    }

    /// Replaces the whole record, as when a new configuration is loaded.
    pub async fn replace(&self, config: EngineConfiguration) -> Result<(), BoardError> {
        self.update(move |current| *current = config).await
    }

    fn shared(&self) -> Arc<RwLock<EngineConfiguration>> {
        self.config.clone()
    }
}

/// Owns the initialized board and serialises every event applied to it.
pub struct BoardListener<P: PinProvider> {
    board: InitializedBoard<P>,
    config: Arc<RwLock<EngineConfiguration>>,
    applied: u64,
}

impl<P> BoardListener<P>
where
    P: PinProvider + WakeSource,
{
    pub fn new(board: InitializedBoard<P>, store: &ConfigStore) -> Self {
        Self {
            board,
            config: store.shared(),
            applied: 0,
        }
    }

    /// Handles events until `Shutdown`, then hands the board back. The bus
    /// keeps its own sender, so the loop does not end on its own.
    pub async fn run<E>(mut self, bus: Arc<E>) -> InitializedBoard<P>
    where
        E: EventInterface<Event = BoardEvent> + ?Sized,
    {
        while let Some(event) = bus.recv_event().await {
            match event {
                BoardEvent::ConfigurationChanged { previous } => {
                    let config = self.config.read().await;
                    self.board.on_configuration_change(&config, previous.as_deref());
                    self.applied += 1;
                    tracing::debug!("Configuration change #{} applied", self.applied);
                }
                BoardEvent::PrepareForStop => {
                    if let Err(e) = self.board.prepare_for_stop() {
                        tracing::warn!("Failed to arm wake line: {}", e);
                    }
                }
                BoardEvent::Shutdown => {
                    tracing::info!("Board listener stopping after {} applies", self.applied);
                    break;
                }
            }
        }
        self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::registry::PinRole;
    use crate::revision::BoardRevision;
    use crate::sim::RecordingPinProvider;

    #[tokio::test]
    async fn test_bus_delivers_in_order() {
        let bus = ConfigChangeBus::new(4);
        bus.send_event(BoardEvent::PrepareForStop).await.unwrap();
        bus.send_event(BoardEvent::Shutdown).await.unwrap();
        assert_eq!(bus.recv_event().await, Some(BoardEvent::PrepareForStop));
        assert_eq!(bus.recv_event().await, Some(BoardEvent::Shutdown));
    }

    #[tokio::test]
    async fn test_update_publishes_previous_record() {
        let bus = ConfigChangeBus::new(4);
        let store = ConfigStore::new(EngineConfiguration::default(), &bus);
        store.update(|c| c.board_use_d2_pull_down = true).await.unwrap();

        match bus.recv_event().await {
            Some(BoardEvent::ConfigurationChanged { previous: Some(previous) }) => {
                assert!(!previous.board_use_d2_pull_down);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(store.snapshot().await.board_use_d2_pull_down);
    }

    #[tokio::test]
    async fn test_listener_applies_each_change() {
        let bus = Arc::new(ConfigChangeBus::new(8));
        let store = ConfigStore::new(EngineConfiguration::default(), &bus);
        let board = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('G'))
            .init_hardware(&store.snapshot().await)
            .unwrap();
        let listener = BoardListener::new(board, &store);

        store.update(|c| c.board_use_tach_pull_up = true).await.unwrap();
        store.update(|c| c.board_use_crank_pull_up = true).await.unwrap();
        store.update(|c| c.board_use_tach_pull_up = false).await.unwrap();
        bus.send_event(BoardEvent::Shutdown).await.unwrap();

        let board = listener.run(bus.clone()).await;
        assert_eq!(board.pull_resistor(PinRole::TachPullUp), Some(false));
        assert_eq!(board.pull_resistor(PinRole::CrankPPullUp), Some(true));
        assert_eq!(board.pull_resistor(PinRole::CrankNPullUp), Some(true));
    }
}
