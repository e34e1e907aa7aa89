//! Publish/subscribe bus for cross-cutting UI notifications.
//!
//! Events are queued by `publish` and taken in publish order by `dispatch`, once per frame. The
//! owner hands them to its modules with `forward`; a module only sees the kinds listed in its
//! `EventListener::interests`.

use crate::world::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GoldChanged,
    LivesChanged,
    WaveStarted,
    WaveCompleted,
    TowerSelected,
    TowerDeselected,
    UpgradePurchased,
    SkillAllocated,
    SettingsChanged,
    StyleChanged,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GoldChanged { gold: u32, delta: i64 },
    LivesChanged { lives: u32, delta: i64 },
    WaveStarted { wave: u32, total: u32 },
    WaveCompleted { wave: u32 },
    TowerSelected { tower: String },
    TowerDeselected,
    UpgradePurchased { path: usize, level: u32 },
    SkillAllocated { node: String },
    SettingsChanged,
    StyleChanged { index: usize },
    Victory(RunSummary),
    Defeat,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GoldChanged { .. } => EventKind::GoldChanged,
            GameEvent::LivesChanged { .. } => EventKind::LivesChanged,
            GameEvent::WaveStarted { .. } => EventKind::WaveStarted,
            GameEvent::WaveCompleted { .. } => EventKind::WaveCompleted,
            GameEvent::TowerSelected { .. } => EventKind::TowerSelected,
            GameEvent::TowerDeselected => EventKind::TowerDeselected,
            GameEvent::UpgradePurchased { .. } => EventKind::UpgradePurchased,
            GameEvent::SkillAllocated { .. } => EventKind::SkillAllocated,
            GameEvent::SettingsChanged => EventKind::SettingsChanged,
            GameEvent::StyleChanged { .. } => EventKind::StyleChanged,
            GameEvent::Victory(_) => EventKind::Victory,
            GameEvent::Defeat => EventKind::Defeat,
        }
    }
}

/// Implemented by modules that react to bus traffic forwarded by their owner.
pub trait EventListener {
    /// Kinds this listener is subscribed to; `forward` skips everything else.
    fn interests(&self) -> &'static [EventKind];

    fn on_event(&mut self, event: &GameEvent);
}

/// Hands each event the listener subscribed to over, in order.
pub fn forward(events: &[GameEvent], listener: &mut dyn EventListener) {
    let interests = listener.interests();
    for event in events {
        if interests.contains(&event.kind()) {
            listener.on_event(event);
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Takes every queued event in publish order.
    pub fn dispatch(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    /// Drops queued events without delivering them.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct GoldWatcher {
        seen: Vec<GameEvent>,
    }

    impl EventListener for GoldWatcher {
        fn interests(&self) -> &'static [EventKind] {
            &[EventKind::GoldChanged]
        }

        fn on_event(&mut self, event: &GameEvent) {
            self.seen.push(event.clone());
        }
    }

    #[test]
    fn listeners_only_receive_their_kinds_in_publish_order() {
        let mut bus = EventBus::new();
        let mut watcher = GoldWatcher::default();

        bus.publish(GameEvent::GoldChanged { gold: 10, delta: 10 });
        bus.publish(GameEvent::Defeat);
        bus.publish(GameEvent::GoldChanged { gold: 5, delta: -5 });
        assert_eq!(bus.pending(), 3);

        let delivered = bus.dispatch();
        assert_eq!(delivered.len(), 3);
        forward(&delivered, &mut watcher);
        assert_eq!(
            watcher.seen,
            vec![
                GameEvent::GoldChanged { gold: 10, delta: 10 },
                GameEvent::GoldChanged { gold: 5, delta: -5 },
            ]
        );
        assert_eq!(bus.pending(), 0);
        assert!(bus.dispatch().is_empty());
    }

    #[test]
    fn clear_discards_queued_events() {
        let mut bus = EventBus::new();
        bus.publish(GameEvent::SettingsChanged);
        bus.clear();
        assert!(bus.dispatch().is_empty());
    }
}
