//! Frame-delayed event queue.
//!
//! An unordered bag of pending events plus a monotonically increasing frame
//! counter. Scheduling always lands at least one tick in the future, so an
//! event can never be processed in the tick that raised it — that one-frame
//! floor is what prevents reentrant trigger cascades within a frame.
//!
//! Per-event life cycle: Scheduled → (frame advances) → Ready →
//! Dispatched. There is no retry state: once an event's frame arrives it is
//! removed and either broadcast or dropped, exactly once.

use crossbeam_channel::Receiver;

use crate::core::{ItemId, Level};
use crate::flows::TargetValue;
use crate::history::Dispatcher;
use crate::rules::GameRules;

use super::event::{GameEvent, GameEventKind};

/// The delayed dispatch queue.
#[derive(Debug, Default)]
pub struct GameEvents {
    queue: Vec<GameEvent>,
    frame: u64,
    dispatcher: Dispatcher<GameEvent>,
}

impl GameEvents {
    /// Create an empty queue at frame zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation frame.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of events still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Subscribe to dispatched-and-allowed events.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        self.dispatcher.subscribe()
    }

    /// Drop all pending events and rewind the frame counter.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.frame = 0;
    }

    /// Schedule an event for `frame + 1 + delay`. A zero delay still waits
    /// one full tick.
    pub fn add_event(
        &mut self,
        kind: GameEventKind,
        source: Option<ItemId>,
        target: Option<ItemId>,
        delay: u64,
        data: TargetValue,
    ) {
        let mut event = GameEvent::new(kind, self.frame + 1 + delay).with_data(data);
        event.source = source;
        event.target = target;
        self.queue.push(event);
    }

    /// Remove pending events from a source, optionally only of one kind.
    /// Already-dispatched events are untouched; there is no un-dispatch.
    pub fn cancel_events(&mut self, source: ItemId, kind: Option<GameEventKind>) {
        self.queue.retain(|event| {
            event.source != Some(source) || kind.is_some_and(|k| event.kind != k)
        });
    }

    /// Advance one tick, then dispatch every event whose frame has arrived.
    ///
    /// The scan runs in reverse because dispatch removes elements from the
    /// backing vector in place; forward iteration would skip the element
    /// after each removal. A consequence callers must not rely on: among
    /// equally-ready events, dispatch order is reverse insertion order —
    /// chains that need ordering use explicit `wait` clauses instead.
    pub fn step(&mut self, level: &Level) {
        self.frame += 1;

        let mut i = self.queue.len();
        while i > 0 {
            i -= 1;
            if self.queue[i].is_ready(self.frame) {
                let event = self.queue.remove(i);
                self.process_event(&event, level);
            }
        }
    }

    /// Dispatch one event if the rules allow it. A denied event is dropped
    /// silently — an attack landing after its target died is a race the
    /// design expects, not an error.
    pub fn process_event(&mut self, event: &GameEvent, level: &Level) {
        if GameRules::allow_event(event, level) {
            self.dispatcher.dispatch(event);
        } else {
            log::debug!("event {:?} denied by rules, dropped", event.kind);
        }
    }
}
