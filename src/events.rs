//! Shared event dispatch for resize and pointer input
//!
//! Window-level resize and pointer-move events fan out to every effect
//! instance. Rather than each instance hooking the window directly, the
//! [`EventBus`] hands out explicit [`Subscription`] handles; an instance must
//! hold its handles to keep receiving events and must release them on
//! teardown. N subscribers multiply per-event work by N, which is fine at the
//! single-digit instance counts this crate targets.

use std::collections::VecDeque;

/// Events delivered to effect instances
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageEvent {
    /// The host window was resized; viewport sizes have already been updated
    Resized { width: u32, height: u32 },
    /// Pointer position in normalized device coordinates, (0, 0) at centre
    PointerMoved { x: f32, y: f32 },
}

/// Event topics a subscriber can attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Resize,
    Pointer,
}

/// Handle identifying one subscriber on one topic
///
/// Releasing the handle via [`EventBus::release`] consumes it, so a destroyed
/// instance cannot keep receiving events by accident.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    topic: Topic,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

struct Mailbox {
    id: u64,
    queue: VecDeque<StageEvent>,
}

/// Dispatches stage events to per-subscriber mailboxes
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    resize: Vec<Mailbox>,
    pointer: Vec<Mailbox>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber on the given topic
    pub fn subscribe(&mut self, topic: Topic) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.topic_mut(topic).push(Mailbox {
            id,
            queue: VecDeque::new(),
        });
        Subscription { id, topic }
    }

    /// Removes a subscriber, consuming its handle
    pub fn release(&mut self, subscription: Subscription) {
        self.topic_mut(subscription.topic)
            .retain(|m| m.id != subscription.id);
    }

    /// Delivers an event to every mailbox on the topic
    pub fn publish(&mut self, topic: Topic, event: StageEvent) {
        for mailbox in self.topic_mut(topic) {
            mailbox.queue.push_back(event);
        }
    }

    /// Takes the next pending event for a subscriber, if any
    pub fn poll(&mut self, subscription: &Subscription) -> Option<StageEvent> {
        self.topic_mut(subscription.topic)
            .iter_mut()
            .find(|m| m.id == subscription.id)
            .and_then(|m| m.queue.pop_front())
    }

    /// Number of live subscribers on a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        match topic {
            Topic::Resize => self.resize.len(),
            Topic::Pointer => self.pointer.len(),
        }
    }

    fn topic_mut(&mut self, topic: Topic) -> &mut Vec<Mailbox> {
        match topic {
            Topic::Resize => &mut self.resize,
            Topic::Pointer => &mut self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_poll() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(Topic::Resize);
        assert_eq!(bus.subscriber_count(Topic::Resize), 1);

        bus.publish(
            Topic::Resize,
            StageEvent::Resized {
                width: 800,
                height: 600,
            },
        );
        assert_eq!(
            bus.poll(&sub),
            Some(StageEvent::Resized {
                width: 800,
                height: 600
            })
        );
        assert_eq!(bus.poll(&sub), None);
    }

    #[test]
    fn test_release_stops_delivery() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(Topic::Pointer);
        bus.release(sub);

        assert_eq!(bus.subscriber_count(Topic::Pointer), 0);
        // Publishing to an empty topic must not panic
        bus.publish(Topic::Pointer, StageEvent::PointerMoved { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_events_fan_out_to_all_subscribers() {
        let mut bus = EventBus::new();
        let a = bus.subscribe(Topic::Pointer);
        let b = bus.subscribe(Topic::Pointer);

        bus.publish(Topic::Pointer, StageEvent::PointerMoved { x: 0.5, y: -0.5 });

        assert!(bus.poll(&a).is_some());
        assert!(bus.poll(&b).is_some());
    }

    #[test]
    fn test_topics_are_independent() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe(Topic::Resize);

        bus.publish(Topic::Pointer, StageEvent::PointerMoved { x: 1.0, y: 1.0 });
        assert_eq!(bus.poll(&sub), None);
    }
}
