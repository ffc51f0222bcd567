//! Publish/subscribe channel owned by one viewer instance.
//!
//! Decouples the viewer from its host: selection, jump completion and
//! window changes go out as [`ViewerEvent`]s instead of direct calls.
//! Single-threaded; handlers run synchronously inside `publish`.

use crate::model::LineNumber;
use crate::virtual_list::RenderWindow;
use std::fmt;

/// Event names a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A line was selected.
    LineSelect,
    /// A jump finished rendering.
    Jumped,
    /// The rendered window changed.
    Update,
}

impl EventName {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineSelect => "line-select",
            Self::Jumped => "jumped",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events published by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// `line-select(lineNumber)`
    LineSelect(LineNumber),
    /// `jumped()`, once per completed, non-superseded jump
    Jumped,
    /// `update(visibleRange)`
    Update(RenderWindow),
}

impl ViewerEvent {
    /// Subscription key this event is delivered under.
    pub fn name(&self) -> EventName {
        match self {
            Self::LineSelect(_) => EventName::LineSelect,
            Self::Jumped => EventName::Jumped,
            Self::Update(_) => EventName::Update,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event handler callback.
pub type Handler = Box<dyn FnMut(&ViewerEvent)>;

struct Subscriber {
    id: SubscriptionId,
    name: EventName,
    handler: Handler,
}

/// Explicit event bus with subscribe/unsubscribe lifecycle.
///
/// Subscribers to one name are called in subscription order; events of one
/// name are delivered in publish order.
#[derive(Default)]
pub struct EventChannel {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field(
                "subscribers",
                &self
                    .subscribers
                    .iter()
                    .map(|s| (s.id, s.name))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EventChannel {
    /// An empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events named `name`.
    pub fn subscribe(
        &mut self,
        name: EventName,
        handler: impl FnMut(&ViewerEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            name,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber of its name.
    ///
    /// Returns the number of handlers called.
    pub fn publish(&mut self, event: ViewerEvent) -> usize {
        let name = event.name();
        let mut delivered = 0;
        for subscriber in self.subscribers.iter_mut().filter(|s| s.name == name) {
            (subscriber.handler)(&event);
            delivered += 1;
        }
        delivered
    }
}
