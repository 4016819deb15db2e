use crossbeam_channel::{Receiver, Sender};

use crate::collision::{CollisionClass, CollisionType};
use crate::object::{ObjectId, ObjectState};

/// Something observers of a scene may want to react to. Uses `ObjectId` only.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    /// `object` was offered a collision and a component consumed it.
    Collision {
        object: ObjectId,
        other: Option<ObjectId>,
        class: CollisionClass,
        side: CollisionType,
    },
    StateChanged {
        object: ObjectId,
        from: ObjectState,
        to: ObjectState,
    },
    /// An object description failed to load and was left out of the scene.
    ObjectSkipped { index: usize, reason: String },
    /// A collidable layer gave up resolving an object.
    ResolveFailed { object: ObjectId, layer_order: i32 },
}

/// Sending half handed to objects and layers.
pub type EventSender = Sender<SceneEvent>;

/// Unbounded event queue owned by a scene.
#[derive(Clone, Debug)]
pub struct EventChannel {
    sender: Sender<SceneEvent>,
    receiver: Receiver<SceneEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn receiver(&self) -> Receiver<SceneEvent> {
        self.receiver.clone()
    }

    /// Publish an event. Nothing happens if every receiver is gone.
    pub fn publish(&self, event: SceneEvent) {
        let _ = self.sender.send(event);
    }

    /// Drain events collected since the last call.
    pub fn drain(&self) -> Vec<SceneEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}
