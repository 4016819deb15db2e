use std::sync::Arc;

use crate::collision::{detect_mbr_collision, mbr_relate, CollisionClass, CollisionType, Relation};
use crate::geometry::Rectangle;
use crate::object::{CollisionEvent, GameObject, ObjectId, ObjectState};

/// The authoritative collection of objects in a scene.
///
/// Objects are held as `Arc<GameObject>` so query results stay valid while
/// the scene replaces entries during an update.
pub trait ObjectManager: Send {
    /// All objects in insertion order.
    fn objects(&self) -> &[Arc<GameObject>];

    /// Direct access for the scene's update loop.
    fn objects_mut(&mut self) -> &mut Vec<Arc<GameObject>>;

    /// Appends `object` and returns its id.
    fn add_object(&mut self, object: GameObject) -> ObjectId {
        let id = object.id();
        self.objects_mut().push(Arc::new(object));
        id
    }

    /// Objects whose bounds touch or lie inside `rect`.
    fn objects_in(&self, rect: &Rectangle) -> Vec<Arc<GameObject>>;

    /// Every overlapping pair, lower index first, each reported once.
    fn collisions(&self) -> Vec<CollisionEvent>;

    /// Drops dead objects, keeping the survivors in order. Returns how many
    /// were removed.
    fn remove_dead_objects(&mut self) -> usize;

    /// Looks an object up by id.
    fn find(&self, id: ObjectId) -> Option<&Arc<GameObject>> {
        self.objects().iter().find(|o| o.id() == id)
    }

    /// Number of objects, dead ones included until the next update.
    fn len(&self) -> usize {
        self.objects().len()
    }

    fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }
}

/// Brute-force object manager: every query is a linear scan.
#[derive(Debug, Default)]
pub struct SimpleObjectManager {
    objects: Vec<Arc<GameObject>>,
}

impl SimpleObjectManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectManager for SimpleObjectManager {
    fn objects(&self) -> &[Arc<GameObject>] {
        &self.objects
    }

    fn objects_mut(&mut self) -> &mut Vec<Arc<GameObject>> {
        &mut self.objects
    }

    fn objects_in(&self, rect: &Rectangle) -> Vec<Arc<GameObject>> {
        self.objects
            .iter()
            .filter(|o| {
                matches!(
                    mbr_relate(&o.bounding_polygon(), rect),
                    Relation::Touch | Relation::Inside
                )
            })
            .cloned()
            .collect()
    }

    fn collisions(&self) -> Vec<CollisionEvent> {
        let bounds: Vec<Rectangle> = self.objects.iter().map(|o| o.bounding_polygon()).collect();
        let mut events = Vec::new();
        for i in 0..bounds.len() {
            for j in (i + 1)..bounds.len() {
                if detect_mbr_collision(&bounds[i], &bounds[j]) != CollisionType::None {
                    events.push(CollisionEvent {
                        first: i,
                        second: j,
                        collision_type: CollisionType::General,
                        class: CollisionClass::Entity,
                    });
                }
            }
        }
        events
    }

    fn remove_dead_objects(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| o.state() != ObjectState::Dead);
        before - self.objects.len()
    }
}
