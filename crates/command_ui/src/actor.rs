use std::fmt;

use crate::store::{EntityId, EntityStore};

/// Stable identity of a (possibly disconnected) player, issued by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorRef(pub u64);

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// A live player entity found for an [`ActorRef`] during one invocation.
///
/// Handles are plain tokens: they name the entity but do not borrow the
/// store, so the gateway can take `&mut EntityStore` afterwards. They are only
/// meaningful inside the invocation that produced them; entity ids are never
/// reused, so a leaked handle can at worst go stale, never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorHandle {
    actor: ActorRef,
    entity: EntityId,
}

impl ActorHandle {
    pub(crate) fn new(actor: ActorRef, entity: EntityId) -> Self {
        Self { actor, entity }
    }

    pub fn actor(&self) -> ActorRef {
        self.actor
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

/// Looks up the live actor behind a reference. Must not mutate the store.
pub trait ActorResolver: Send + Sync {
    fn resolve(&self, store: &EntityStore, actor: ActorRef) -> Option<ActorHandle>;
}

/// Resolves references to entities carrying a matching [`crate::Player`] component.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerResolver;

impl ActorResolver for PlayerResolver {
    fn resolve(&self, store: &EntityStore, actor: ActorRef) -> Option<ActorHandle> {
        let entity = store.player_entity(actor)?;
        let player = store.player(entity)?;
        (player.actor() == actor).then(|| ActorHandle::new(actor, entity))
    }
}
