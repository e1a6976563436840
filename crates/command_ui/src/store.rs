use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::actor::ActorRef;
use crate::page::{CloseReason, PageManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Player component: identity, permission tier and the active-page slot.
#[derive(Debug)]
pub struct Player {
    actor: ActorRef,
    name: String,
    privileged: bool,
    pages: PageManager,
}

impl Player {
    pub fn actor(&self) -> ActorRef {
        self.actor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageManager {
        &mut self.pages
    }
}

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub debug_name: String,
    player: Option<Player>,
}

impl Entity {
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{actor} is already connected as entity {entity:?}")]
    ActorAlreadyConnected { actor: ActorRef, entity: EntityId },
}

/// In-memory entity storage with an index of connected players.
#[derive(Debug, Default)]
pub struct EntityStore {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    players_by_actor: HashMap<ActorRef, EntityId>,
}

impl EntityStore {
    pub fn spawn(&mut self, debug_name: impl Into<String>) -> EntityId {
        self.spawn_internal(debug_name.into(), None)
    }

    pub fn spawn_player(
        &mut self,
        actor: ActorRef,
        name: impl Into<String>,
        privileged: bool,
    ) -> Result<EntityId, StoreError> {
        if let Some(&entity) = self.players_by_actor.get(&actor) {
            return Err(StoreError::ActorAlreadyConnected { actor, entity });
        }

        let name = name.into();
        let player = Player {
            actor,
            name: name.clone(),
            privileged,
            pages: PageManager::default(),
        };
        let id = self.spawn_internal(name, Some(player));
        self.players_by_actor.insert(actor, id);
        info!(actor = %actor, entity = id.0, privileged, "player_joined");
        Ok(id)
    }

    fn spawn_internal(&mut self, debug_name: String, player: Option<Player>) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.push(Entity {
            id,
            debug_name,
            player,
        });
        id
    }

    /// Removes the entity; a player's active page is closed as disconnected.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.iter().position(|entity| entity.id == id) else {
            return false;
        };

        let mut entity = self.entities.remove(index);
        if let Some(player) = entity.player.as_mut() {
            self.players_by_actor.remove(&player.actor);
            player.pages.close(CloseReason::Disconnected);
            info!(actor = %player.actor, entity = id.0, "player_left");
        }
        true
    }

    pub fn despawn_player(&mut self, actor: ActorRef) -> Option<EntityId> {
        let entity = self.player_entity(actor)?;
        self.despawn(entity).then_some(entity)
    }

    pub fn player_entity(&self, actor: ActorRef) -> Option<EntityId> {
        self.players_by_actor.get(&actor).copied()
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.find_entity(id).and_then(|entity| entity.player.as_ref())
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.entities
            .iter_mut()
            .find(|entity| entity.id == id)
            .and_then(|entity| entity.player.as_mut())
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn player_count(&self) -> usize {
        self.players_by_actor.len()
    }
}
