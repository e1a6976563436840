use std::fmt;

use tracing::{debug, info};

use crate::actor::{ActorHandle, ActorRef};
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Another page was opened into the same slot.
    Replaced,
    Dismissed,
    Disconnected,
}

/// A server-defined interactive page bound to one actor.
///
/// Layout and rendering belong to the UI toolkit; this layer only needs the
/// page's identity and its lifecycle hooks.
pub trait Page: fmt::Debug + Send {
    fn page_id(&self) -> &str;
    fn owner(&self) -> ActorRef;
    fn on_open(&mut self) {}
    fn on_close(&mut self, _reason: CloseReason) {}
}

/// Single active-page slot of one player.
#[derive(Debug, Default)]
pub struct PageManager {
    active: Option<Box<dyn Page>>,
    opened_total: u64,
}

impl PageManager {
    /// Close-then-set. Returns true when a previous page was replaced.
    pub fn open(&mut self, mut page: Box<dyn Page>) -> bool {
        let replaced = self.close(CloseReason::Replaced);
        page.on_open();
        info!(
            page = page.page_id(),
            owner = %page.owner(),
            replaced,
            "page_opened"
        );
        self.active = Some(page);
        self.opened_total = self.opened_total.saturating_add(1);
        replaced
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        let Some(mut page) = self.active.take() else {
            return false;
        };
        page.on_close(reason);
        info!(
            page = page.page_id(),
            owner = %page.owner(),
            reason = ?reason,
            "page_closed"
        );
        true
    }

    pub fn active(&self) -> Option<&dyn Page> {
        self.active.as_deref()
    }

    pub fn opened_total(&self) -> u64 {
        self.opened_total
    }
}

/// Hands a constructed page to the page-management subsystem of an actor.
pub trait PageGateway: Send + Sync {
    fn open_page(&self, actor: ActorHandle, store: &mut EntityStore, page: Box<dyn Page>);
}

/// Opens pages into the [`PageManager`] of the resolved player entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerPageGateway;

impl PageGateway for PlayerPageGateway {
    fn open_page(&self, actor: ActorHandle, store: &mut EntityStore, page: Box<dyn Page>) {
        match store.player_mut(actor.entity()) {
            Some(player) if player.actor() == actor.actor() => {
                player.pages_mut().open(page);
            }
            _ => {
                debug!(
                    actor = %actor.actor(),
                    entity = actor.entity().0,
                    page = page.page_id(),
                    "page_open_stale_handle"
                );
            }
        }
    }
}
