//! Command-triggered page invocation for a multiplayer server.
//!
//! A player issues a command, the handler resolves the player entity behind
//! the issuer's [`ActorRef`] and, when it is live, opens a freshly built
//! [`Page`] in that player's single active-page slot. When it is not, the
//! issuer gets one diagnostic message instead.

mod actor;
mod command;
mod invocation;
mod messages;
mod page;
mod registry;
mod store;

pub use actor::{ActorHandle, ActorRef, ActorResolver, PlayerResolver};
pub use command::{ActorUnresolved, Command, CommandSpec, InvocationOutcome, OpenPageCommand};
pub use invocation::{InvocationContext, ResponseSink};
pub use messages::{ConfigError, MessageCatalog, DEFAULT_ACTOR_UNRESOLVED_MESSAGE};
pub use page::{CloseReason, Page, PageGateway, PageManager, PlayerPageGateway};
pub use registry::{
    tokenize_line, CommandDispatcher, CommandRegistry, CommandSender, DispatchError,
    RegistryError,
};
pub use store::{Entity, EntityId, EntityIdAllocator, EntityStore, Player, StoreError};
