use thiserror::Error;
use tracing::debug;

use crate::actor::{ActorHandle, ActorRef, ActorResolver, PlayerResolver};
use crate::invocation::InvocationContext;
use crate::messages::MessageCatalog;
use crate::page::{Page, PageGateway, PlayerPageGateway};

/// Name, description and permission tier of a command. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    name: String,
    description: String,
    requires_privilege: bool,
}

impl CommandSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        requires_privilege: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            requires_privilege,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requires_privilege(&self) -> bool {
        self.requires_privilege
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    PageOpened,
    ActorUnresolved,
}

pub trait Command: Send + Sync {
    fn spec(&self) -> &CommandSpec;
    fn execute(&self, ctx: &mut InvocationContext<'_>) -> InvocationOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{actor} does not resolve to a live player")]
pub struct ActorUnresolved {
    pub actor: ActorRef,
}

type PageFactory = dyn Fn(ActorRef) -> Box<dyn Page> + Send + Sync;

/// Resolves the issuing player and opens a freshly built page for them.
///
/// Exactly one of two things happens per call: the page is handed to the
/// gateway, or the unresolved-actor message is sent. Nothing is cached
/// between calls and repeated opens are left to the gateway.
pub struct OpenPageCommand {
    spec: CommandSpec,
    page_factory: Box<PageFactory>,
    resolver: Box<dyn ActorResolver>,
    gateway: Box<dyn PageGateway>,
    unresolved_message: String,
}

impl OpenPageCommand {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        requires_privilege: bool,
        page_factory: F,
    ) -> Self
    where
        F: Fn(ActorRef) -> Box<dyn Page> + Send + Sync + 'static,
    {
        Self {
            spec: CommandSpec::new(name, description, requires_privilege),
            page_factory: Box::new(page_factory),
            resolver: Box::new(PlayerResolver),
            gateway: Box::new(PlayerPageGateway),
            unresolved_message: MessageCatalog::default().actor_unresolved,
        }
    }

    pub fn with_resolver(mut self, resolver: impl ActorResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_gateway(mut self, gateway: impl PageGateway + 'static) -> Self {
        self.gateway = Box::new(gateway);
        self
    }

    pub fn with_messages(mut self, messages: &MessageCatalog) -> Self {
        self.unresolved_message = messages.actor_unresolved.clone();
        self
    }

    fn resolve_issuer(&self, ctx: &InvocationContext<'_>) -> Result<ActorHandle, ActorUnresolved> {
        let actor = ctx.actor();
        self.resolver
            .resolve(ctx.store(), actor)
            .ok_or(ActorUnresolved { actor })
    }
}

impl Command for OpenPageCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(&self, ctx: &mut InvocationContext<'_>) -> InvocationOutcome {
        let handle = match self.resolve_issuer(ctx) {
            Ok(handle) => handle,
            Err(unresolved) => {
                debug!(command = self.spec.name(), reason = %unresolved, "actor_unresolved");
                ctx.send_message(&self.unresolved_message);
                return InvocationOutcome::ActorUnresolved;
            }
        };

        let page = (self.page_factory)(ctx.actor());
        self.gateway.open_page(handle, ctx.store_mut(), page);
        InvocationOutcome::PageOpened
    }
}
