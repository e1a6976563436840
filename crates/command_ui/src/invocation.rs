use crate::actor::ActorRef;
use crate::store::EntityStore;

/// One-way channel back to whoever issued a command.
pub trait ResponseSink {
    fn send(&mut self, text: &str);
}

impl ResponseSink for Vec<String> {
    fn send(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Everything one command execution may touch. Lives for a single call.
pub struct InvocationContext<'a> {
    actor: ActorRef,
    store: &'a mut EntityStore,
    responses: &'a mut dyn ResponseSink,
}

impl<'a> InvocationContext<'a> {
    pub fn new(
        actor: ActorRef,
        store: &'a mut EntityStore,
        responses: &'a mut dyn ResponseSink,
    ) -> Self {
        Self {
            actor,
            store,
            responses,
        }
    }

    pub fn actor(&self) -> ActorRef {
        self.actor
    }

    pub fn store(&self) -> &EntityStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut *self.store
    }

    pub fn send_message(&mut self, text: &str) {
        self.responses.send(text);
    }
}
