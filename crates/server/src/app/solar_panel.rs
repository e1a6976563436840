use command_ui::{ActorRef, CloseReason, MessageCatalog, OpenPageCommand, Page};
use tracing::debug;

pub(crate) const SOLAR_PANEL_COMMAND: &str = "solarPanel";
pub(crate) const SOLAR_PANEL_DESCRIPTION: &str = "Open Solar Panel UI";
pub(crate) const SOLAR_PANEL_PAGE_ID: &str = "solar_panel";

#[derive(Debug)]
pub(crate) struct SolarPanelPage {
    owner: ActorRef,
}

impl SolarPanelPage {
    pub(crate) fn new(owner: ActorRef) -> Self {
        Self { owner }
    }
}

impl Page for SolarPanelPage {
    fn page_id(&self) -> &str {
        SOLAR_PANEL_PAGE_ID
    }

    fn owner(&self) -> ActorRef {
        self.owner
    }

    fn on_close(&mut self, reason: CloseReason) {
        debug!(owner = %self.owner, reason = ?reason, "solar_panel_closed");
    }
}

pub(crate) fn solar_panel_command(messages: &MessageCatalog) -> OpenPageCommand {
    OpenPageCommand::new(
        SOLAR_PANEL_COMMAND,
        SOLAR_PANEL_DESCRIPTION,
        false,
        |actor| Box::new(SolarPanelPage::new(actor)),
    )
    .with_messages(messages)
}
