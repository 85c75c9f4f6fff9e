pub mod briefing;
pub mod composite;
pub mod terminal;
pub mod webhook;

pub use composite::CompositeNotifier;
pub use terminal::TerminalNotifier;
pub use webhook::WebhookNotifier;
