pub mod briefing;
pub mod check;
pub mod daemon;
