pub mod checks;
pub mod notifications;
