pub mod project;
pub mod session;
pub mod time_entry;
