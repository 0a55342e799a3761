pub mod model;

pub use model::{NewProject, NewTimeEntry, Project, TimeEntry, User};
