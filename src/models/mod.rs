pub mod clock;
pub mod draft;
pub mod form;
pub mod lifecycle;
pub mod submission;
