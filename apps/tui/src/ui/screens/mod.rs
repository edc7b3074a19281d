pub mod editor;
pub mod events;
pub mod form;
pub mod forms;
pub mod help;
pub mod home;
pub mod registrations;
pub mod schemas;
pub mod submission_detail;
pub mod submissions;
