pub mod animation;
pub mod app;
pub mod buttons;
pub mod dialogs;
