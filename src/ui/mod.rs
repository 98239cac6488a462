pub mod cards;
pub mod format;
pub mod header;
pub mod list_widget;
pub mod modal;
pub mod toast;
