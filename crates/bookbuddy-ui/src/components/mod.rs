pub mod confirm;
pub mod google;
pub mod guard;
pub mod layout;
pub mod toast;
