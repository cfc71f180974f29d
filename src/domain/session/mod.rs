//! Session domain module.
//!
//! Contains the Session aggregate and the authenticated app views.

mod aggregate;
mod view;

pub use aggregate::Session;
pub use view::AppView;
