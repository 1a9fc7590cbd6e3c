//! Inbound adapters translating presentation events into core calls.
//!
//! Each screen controller owns no state beyond its collaborators: it calls a
//! service façade or the catalog feed and routes the outcome to a
//! [`Notifier`], a [`Navigator`] or back to the form as [`FormOutcome`].
//!
//! [`Notifier`]: crate::domain::ports::Notifier
//! [`Navigator`]: crate::domain::ports::Navigator

mod catalog_screen;
mod form;
mod order_form;
mod session_guard;
mod sign_in_form;

pub use catalog_screen::CatalogScreen;
pub use form::FormOutcome;
pub use order_form::OrderFormScreen;
pub use session_guard::spawn_session_guard;
pub use sign_in_form::SignInForm;
