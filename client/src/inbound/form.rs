//! Result of submitting a form.

use crate::domain::{ErrorPresentation, FieldError, OperationError};
use crate::domain::ports::{Notice, Notifier};

/// What the form should show after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    /// The call succeeded.
    Accepted(T),
    /// Messages to attach to individual inputs.
    FieldErrors(Vec<FieldError>),
    /// The failure was shown as a notice; the form stays as it is.
    Notified,
}

impl<T> FormOutcome<T> {
    /// Route `error` to the form or to `notifier`.
    pub(crate) fn from_error<N: Notifier + ?Sized>(error: &OperationError, notifier: &N) -> Self {
        match error.presentation() {
            ErrorPresentation::Fields(fields) => Self::FieldErrors(fields),
            ErrorPresentation::Notice(message) => {
                notifier.notify(Notice::error(message));
                Self::Notified
            }
        }
    }

    /// Whether the submit succeeded.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}
