//! Local state of the contact form.
//!
//! `FormState` is owned by a single mounted form view. It is not shared
//! and does not survive the view being unmounted.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    mem::take,
    str::FromStr,
};

use {
    serde::{Deserialize, Serialize},
    tracing::info,
};

use crate::{error::domain::FormError, state::notice_timer::NoticeTimer};

/// Input fields of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Sender name.
    Name,
    /// Sender email address.
    Email,
    /// Free-form message body.
    Message,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    /// Stable key used for widget names and parsing.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Имя:",
            FormField::Email => "Email:",
            FormField::Message => "Сообщение:",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))
    }
}

/// Current values of the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    /// Sender name.
    pub name: String,
    /// Sender email address.
    pub email: String,
    /// Message body.
    pub message: String,
}

impl FormFields {
    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    /// Replaces the value of exactly one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Required fields that are still empty.
    ///
    /// Only an empty value is missing; whitespace counts as filled in.
    #[must_use]
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Whether all required fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

/// Form inputs plus the transient "submitted" notice flag.
#[derive(Debug)]
pub struct FormState {
    /// Current input values.
    fields: FormFields,
    /// Whether the success notice is showing.
    submitted: bool,
    /// Timer that hides the notice again.
    notice_timer: NoticeTimer,
}

impl FormState {
    /// Creates an empty form state.
    ///
    /// # Arguments
    ///
    /// * `notice_timer` - Timer used to hide the success notice
    ///
    /// # Returns
    ///
    /// A new `FormState` instance.
    pub fn new(notice_timer: NoticeTimer) -> Self {
        Self {
            fields: FormFields::default(),
            submitted: false,
            notice_timer,
        }
    }

    /// Current input values.
    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Whether the success notice is showing.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Updates a single field, leaving the others untouched.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    /// Submits the form.
    ///
    /// Logs the current values, shows the notice, arms the notice timer and
    /// clears the inputs.
    ///
    /// # Returns
    ///
    /// The submitted values.
    pub fn submit(&mut self) -> FormFields {
        let snapshot = take(&mut self.fields);
        info!(
            name = %snapshot.name,
            email = %snapshot.email,
            message = %snapshot.message,
            "Form submitted"
        );

        self.submitted = true;
        self.notice_timer.arm();
        snapshot
    }

    /// Handles an expired notice timer.
    ///
    /// # Arguments
    ///
    /// * `generation` - Generation reported by the timer
    ///
    /// # Returns
    ///
    /// `true` if the notice was hidden, `false` for a stale expiry.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.notice_timer.generation() || !self.submitted {
            return false;
        }
        self.submitted = false;
        true
    }

    /// Hides the notice immediately and cancels the pending timer.
    pub fn dismiss_notice(&mut self) {
        self.notice_timer.cancel();
        self.submitted = false;
    }

    /// Whether a notice expiry is outstanding.
    #[must_use]
    pub fn has_pending_notice(&self) -> bool {
        self.notice_timer.is_pending()
    }
}
