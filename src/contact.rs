// Contact form intake: validation rules for storefront enquiries.
//
// Validation runs server-side on the trimmed values. Every failing field
// reports its first error so the form can highlight all problems at once.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern for email validation")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+\d\s\-().]+$").expect("Invalid regex pattern for phone validation")
});

/// Field name → first validation error, keyed by the JSON field name.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// A contact-form submission as posted by the storefront.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Check every field. Returns all field errors when any rule fails.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.first_name.trim().is_empty() {
            errors.insert("firstName", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert("lastName", "Last name is required");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Email is required");
        } else if !EMAIL_RE.is_match(email) {
            errors.insert("email", "Enter a valid email");
        }

        let phone = self.phone.trim();
        if phone.chars().count() < 7 {
            errors.insert("phone", "Phone number is too short");
        } else if !PHONE_RE.is_match(phone) {
            errors.insert("phone", "Enter a valid phone number");
        }

        if self.subject.trim().chars().count() < 3 {
            errors.insert("subject", "Subject must be at least 3 characters");
        }
        if self.message.trim().chars().count() < 10 {
            errors.insert("message", "Message must be at least 10 characters");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
