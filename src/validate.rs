//! Input rules shared by the login, signup, profile and post forms.
//!
//! Every rule is a pure function returning a [`Validation`]; forms decide
//! where the reason is shown and keep their submit control disabled until
//! all relevant rules pass.

use once_cell::sync::Lazy;
use regex::Regex;

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 20;
pub const NICKNAME_MAX: usize = 10;
pub const TITLE_MAX: usize = 26;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub ok: bool,
    pub reason: String,
}

impl Validation {
    pub fn pass() -> Self {
        Self { ok: true, reason: String::new() }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self { ok: false, reason: reason.into() }
    }
}

fn len(s: &str) -> usize {
    s.chars().count()
}

pub fn email(value: &str) -> Validation {
    let value = value.trim();
    if value.is_empty() {
        return Validation::fail("Email is required.");
    }
    if len(value) < 5 {
        return Validation::fail("Email is too short.");
    }
    if !EMAIL_RE.is_match(value) {
        return Validation::fail("Enter a valid email address (e.g. example@example.com).");
    }
    Validation::pass()
}

pub fn password(value: &str) -> Validation {
    if value.trim().is_empty() {
        return Validation::fail("Password is required.");
    }
    let n = len(value);
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&n) {
        return Validation::fail("Password must be 8 to 20 characters.");
    }
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let special = value.chars().any(|c| !c.is_ascii_alphanumeric());
    if !(upper && lower && digit && special) {
        return Validation::fail(
            "Password needs at least one uppercase letter, lowercase letter, digit and special character.",
        );
    }
    Validation::pass()
}

pub fn password_confirm(password: &str, confirm: &str) -> Validation {
    if confirm.is_empty() {
        return Validation::fail("Please enter the password once more.");
    }
    if password != confirm {
        return Validation::fail("Passwords do not match.");
    }
    Validation::pass()
}

/// Signup rule: no whitespace anywhere.
pub fn signup_nickname(value: &str) -> Validation {
    let value = value.trim();
    if value.is_empty() {
        return Validation::fail("Nickname is required.");
    }
    if value.chars().any(char::is_whitespace) {
        return Validation::fail("Remove the spaces from your nickname.");
    }
    if len(value) > NICKNAME_MAX {
        return Validation::fail("Nickname can be at most 10 characters.");
    }
    Validation::pass()
}

/// Profile-edit rule: length only. Intentionally laxer than [`signup_nickname`].
pub fn profile_nickname(value: &str) -> Validation {
    let value = value.trim();
    if value.is_empty() {
        return Validation::fail("Nickname is required.");
    }
    if len(value) > NICKNAME_MAX {
        return Validation::fail("Nickname can be at most 10 characters.");
    }
    Validation::pass()
}

pub fn post_title(value: &str) -> Validation {
    let value = value.trim();
    if value.is_empty() {
        return Validation::fail("Please enter a title.");
    }
    if len(value) > TITLE_MAX {
        return Validation::fail("Title can be at most 26 characters.");
    }
    Validation::pass()
}

pub fn post_content(value: &str) -> Validation {
    if value.trim().is_empty() {
        return Validation::fail("Please enter the content.");
    }
    Validation::pass()
}

pub fn comment(value: &str) -> Validation {
    if value.trim().is_empty() {
        return Validation::fail("Please enter a comment.");
    }
    Validation::pass()
}
