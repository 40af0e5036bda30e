//! Field validation rules shared by every input type.
//!
//! A [`Validator`] collects every failing field of one request so the caller
//! gets them all at once.

use core::str::FromStr;

use edudesk_core::{DomainError, DomainResult};

pub const NAME_MAX: usize = 100;
pub const CAPACITY_MAX: i64 = 10_000;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 4;
pub const PASSWORD_MAX: usize = 128;

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn present<'a>(&mut self, label: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.fail(format!("{label} is required"));
                None
            }
        }
    }

    /// Any non-blank string, trimmed.
    pub fn required(&mut self, label: &str, value: Option<&str>) -> Option<String> {
        self.present(label, value).map(str::to_string)
    }

    /// Display names: trimmed, 1 to 100 characters.
    pub fn name(&mut self, label: &str, value: Option<&str>) -> Option<String> {
        let v = self.present(label, value)?;
        if v.chars().count() > NAME_MAX {
            self.fail(format!("{label} must be at most {NAME_MAX} characters"));
            return None;
        }
        Some(v.to_string())
    }

    pub fn capacity(&mut self, label: &str, value: Option<i64>) -> Option<u32> {
        let Some(v) = value else {
            self.fail(format!("{label} is required"));
            return None;
        };
        if !(1..=CAPACITY_MAX).contains(&v) {
            self.fail(format!("{label} must be between 1 and {CAPACITY_MAX}"));
            return None;
        }
        u32::try_from(v).ok()
    }

    pub fn id<T: FromStr>(&mut self, label: &str, value: Option<&str>) -> Option<T> {
        let v = self.present(label, value)?;
        match v.parse::<T>() {
            Ok(id) => Some(id),
            Err(_) => {
                self.fail(format!("{label} must be a valid id"));
                None
            }
        }
    }

    /// Like [`Validator::id`], but absence is not an error.
    pub fn optional_id<T: FromStr>(&mut self, label: &str, value: Option<&str>) -> Option<T> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => self.id(label, Some(v)),
            _ => None,
        }
    }

    pub fn username(&mut self, label: &str, value: Option<&str>) -> Option<String> {
        let v = self.present(label, value)?;
        let len = v.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            self.fail(format!(
                "{label} must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
            ));
            return None;
        }
        if !v
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            self.fail(format!(
                "{label} may only contain letters, digits, '_', '.' and '-'"
            ));
            return None;
        }
        Some(v.to_string())
    }

    pub fn email(&mut self, label: &str, value: Option<&str>) -> Option<String> {
        let v = self.present(label, value)?;
        if !is_email(v) {
            self.fail(format!("{label} must be a valid email address"));
            return None;
        }
        Some(v.to_string())
    }

    /// Passwords are taken verbatim, never trimmed.
    pub fn password(&mut self, label: &str, value: Option<&str>) -> Option<String> {
        let Some(v) = value.filter(|v| !v.is_empty()) else {
            self.fail(format!("{label} is required"));
            return None;
        };
        let len = v.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
            self.fail(format!(
                "{label} must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
            ));
            return None;
        }
        Some(v.to_string())
    }

    /// Turn the collected failures into an error, or build the validated value.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> DomainResult<T> {
        if !self.errors.is_empty() {
            return Err(DomainError::Validation(self.errors));
        }
        build().ok_or_else(|| DomainError::validation("invalid input"))
    }
}

fn is_email(v: &str) -> bool {
    let mut parts = v.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !v.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Validate a single identifier field.
pub fn parse_id<T: FromStr>(label: &str, value: Option<&str>) -> DomainResult<T> {
    let mut v = Validator::new();
    let id = v.id(label, value);
    v.finish(|| id)
}
