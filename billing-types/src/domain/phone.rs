//! Phone number acceptance rules.

use crate::ports::PhoneNumberValidator;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// E.164 phone number check with an optional country allow-list.
///
/// A number is valid when it is `+` followed by 8 to 15 digits and, if any
/// prefixes are configured, starts with one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumberRules {
    allowed_prefixes: Vec<String>,
}

impl PhoneNumberRules {
    /// Accepts any well-formed international number.
    pub fn any_country() -> Self {
        Self {
            allowed_prefixes: Vec::new(),
        }
    }

    /// Accepts well-formed numbers starting with one of `prefixes` (e.g. `+44`).
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty())
                .collect(),
        }
    }

    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    fn is_well_formed(phone: &str) -> bool {
        let Some(digits) = phone.strip_prefix('+') else {
            return false;
        };
        (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

impl Default for PhoneNumberRules {
    fn default() -> Self {
        Self::with_prefixes(["+44"])
    }
}

impl PhoneNumberValidator for PhoneNumberRules {
    fn is_valid(&self, phone_number: &str) -> bool {
        if !Self::is_well_formed(phone_number) {
            return false;
        }
        self.allowed_prefixes.is_empty()
            || self
                .allowed_prefixes
                .iter()
                .any(|p| phone_number.starts_with(p.as_str()))
    }
}
