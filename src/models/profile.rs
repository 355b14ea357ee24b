//! User profile data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The signed-in user's details.
///
/// A zero `hourly_rate` means no rate is configured; earnings then report zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier.
    pub id: String,
    /// Full display name.
    pub name: String,
    /// Up to two uppercase letters derived from the name.
    #[serde(default)]
    pub initials: String,
    /// Contact email.
    pub email: String,
    /// Employer.
    #[serde(default)]
    pub company: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Postal address or city.
    #[serde(default)]
    pub address: String,
    /// Pay per hour, used for projected earnings.
    #[serde(default)]
    pub hourly_rate: Decimal,
}

impl UserProfile {
    /// Recomputes [`UserProfile::initials`] from the name.
    pub fn refresh_initials(&mut self) {
        self.initials = initials_of(&self.name);
    }

    /// Returns true when an hourly rate has been set.
    pub fn has_rate(&self) -> bool {
        self.hourly_rate > Decimal::ZERO
    }
}

/// First letter of each of the first two words, uppercased.
///
/// ```
/// use shift_calendar::models::initials_of;
///
/// assert_eq!(initials_of("ada lovelace byron"), "AL");
/// assert_eq!(initials_of("Cher"), "C");
/// ```
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
