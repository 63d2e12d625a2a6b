//! Random test inputs: phone numbers and registrable users.

use chrono::{Duration as DateDuration, Local, Months, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix of every generated phone number
pub const PHONE_PREFIX: &str = "987";

/// Youngest age of a generated user
pub const MIN_USER_AGE: u32 = 11;

/// Oldest age of a generated user
pub const MAX_USER_AGE: u32 = 20;

/// Date format used by the registration form
pub const DOB_FORMAT: &str = "%d/%m/%Y";

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Aditi", "Ananya", "Arjun", "Diya", "Ishaan", "Kabir", "Kavya", "Meera", "Nikhil",
    "Priya", "Rahul", "Riya", "Rohan", "Saanvi", "Sara", "Tanvi", "Vihaan", "Zara", "Aryan",
    "Emily", "James", "Olivia", "Liam", "Noah", "Emma", "Lucas", "Mia",
];

const LAST_NAMES: &[&str] = &[
    "Sharma", "Verma", "Iyer", "Reddy", "Nair", "Gupta", "Mehta", "Kapoor", "Joshi", "Patel",
    "Rao", "Singh", "Das", "Bose", "Menon", "Kulkarni", "Smith", "Johnson", "Brown", "Miller",
    "Wilson", "Taylor",
];

/// Registration form inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth formatted as `dd/mm/yyyy`
    pub dob: String,
}

/// Ten-digit phone number: `987` followed by a random number in
/// `1234567..=9999999`, so the suffix never starts with `0`.
#[must_use]
pub fn generate_random_phone_number() -> String {
    phone_number_from(&mut rand::thread_rng())
}

/// [`generate_random_phone_number`] with an explicit RNG
pub fn phone_number_from<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{PHONE_PREFIX}{}", rng.gen_range(1_234_567..=9_999_999_u32))
}

/// Random user aged between 11 and 20 today.
#[must_use]
pub fn get_valid_user() -> User {
    user_from(&mut rand::thread_rng(), Local::now().date_naive())
}

/// [`get_valid_user`] with an explicit RNG and reference date
pub fn user_from<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> User {
    let first_name = FIRST_NAMES.choose(rng).copied().unwrap_or("Aarav");
    let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("Sharma");
    User {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        dob: birth_date_from(rng, today).format(DOB_FORMAT).to_string(),
    }
}

/// Birth date of someone whose age on `today` is within
/// [`MIN_USER_AGE`, `MAX_USER_AGE`].
pub fn birth_date_from<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let latest = today
        .checked_sub_months(Months::new(12 * MIN_USER_AGE))
        .unwrap_or(today);
    let earliest = today
        .checked_sub_months(Months::new(12 * (MAX_USER_AGE + 1)))
        .map_or(latest, |d| d + DateDuration::days(1));
    let span = (latest - earliest).num_days().max(0);
    earliest + DateDuration::days(rng.gen_range(0..=span))
}

/// Age in whole years on `today` of someone born on `dob`
#[must_use]
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(dob).unwrap_or(0)
}
