use chrono::NaiveDate;
use thiserror::Error;
use super::rut::{self, RutError};

pub const MIN_AGE_YEARS: u32 = 18;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("{0}")]
    Rut(#[from] RutError),
    #[error("You must be at least {} years old to register", MIN_AGE_YEARS)]
    Underage,
    #[error("Email address is invalid")]
    InvalidEmail,
    #[error("Password must have at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("Display name is required")]
    MissingName,
}

pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(birth_date).unwrap_or(0)
}

pub struct RegistrationInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub display_name: &'a str,
    pub rut: &'a str,
    pub birth_date: NaiveDate,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidRegistration {
    pub email: String,
    pub display_name: String,
    pub rut: String,
}

pub fn validate(input: &RegistrationInput<'_>, today: NaiveDate) -> Result<ValidRegistration, RegistrationError> {
    let email = input.email.trim().to_lowercase();
    let valid_email = email.split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid_email {
        return Err(RegistrationError::InvalidEmail);
    }

    let display_name = input.display_name.trim();
    if display_name.is_empty() {
        return Err(RegistrationError::MissingName);
    }

    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::WeakPassword);
    }

    let rut = rut::normalize(input.rut)?;

    if input.birth_date > today || age_on(input.birth_date, today) < MIN_AGE_YEARS {
        return Err(RegistrationError::Underage);
    }

    Ok(ValidRegistration {
        email,
        display_name: display_name.to_string(),
        rut,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(birth_date: NaiveDate) -> RegistrationInput<'static> {
        RegistrationInput {
            email: " Ana@Example.cl ",
            password: "correct horse",
            display_name: "Ana",
            rut: "12.345.678-5",
            birth_date,
        }
    }

    #[test]
    fn accepts_adult_with_valid_rut() {
        let ok = validate(&input(date(1990, 5, 1)), date(2024, 6, 1)).unwrap();
        assert_eq!(ok.email, "ana@example.cl");
        assert_eq!(ok.rut, "12345678-5");
    }

    #[test]
    fn eighteenth_birthday_is_the_cutoff() {
        let today = date(2024, 6, 1);
        assert!(validate(&input(date(2006, 6, 1)), today).is_ok());
        assert_eq!(validate(&input(date(2006, 6, 2)), today), Err(RegistrationError::Underage));
    }

    #[test]
    fn malformed_rut_is_a_validation_error() {
        let mut bad = input(date(1990, 1, 1));
        bad.rut = "12.345.678-0";
        assert_eq!(validate(&bad, date(2024, 6, 1)), Err(RegistrationError::Rut(RutError::CheckDigit)));
    }

    #[test]
    fn rejects_bad_email_and_short_password() {
        let mut bad = input(date(1990, 1, 1));
        bad.email = "not-an-email";
        assert_eq!(validate(&bad, date(2024, 6, 1)), Err(RegistrationError::InvalidEmail));

        let mut short = input(date(1990, 1, 1));
        short.password = "1234";
        assert_eq!(validate(&short, date(2024, 6, 1)), Err(RegistrationError::WeakPassword));
    }
}
