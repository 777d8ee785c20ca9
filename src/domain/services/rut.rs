use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    #[error("RUT is malformed")]
    Malformed,
    #[error("RUT check digit does not match")]
    CheckDigit,
}

pub fn check_digit(body: u32) -> char {
    let mut sum = 0u32;
    let mut weight = 2;
    let mut rest = body;
    while rest > 0 {
        sum += (rest % 10) * weight;
        rest /= 10;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

pub fn normalize(input: &str) -> Result<String, RutError> {
    let cleaned: String = input.trim()
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect::<String>()
        .to_uppercase();

    // Six to eight body digits plus the check digit.
    if cleaned.len() < 7 || cleaned.len() > 9 {
        return Err(RutError::Malformed);
    }

    let (body, dv) = cleaned.split_at(cleaned.len() - 1);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(RutError::Malformed);
    }
    let body_num: u32 = body.parse().map_err(|_| RutError::Malformed)?;
    let dv = dv.chars().next().ok_or(RutError::Malformed)?;

    if check_digit(body_num) != dv {
        return Err(RutError::CheckDigit);
    }
    Ok(format!("{}-{}", body_num, dv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_known_check_digits() {
        assert_eq!(check_digit(12_345_678), '5');
        assert_eq!(check_digit(11_111_111), '1');
        assert_eq!(check_digit(10_000_013), 'K');
        assert_eq!(check_digit(10_000_004), '0');
    }

    #[test]
    fn normalizes_common_spellings() {
        assert_eq!(normalize("12.345.678-5").unwrap(), "12345678-5");
        assert_eq!(normalize(" 123456785 ").unwrap(), "12345678-5");
        assert_eq!(normalize("10.000.013-k").unwrap(), "10000013-K");
        assert_eq!(normalize("7.654.321-6").unwrap(), "7654321-6");
    }

    #[test]
    fn accepts_six_digit_bodies() {
        assert_eq!(normalize("999.999-k").unwrap(), "999999-K");
        assert_eq!(normalize("123.456-0").unwrap(), "123456-0");
        assert_eq!(normalize("12.345-5"), Err(RutError::Malformed));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(normalize("12.345.678-9"), Err(RutError::CheckDigit));
        assert_eq!(normalize("12.3A5.678-5"), Err(RutError::Malformed));
        assert_eq!(normalize("1-9"), Err(RutError::Malformed));
        assert_eq!(normalize(""), Err(RutError::Malformed));
    }
}
