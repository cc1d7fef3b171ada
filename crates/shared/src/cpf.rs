//! CPF (Cadastro de Pessoas Fisicas) helpers.
//!
//! CPFs are compared after stripping every non-digit character, so
//! `123.456.789-00` and `12345678900` refer to the same person.

/// Number of digits in a complete CPF.
pub const CPF_DIGITS: usize = 11;

/// Strips all formatting from a CPF, keeping only ASCII digits.
pub fn normalize_cpf(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns true when the value contains exactly eleven digits once formatting is removed.
pub fn has_valid_length(value: &str) -> bool {
    normalize_cpf(value).len() == CPF_DIGITS
}

/// Formats a (possibly partial) CPF as `000.000.000-00`.
///
/// Digits beyond the eleventh are dropped. Partial input is formatted as far
/// as it goes, so `1234` becomes `123.4`.
pub fn format_cpf(value: &str) -> String {
    let digits: Vec<char> = normalize_cpf(value).chars().take(CPF_DIGITS).collect();
    let mut formatted = String::with_capacity(14);

    for (i, digit) in digits.iter().enumerate() {
        match i {
            3 | 6 => formatted.push('.'),
            9 => formatted.push('-'),
            _ => {}
        }
        formatted.push(*digit);
    }

    formatted
}

/// Returns true when both values denote the same CPF.
pub fn same_cpf(a: &str, b: &str) -> bool {
    normalize_cpf(a) == normalize_cpf(b)
}

/// Masks a CPF for log output, keeping only the middle six digits.
pub fn mask_cpf(value: &str) -> String {
    let digits = normalize_cpf(value);
    if digits.len() != CPF_DIGITS {
        return "***".to_string();
    }
    format!("***.{}.{}-**", &digits[3..6], &digits[6..9])
}
