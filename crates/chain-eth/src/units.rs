use crate::error::EthError;

/// Decimal places of one ether in wei.
pub const ETHER_DECIMALS: usize = 18;

/// One ether in wei.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Parses a decimal ether amount (`"1"`, `"0.25"`, `".5"`) into wei.
///
/// The conversion is exact: more than 18 fractional digits, a sign, an empty
/// string, or a value that does not fit in `u128` wei is rejected.
pub fn parse_ether(amount: &str) -> Result<u128, EthError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(EthError::InsufficientFields("amount is empty".into()));
    }
    if amount.starts_with('-') {
        return Err(EthError::InsufficientFields(format!(
            "amount must not be negative: {amount}"
        )));
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(EthError::InsufficientFields("amount has no digits".into()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(EthError::InsufficientFields(format!(
            "amount is not a decimal number: {amount}"
        )));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(EthError::InsufficientFields(format!(
            "amount has more than {ETHER_DECIMALS} decimal places: {amount}"
        )));
    }

    let overflow = || EthError::InsufficientFields(format!("amount too large: {amount}"));

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(WEI_PER_ETHER)
            .ok_or_else(overflow)?
    };

    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = ETHER_DECIMALS);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    whole_wei.checked_add(fraction_wei).ok_or_else(overflow)
}

/// Formats a wei amount as a decimal ether string without trailing zeros.
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{fraction:0>width$}", width = ETHER_DECIMALS);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
