// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Maximum accepted length for free-text reasons.
const MAX_REASON_LENGTH: usize = 500;

/// Validates the free-text reason supplied with a request.
///
/// This function is pure, deterministic, and has no side effects.
///
/// # Arguments
///
/// * `reason` - The reason text to validate
///
/// # Returns
///
/// * `Ok(())` if the reason is acceptable
/// * `Err(DomainError::InvalidReason)` otherwise
///
/// # Errors
///
/// Returns an error if the reason is empty, whitespace-only, or longer
/// than 500 characters.
pub fn validate_reason(reason: &str) -> Result<(), DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidReason(String::from(
            "Reason cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_REASON_LENGTH {
        return Err(DomainError::InvalidReason(format!(
            "Reason cannot exceed {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates the mandatory reason attached to a rejection.
///
/// # Arguments
///
/// * `reason` - The rejection reason to validate
///
/// # Returns
///
/// * `Ok(())` if the reason is acceptable
/// * `Err(DomainError::InvalidRejectionReason)` otherwise
///
/// # Errors
///
/// Returns an error if the reason is empty or whitespace-only. Every
/// rejection must carry a reason.
pub fn validate_rejection_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::InvalidRejectionReason(String::from(
            "A rejection must include a reason",
        )));
    }
    Ok(())
}

/// Validates the shape of a one-time code.
///
/// # Arguments
///
/// * `code` - The code to validate
///
/// # Returns
///
/// * `Ok(())` if the code is exactly four ASCII digits
/// * `Err(DomainError::InvalidOtpFormat)` otherwise
///
/// # Errors
///
/// Returns an error if the code is not exactly four ASCII digits.
pub fn validate_otp_format(code: &str) -> Result<(), DomainError> {
    if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidOtpFormat(String::from(
            "Code must be exactly four digits",
        )));
    }
    Ok(())
}

/// Validates the scanner identity recorded with a gate event.
///
/// # Errors
///
/// Returns `DomainError::InvalidScanner` if the identity is empty or
/// whitespace-only.
pub fn validate_scanner(scanner: &str) -> Result<(), DomainError> {
    if scanner.trim().is_empty() {
        return Err(DomainError::InvalidScanner(String::from(
            "Scanner identity cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the gate location recorded with a gate event.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocation` if the location is empty or
/// whitespace-only.
pub fn validate_location(location: &str) -> Result<(), DomainError> {
    if location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Gate location cannot be empty",
        )));
    }
    Ok(())
}
