//! Input validation helpers for StockLedger
//!
//! Services validate requests before touching the database so that invalid
//! input never reaches a constraint violation.

use rust_decimal::Decimal;

/// Validate a display name (product, warehouse, category, expense)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 100 {
        return Err("Name cannot exceed 100 characters");
    }
    Ok(())
}

/// Validate a monetary amount that must be strictly positive
pub fn validate_positive_money(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate a stock quantity that must be strictly positive
pub fn validate_positive_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a login: 3-100 chars, ASCII alphanumeric plus `._-`
pub fn validate_login(login: &str) -> Result<(), &'static str> {
    if login.len() < 3 || login.len() > 100 {
        return Err("Login must be 3-100 characters");
    }
    if !login
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Login may only contain letters, digits, '.', '_' and '-'");
    }
    Ok(())
}

/// Validate a password before hashing
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Validate a rate parameter stored as a fraction (VAT, gross margin)
pub fn validate_fraction(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err("Rate must be a fraction in [0, 1)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("Ballpoint pen").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn logins() {
        assert!(validate_login("admin").is_ok());
        assert!(validate_login("user-1.a_b").is_ok());
        assert!(validate_login("ab").is_err());
        assert!(validate_login("has space").is_err());
    }

    #[test]
    fn fractions() {
        assert!(validate_fraction(Decimal::new(2, 1)).is_ok()); // 0.2
        assert!(validate_fraction(Decimal::ONE).is_err());
        assert!(validate_fraction(Decimal::new(-1, 1)).is_err());
    }
}
