//! Input checks for the auth forms.

/// Allowed password length, inclusive.
pub const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=32;

/// Email must be present and look like `local@domain.tld`.
pub fn check_email(email: &str) -> Result<(), String> {
	let email = email.trim();
	if email.is_empty() {
		return Err("Email is required".into());
	}
	let Some((local, domain)) = email.split_once('@') else {
		return Err("Email is not a valid email".into());
	};
	let domain_ok = !domain.contains('@')
		&& domain.contains('.')
		&& domain.split('.').all(|part| !part.is_empty());
	if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
		return Err("Email is not a valid email".into());
	}
	Ok(())
}

/// Password must be 8 to 32 characters.
pub fn check_password(password: &str) -> Result<(), String> {
	if password.is_empty() {
		return Err("Password is required".into());
	}
	if !PASSWORD_LEN.contains(&password.chars().count()) {
		return Err(format!(
			"Password must be between {} and {} characters",
			PASSWORD_LEN.start(),
			PASSWORD_LEN.end()
		));
	}
	Ok(())
}

/// Both login fields, email first.
pub fn check_credentials(email: &str, password: &str) -> Result<(), String> {
	check_email(email)?;
	check_password(password)
}

/// Sign-up asks for the password twice.
pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
	if password != confirmation {
		return Err("Passwords do not match".into());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn emails() {
		assert!(check_email("ada@example.com").is_ok());
		assert!(check_email("  ada@example.com ").is_ok());
		assert!(check_email("").is_err());
		assert!(check_email("ada").is_err());
		assert!(check_email("@example.com").is_err());
		assert!(check_email("ada@localhost").is_err());
		assert!(check_email("ada@example..com").is_err());
		assert!(check_email("a da@example.com").is_err());
	}

	#[test]
	fn passwords() {
		assert!(check_password("12345678").is_ok());
		assert!(check_password(&"x".repeat(32)).is_ok());
		assert!(check_password("1234567").is_err());
		assert!(check_password(&"x".repeat(33)).is_err());
		assert_eq!(check_password(""), Err("Password is required".into()));
	}

	#[test]
	fn confirmation_must_match() {
		assert!(check_confirmation("password123", "password123").is_ok());
		assert!(check_confirmation("password123", "password124").is_err());
	}
}
