//! Test factory for creating Serenity User objects.

use serenity::all::User;

/// Creates a test Serenity User with customizable fields.
///
/// The discriminator is sent the way Discord sends it: a zero-padded four digit
/// string, or `"0"` for users on the unique username system (pass `None`).
/// The user is flagged as a bot; all other fields are left unset.
///
/// # Arguments
/// - `user_id` - Discord user ID (snowflake)
/// - `name` - Username
/// - `discriminator` - Optional legacy discriminator
///
/// # Returns
/// - `User` - A valid Serenity User struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a User (indicates invalid test data)
pub fn create_test_user(user_id: u64, name: &str, discriminator: Option<u16>) -> User {
    let discriminator = match discriminator {
        Some(d) => format!("{:04}", d),
        None => "0".to_string(),
    };

    serde_json::from_value(serde_json::json!({
        "id": user_id.to_string(),
        "username": name,
        "discriminator": discriminator,
        "global_name": null,
        "avatar": null,
        "bot": true,
    }))
    .expect("Failed to create test user - invalid JSON structure")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_user_with_discriminator() {
        let user = create_test_user(123456789, "Foo", Some(1));

        assert_eq!(user.id.get(), 123456789);
        assert_eq!(user.name, "Foo");
        assert_eq!(user.discriminator.map(|d| d.get()), Some(1));
        assert!(user.bot);
    }

    #[test]
    fn creates_user_without_discriminator() {
        let user = create_test_user(987654321, "Bar", None);
        assert!(user.discriminator.is_none());
    }
}
