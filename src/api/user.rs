//! Signed-in user profile returned by `GET /user`.

// crates.io
use serde::de::{Deserializer, Error as DeError, Visitor};
// self
use crate::_prelude::*;

/// Profile of the signed-in Twitch user.
///
/// Decoding is permissive: unknown fields are ignored, and missing or `null` fields fall back to
/// empty strings. Kraken has shipped `_id` both as a string and as a number, so numbers are
/// accepted too.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizedUser {
	/// Twitch user identifier.
	#[serde(rename = "_id", deserialize_with = "lenient_string")]
	pub id: String,
	/// Avatar URL.
	#[serde(deserialize_with = "lenient_string")]
	pub logo: String,
	/// Display name (case and characters as chosen by the user).
	#[serde(deserialize_with = "lenient_string")]
	pub display_name: String,
	/// Login handle.
	#[serde(deserialize_with = "lenient_string")]
	pub name: String,
	/// Profile bio.
	#[serde(deserialize_with = "lenient_string")]
	pub bio: String,
	/// Email address (present only when the token carries the matching scope).
	#[serde(deserialize_with = "lenient_string")]
	pub email: String,
}
impl AuthorizedUser {
	/// Returns `true` for the placeholder record held before any successful sign-in.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	struct LenientString;
	impl<'de> Visitor<'de> for LenientString {
		type Value = String;

		fn expecting(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("a string, an integer, or null")
		}

		fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(v.to_owned())
		}

		fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(v)
		}

		fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(v.to_string())
		}

		fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(v.to_string())
		}

		fn visit_unit<E>(self) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(String::new())
		}

		fn visit_none<E>(self) -> Result<Self::Value, E>
		where
			E: DeError,
		{
			Ok(String::new())
		}

		fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
		where
			D: Deserializer<'de>,
		{
			deserializer.deserialize_any(self)
		}
	}

	deserializer.deserialize_any(LenientString)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kraken_profile_decodes() {
		let body = r#"{
			"_id": "44322889",
			"bio": "Just a gamer playing games and chatting. :)",
			"created_at": "2013-06-03T19:12:02.580593Z",
			"display_name": "dallas",
			"email": "email-address@provider.com",
			"email_verified": true,
			"logo": "https://static-cdn.jtvnw.net/jtv_user_pictures/dallas-profile_image.png",
			"name": "dallas",
			"partnered": false,
			"type": "staff"
		}"#;
		let user: AuthorizedUser = serde_json::from_str(body).expect("Profile should decode.");

		assert_eq!(user.id, "44322889");
		assert_eq!(user.display_name, "dallas");
		assert_eq!(user.email, "email-address@provider.com");
		assert!(user.logo.ends_with("dallas-profile_image.png"));
	}

	#[test]
	fn null_and_numeric_fields_are_tolerated() {
		let user: AuthorizedUser =
			serde_json::from_str(r#"{"_id":12345,"logo":null,"bio":null,"name":"foo"}"#)
				.expect("Nullable profile fields should decode.");

		assert_eq!(user.id, "12345");
		assert_eq!(user.logo, "");
		assert_eq!(user.bio, "");
		assert_eq!(user.name, "foo");
	}

	#[test]
	fn default_record_is_empty() {
		assert!(AuthorizedUser::default().is_empty());
		assert!(!AuthorizedUser { name: "foo".into(), ..Default::default() }.is_empty());
	}
}
