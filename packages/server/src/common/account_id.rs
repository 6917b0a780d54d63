use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Derive the stable account id for a contact (phone number or email).
///
/// The id is a deterministic, injective function of the contact string, so a
/// user who first signs in by email and later by phone maps to the same
/// account only when the contact is the same. Records created through either
/// channel key on this value.
///
/// The encoding happens to be reversible; callers must not rely on that.
pub fn account_id(contact: &str) -> String {
    STANDARD.encode(contact.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_deterministic() {
        let id1 = account_id("user@example.com");
        let id2 = account_id("user@example.com");
        assert_eq!(id1, id2, "Same contact should produce same id");
    }

    #[test]
    fn test_account_id_unique_per_contact() {
        let id1 = account_id("user@example.com");
        let id2 = account_id("other@example.com");
        assert_ne!(id1, id2, "Different contacts should have different ids");

        let id3 = account_id("9970378011");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_account_id_same_across_channel_shapes() {
        // Phone-shaped and email-shaped contacts each get exactly one id
        assert_eq!(account_id("9970378011"), account_id("9970378011"));
    }

    #[test]
    fn test_account_id_empty_contact() {
        // Degenerate input: empty contact yields the empty id
        assert_eq!(account_id(""), "");
    }
}
