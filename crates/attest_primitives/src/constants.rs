#![forbid(unsafe_code)]

pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

// Object identifiers, dotted form.
pub const OID_ECDSA_WITH_RECOMMENDED: &str = "1.2.840.10045.4.2";
pub const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
pub const OID_PRIME_FIELD: &str = "1.2.840.10045.1.1";
pub const OID_SECP256K1: &str = "1.3.132.0.10";
pub const OID_COMMON_NAME: &str = "2.5.4.3";
pub const OID_ORGANIZATION: &str = "2.5.4.10";
pub const OID_ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
pub const OID_COUNTRY: &str = "2.5.4.6";
pub const OID_LABELED_URI: &str = "1.3.6.1.4.1.250.1.57";
pub const OID_OCTET_STRING_SYNTAX: &str = "1.3.6.1.4.1.1466.115.121.1.40";

// Universal tags.
pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_UTF8_STRING: u8 = 0x0c;
pub const TAG_PRINTABLE_STRING: u8 = 0x13;
pub const TAG_IA5_STRING: u8 = 0x16;
pub const TAG_UTC_TIME: u8 = 0x17;
pub const TAG_GENERALIZED_TIME: u8 = 0x18;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_SET: u8 = 0x31;

/// Constructed context-specific tag `[n]`, as used for EXPLICIT tagging.
#[must_use]
pub const fn tag_explicit(n: u8) -> u8 {
    0xa0 | (n & 0x1f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tags() {
        assert_eq!(tag_explicit(0), 0xa0);
        assert_eq!(tag_explicit(3), 0xa3);
        assert_eq!(tag_explicit(4), 0xa4);
    }

    #[test]
    fn oids_are_dotted_decimal() {
        for oid in [
            OID_ECDSA_WITH_RECOMMENDED,
            OID_EC_PUBLIC_KEY,
            OID_PRIME_FIELD,
            OID_SECP256K1,
            OID_COMMON_NAME,
            OID_LABELED_URI,
            OID_OCTET_STRING_SYNTAX,
        ] {
            assert!(oid.split('.').all(|arc| arc.parse::<u64>().is_ok()), "bad oid {oid}");
        }
    }
}
