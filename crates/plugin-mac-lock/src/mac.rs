//! Hardware address helpers.

/// The all-zero hardware address some clients report when they cannot read a NIC.
pub const ZERO_HW_ADDR: &str = "00:00:00:00:00:00";

/// Flags a pair of hardware addresses that must not be treated as a known device.
///
/// Returns `true` when either address is blank or is the all-zero sentinel,
/// and `false` otherwise, including when the two addresses differ. The name
/// reads as a membership test but the result only screens out unusable
/// input; whether the pair actually matches is decided by the policy
/// evaluator's exact comparison.
pub fn mac_not_in_db(address_a: &str, address_b: &str) -> bool {
    let a = address_a.trim();
    let b = address_b.trim();

    if a.is_empty() || b.is_empty() {
        return true;
    }

    a == ZERO_HW_ADDR || b == ZERO_HW_ADDR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_addresses_not_flagged() {
        assert!(!mac_not_in_db("c8:cb:b8:0d:28:33", "c8:cb:b8:0d:28:34"));
    }

    #[test]
    fn test_same_address_not_flagged() {
        assert!(!mac_not_in_db("c8:cb:b8:0d:28:33", "c8:cb:b8:0d:28:33"));
    }

    #[test]
    fn test_zero_addresses_flagged() {
        assert!(mac_not_in_db(ZERO_HW_ADDR, ZERO_HW_ADDR));
    }

    #[test]
    fn test_blank_first_argument_flagged() {
        assert!(mac_not_in_db(" ", ZERO_HW_ADDR));
        assert!(mac_not_in_db("", "c8:cb:b8:0d:28:33"));
    }

    #[test]
    fn test_blank_second_argument_flagged() {
        assert!(mac_not_in_db(ZERO_HW_ADDR, " "));
        assert!(mac_not_in_db("c8:cb:b8:0d:28:33", "\t"));
    }
}
