use rand::Rng;

/// Number of digits in a pin code
pub const PINCODE_LENGTH: usize = 6;

const PINCODE_RANGE: u32 = 1_000_000;

/// Generates a random, zero padded six digit pin code
pub fn generate_pincode<R: Rng>(rng: &mut R) -> String {
    format_pincode(rng.gen_range(0..PINCODE_RANGE))
}

fn format_pincode(value: u32) -> String {
    format!("{:0width$}", value, width = PINCODE_LENGTH)
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{format_pincode, generate_pincode};

    #[test]
    fn pincodes_keep_leading_zeros() {
        assert_eq!(format_pincode(0), "000000");
        assert_eq!(format_pincode(7), "000007");
        assert_eq!(format_pincode(42137), "042137");
        assert_eq!(format_pincode(999_999), "999999");
    }

    #[test]
    fn generated_pincodes_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let pincode = generate_pincode(&mut rng);

            assert_eq!(pincode.len(), 6);
            assert!(pincode.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
