use rand::Rng;

const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const SLUG_LEN: usize = 8;

/// Random public identifier for a job post, `[a-z0-9]{8}`.
pub fn generate_slug() -> String {
    let mut rng = rand::thread_rng();
    (0..SLUG_LEN)
        .map(|_| SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

pub fn public_path(slug: &str) -> String {
    format!("/postuler/{slug}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_shape() {
        for _ in 0..200 {
            let slug = generate_slug();
            assert_eq!(slug.len(), SLUG_LEN);
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_slugs_vary() {
        assert_ne!(generate_slug(), generate_slug());
    }

    #[test]
    fn test_public_path() {
        assert_eq!(public_path("ab12cd34"), "/postuler/ab12cd34");
    }
}
