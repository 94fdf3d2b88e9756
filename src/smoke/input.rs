use rand::Rng;

/// Chance, out of 126, of producing the empty string.
const EMPTY_WEIGHT: u32 = 32;

/// Values the page's memory editor must reject.
///
/// The editor wants a number of at least two characters, so this produces
/// either nothing or a single non-digit ASCII character from space to `}`.
pub fn generate_invalid_input<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.gen_range(0..126) < EMPTY_WEIGHT {
        return String::new();
    }
    loop {
        let ch = char::from(rng.gen_range(b' '..=b'}'));
        if !ch.is_ascii_digit() {
            return ch.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn never_numeric_or_long() {
        let mut rng = StdRng::seed_from_u64(86);
        let mut saw_empty = false;
        let mut saw_char = false;
        let mut saw_space = false;
        for _ in 0..2000 {
            let input = generate_invalid_input(&mut rng);
            assert!(input.len() <= 1, "{input:?}");
            if let Some(ch) = input.chars().next() {
                assert!((' '..='}').contains(&ch) && !ch.is_ascii_digit(), "{ch:?}");
                assert!(ch != '~');
                saw_char = true;
                saw_space |= ch == ' ';
            } else {
                saw_empty = true;
            }
        }
        assert!(saw_empty && saw_char && saw_space);
    }
}
