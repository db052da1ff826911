use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Length of the ids the store assigns to rooms and players
const DOCUMENT_ID_LENGTH: usize = 20;

pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    std::iter::repeat(())
        .map(|_| rng.sample(Alphanumeric) as char)
        .take(length)
        .collect()
}

/// Generates a new id for a stored room or player
pub fn document_id() -> String {
    random_string(DOCUMENT_ID_LENGTH)
}

#[cfg(test)]
mod test {
    use super::document_id;

    #[test]
    fn document_ids_are_alphanumeric() {
        let id = document_id();

        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, document_id());
    }
}
