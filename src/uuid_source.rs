use uuid::Uuid;

/// A source of fresh, random disk identifiers.
///
/// The VHD spec only requires 16 random bytes; any generator satisfies the
/// contract. [`RandomIdSource`] delegates to `uuid`'s v4 generator. Tests
/// can substitute a [`FixedIdSource`] to get deterministic footers.
pub trait VhdIdSource {
    fn generate(&self) -> Uuid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdSource;

impl VhdIdSource for RandomIdSource {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedIdSource(pub Uuid);

impl VhdIdSource for FixedIdSource {
    fn generate(&self) -> Uuid {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_source_produces_distinct_ids() {
        let source = RandomIdSource;
        assert_ne!(source.generate(), source.generate());
    }

    #[test]
    fn fixed_source_is_deterministic() {
        let id = Uuid::from_bytes([0x0F; 16]);
        let source = FixedIdSource(id);
        assert_eq!(source.generate(), id);
        assert_eq!(source.generate(), id);
    }
}
