/// The variant on an operation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Variant {
    None = 0,
    IfExists = 1,
    Negated = 2,
    IfExistsNegated = 3,
}

impl Variant {
    #[inline]
    pub(super) fn as_usize(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn if_exists(self) -> bool {
        matches!(self, Self::IfExists | Self::IfExistsNegated)
    }

    #[inline]
    pub fn negated(self) -> bool {
        matches!(self, Self::Negated | Self::IfExistsNegated)
    }

    /// The same variant with the `IfExists` flag set.
    #[inline]
    pub fn with_if_exists(self) -> Self {
        match self {
            Self::None | Self::IfExists => Self::IfExists,
            Self::Negated | Self::IfExistsNegated => Self::IfExistsNegated,
        }
    }

    /// The same variant with the negation cleared.
    #[inline]
    pub fn without_negation(self) -> Self {
        match self {
            Self::None | Self::Negated => Self::None,
            Self::IfExists | Self::IfExistsNegated => Self::IfExists,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::Variant, pretty_assertions::assert_eq};

    #[test_log::test]
    fn test_variant_flags() {
        assert!(!Variant::None.if_exists());
        assert!(!Variant::None.negated());
        assert!(Variant::IfExists.if_exists());
        assert!(Variant::Negated.negated());
        assert!(Variant::IfExistsNegated.if_exists() && Variant::IfExistsNegated.negated());

        assert_eq!(Variant::None.with_if_exists(), Variant::IfExists);
        assert_eq!(Variant::Negated.with_if_exists(), Variant::IfExistsNegated);
        assert_eq!(Variant::IfExistsNegated.with_if_exists(), Variant::IfExistsNegated);

        assert_eq!(Variant::Negated.without_negation(), Variant::None);
        assert_eq!(Variant::IfExistsNegated.without_negation(), Variant::IfExists);
        assert_eq!(Variant::IfExists.without_negation(), Variant::IfExists);
    }
}
