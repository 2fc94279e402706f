/// Physical encoding of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    U8,
    U16,
    U32,
    U64,
    Bool,
    /// Fixed-length byte array.
    Bytes(usize),
    /// 32-byte account address.
    Pubkey,
    Option(&'static Layout),
    Vec(&'static Layout),
    /// Nested record encoded in place.
    Struct(&'static [Field]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub layout: Layout,
}

pub(crate) const PUBKEY_LEN: usize = 32;
pub(crate) const OPTION_FLAG_LEN: usize = 1;
pub(crate) const VEC_LENGTH_LEN: usize = 4;

impl Layout {
    /// Encoded size when it does not depend on the value. Options and vectors are fixable, so
    /// anything containing them has no fixed size.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::U8 | Self::Bool => Some(1),
            Self::U16 => Some(2),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::Bytes(len) => Some(*len),
            Self::Pubkey => Some(PUBKEY_LEN),
            Self::Option(_) | Self::Vec(_) => None,
            Self::Struct(fields) => fields_fixed_size(fields),
        }
    }

    /// Smallest possible encoding, with every option absent and every vector empty.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Option(_) => OPTION_FLAG_LEN,
            Self::Vec(_) => VEC_LENGTH_LEN,
            Self::Struct(fields) => fields_min_size(fields),
            fixed => fixed.fixed_size().unwrap_or_default(),
        }
    }
}

pub(crate) fn fields_fixed_size(fields: &[Field]) -> Option<usize> {
    fields.iter().try_fold(0usize, |acc, field| {
        field
            .layout
            .fixed_size()
            .and_then(|size| acc.checked_add(size))
    })
}

pub(crate) fn fields_min_size(fields: &[Field]) -> usize {
    fields
        .iter()
        .fold(0usize, |acc, field| acc.saturating_add(field.layout.min_size()))
}

#[cfg(test)]
mod test {
    use super::*;

    const INNER: &[Field] = &[
        Field {
            name: "key",
            layout: Layout::Pubkey,
        },
        Field {
            name: "amount",
            layout: Layout::U64,
        },
    ];

    const INNER_LAYOUT: Layout = Layout::Struct(INNER);

    #[test]
    fn primitive_sizes() {
        assert_eq!(Layout::U8.fixed_size(), Some(1));
        assert_eq!(Layout::Bool.fixed_size(), Some(1));
        assert_eq!(Layout::U16.fixed_size(), Some(2));
        assert_eq!(Layout::U32.fixed_size(), Some(4));
        assert_eq!(Layout::U64.fixed_size(), Some(8));
        assert_eq!(Layout::Bytes(21).fixed_size(), Some(21));
        assert_eq!(Layout::Pubkey.fixed_size(), Some(32));
    }

    #[test]
    fn nested_struct_is_fixed() {
        assert_eq!(INNER_LAYOUT.fixed_size(), Some(40));
        assert_eq!(INNER_LAYOUT.min_size(), 40);
    }

    #[test]
    fn fixable_layouts() {
        let option = Layout::Option(&Layout::U64);
        assert_eq!(option.fixed_size(), None);
        assert_eq!(option.min_size(), 1);

        let vec = Layout::Vec(&INNER_LAYOUT);
        assert_eq!(vec.fixed_size(), None);
        assert_eq!(vec.min_size(), 4);

        const MIXED: &[Field] = &[
            Field {
                name: "flag",
                layout: Layout::Bool,
            },
            Field {
                name: "maybe",
                layout: Layout::Option(&Layout::Pubkey),
            },
        ];
        let mixed = Layout::Struct(MIXED);
        assert_eq!(mixed.fixed_size(), None);
        assert_eq!(mixed.min_size(), 2);
    }
}
