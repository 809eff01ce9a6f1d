//! Domain-separation tags for transcript absorbs, per spec.md §4.5: distinct single-byte
//! constants so that an input absorbed under one domain can never collide with bytes absorbed
//! under another, even if the raw bytes happen to coincide.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Input = 0,
    Polynomial = 1,
    LayerBegin = 2,
    Round = 3,
    Commitment = 4,
    ColumnOpen = 5,
}

impl Tag {
    pub const fn byte(self) -> u8 {
        self as u8
    }
}
