/// Which link of its parent a node hangs from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// The node is its parent's left child (every item in it is smaller than the parent's).
    Left,
    /// The node is its parent's right child (every item in it is greater than or equal to the
    /// parent's).
    Right,
}

impl Side {
    /// The side a value belongs on relative to `pivot`. Equal values go right.
    pub(crate) fn of<T: Ord>(value: &T, pivot: &T) -> Self {
        if value < pivot {
            Self::Left
        } else {
            Self::Right
        }
    }
}
