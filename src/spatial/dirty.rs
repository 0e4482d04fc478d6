bitflags! {
    /// Records which aspects of a node's cached world transform are stale.
    ///
    /// Any rotation or scale change of an ancestor also moves the world position
    /// of its descendants, so propagation always escalates with `POSITION`.
    #[derive(Default)]
    pub struct DirtyFlags: u8 {
        const POSITION = 0b001;
        const ROTATION = 0b010;
        const SCALE = 0b100;

        const RS = Self::ROTATION.bits | Self::SCALE.bits;
        const TRS = Self::POSITION.bits | Self::ROTATION.bits | Self::SCALE.bits;
    }
}

impl DirtyFlags {
    /// The flags a child receives when its parent is invalidated with `self`.
    #[inline]
    pub fn escalate(self) -> Self {
        self | DirtyFlags::POSITION
    }
}
