//! Member modifier flags.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Modifier bits attached to a registered field or method.
    ///
    /// Filters match these by bit intersection (`require_modifier`), so a
    /// mask of `PUBLIC | STATIC` accepts any member carrying either bit.
    ///
    /// # Examples
    ///
    /// ```
    /// use specula_core::Modifiers;
    ///
    /// let m = Modifiers::PUBLIC | Modifiers::FINAL;
    /// assert!(m.intersects(Modifiers::FINAL));
    /// assert!(!m.intersects(Modifiers::STATIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC    = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE   = 1 << 2;
        const STATIC    = 1 << 3;
        /// Marks a member as immutable in its declaring type. Note that
        /// `FieldAccessor::set` deliberately writes through this flag; only a
        /// missing setter makes a field unwritable.
        const FINAL     = 1 << 4;
        const ABSTRACT  = 1 << 5;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}
