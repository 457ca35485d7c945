//! How a stored region is drawn by the host

use bitflags::bitflags;

bitflags! {
    /// Drawing flags for stored regions.
    ///
    /// The crate itself never interprets these; they are passed through to the
    /// host alongside the region's scope and icon.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct RegionFlags: u32 {
        const DRAW_EMPTY              = 0x001;
        const HIDE_ON_MINIMAP         = 0x002;
        const DRAW_EMPTY_AS_OVERWRITE = 0x004;
        const DRAW_NO_FILL            = 0x020;
        const DRAW_NO_OUTLINE         = 0x100;
        const DRAW_SOLID_UNDERLINE    = 0x200;
        const DRAW_STIPPLED_UNDERLINE = 0x400;
        const DRAW_SQUIGGLY_UNDERLINE = 0x800;
        const PERSISTENT              = 0x010;
        const HIDDEN                  = 0x080;
    }
}

bitflags! {
    /// Flags for opening a new view in the host window
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct NewFileFlags: u32 {
        /// Preview tab, replaced by the next transient view
        const TRANSIENT = 0x04;
        /// Open without taking focus
        const SEMI_TRANSIENT = 0x08;
    }
}

/// Scope, gutter icon and flags used when storing regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionStyle {
    /// Scope name used to color the regions (e.g. "comment", "markup.underline.link")
    pub scope: String,
    /// Gutter icon name, empty for none
    pub icon: String,
    pub flags: RegionFlags,
}

impl RegionStyle {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_flags(mut self, flags: RegionFlags) -> Self {
        self.flags = flags;
        self
    }
}
