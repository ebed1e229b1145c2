pub mod charts;
pub mod format;
pub mod panels;
pub mod tabs;
