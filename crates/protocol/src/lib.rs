pub mod color;
pub mod config;
pub mod source;

pub use color::{HexColor, HexColorError};
pub use config::{DarkMode, ThemeConfig, ThemeExtend};
pub use source::{
    ColorDecl, ContentDecl, DarkModeDecl, ExtendSection, FontStackDecl, ThemeSection, ThemeSource,
};
