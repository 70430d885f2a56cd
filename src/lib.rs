pub mod canvas;
pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

pub use canvas::{Canvas, SvgCanvas};
pub use chart::{HostElement, TreeChart};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Options;
pub use error::{Error, Result};
pub use graph::Graph;
pub use ir::{Direction, TreeNode};
pub use parser::parse_tree;
