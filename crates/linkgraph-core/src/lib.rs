#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod content_reader;
pub mod error;
pub mod frontmatter;
pub mod links;
pub mod similarity;
pub mod traits;
pub mod types;
