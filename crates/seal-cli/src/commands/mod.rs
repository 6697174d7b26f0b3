//! Command handlers, one module per subcommand.

pub mod cat;
pub mod edit;
pub mod encrypt;
pub mod keygen;
pub mod misc;
pub mod pw;
