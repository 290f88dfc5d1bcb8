mod transfer;

pub use transfer::{cmd_export, cmd_import};
