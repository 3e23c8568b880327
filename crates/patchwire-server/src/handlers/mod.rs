//! Built-in message handlers.

pub mod patch_doc;
pub mod server_info;

pub use patch_doc::PatchDocHandler;
pub use server_info::ServerInfoHandler;
