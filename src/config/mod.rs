mod server;

pub use server::{DB_FILE_NAME, DEFAULT_PORT, ServerConfig};
