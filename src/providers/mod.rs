pub mod http;
pub mod memory;

pub use http::HttpFinanceApi;
pub use memory::MemoryFinanceApi;
