mod confluence_client;

pub use confluence_client::ConfluenceClient;
