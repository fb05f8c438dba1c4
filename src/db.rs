pub mod store;
pub mod pg_store;
pub use pg_store::PgEntityStore;
pub mod memory_store;
pub use memory_store::{MemoryAccountStore, MemoryEntityStore};
pub mod account_repo;
pub use account_repo::{AccountStore, PgAccountRepository};
