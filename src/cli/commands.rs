pub mod import_seed;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use import_seed::import_seed;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
