//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod mailer;
pub mod query;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TwilioAdapter};
pub use mailer::MailGateway;
pub use query::{join_all, StoreQuery};
pub use store::PgStore;
pub use traits::{BaseMailer, BaseStore, BaseTwilioService};
