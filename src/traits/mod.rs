mod driver;

pub use driver::{Connector, DatabaseDriver};
