mod notifications;
mod schema;
mod seen;
mod store;

pub use store::Store;

#[cfg(test)]
pub(crate) use store::test_support;
