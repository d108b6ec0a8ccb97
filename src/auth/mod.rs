pub mod cookie;
pub(crate) mod extractors;

pub use extractors::CurrentUser;
