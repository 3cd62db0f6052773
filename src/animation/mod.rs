pub(crate) mod delegated;
pub(crate) mod direct;
pub(crate) mod driver;
pub(crate) mod scheduler;
pub(crate) mod timing;
pub(crate) mod worker;
