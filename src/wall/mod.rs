pub(crate) mod manager;
pub(crate) mod media;
