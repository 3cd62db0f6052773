pub(crate) mod position;
pub(crate) mod velocity;
