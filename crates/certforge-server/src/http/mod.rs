pub(crate) mod handlers;
pub(crate) mod norms;
pub(crate) mod validations;
