pub(crate) mod health;
pub(crate) mod history;
pub(crate) mod root;
