pub(crate) mod anim;
pub(crate) mod scheduler;
