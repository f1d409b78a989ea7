pub(crate) mod frame_loop;
pub(crate) mod opts;
pub(crate) mod timer;
