pub(crate) mod fixtures;

pub(crate) mod logging;

pub(crate) mod mem_certs;
