//! Accessors generated from `model/` by the build script, compiled against
//! the in-memory [`greycat`] runtime.

pub mod greycat;

include!(concat!(env!("OUT_DIR"), "/nodegen.rs"));

#[cfg(test)]
mod test;
