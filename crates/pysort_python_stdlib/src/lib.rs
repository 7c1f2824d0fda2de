//! Static tables describing the Python standard library, used to seed the
//! default module-placement configuration.

pub mod sys;
