mod indicatif;
mod null;
mod stderr;

pub use self::indicatif::*;
pub use self::null::*;
pub use self::stderr::*;
