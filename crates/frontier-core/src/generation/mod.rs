//! Generation - procedural creation of star systems and their contents

mod names;
mod system;

pub use names::*;
pub use system::*;
