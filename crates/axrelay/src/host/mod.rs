/*!
Host platform abstraction.

The relay never talks to a concrete accessibility service. Host glue
implements these traits and forwards platform callbacks into [`crate::Relay`].
*/

mod traits;

pub use traits::{EnablementProbe, Host};
