//! Chrome-DevTools-Protocol implementation of the engine's session trait.

mod profile;
mod session;

pub use profile::DeviceProfile;
pub use session::{BrowserCard, BrowserSession, LaunchOptions};
