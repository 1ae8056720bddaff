//! Emulated device description applied to every page.

use harvest_core::DEFAULT_USER_AGENT;

/// The device a page pretends to be: user agent plus device metrics.
///
/// The listing only serves its lazy-scroll card markup to mobile clients,
/// so the default is a small mobile profile.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    /// Label used in logs only.
    pub name: String,
    pub user_agent: String,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
    pub mobile: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            name: "iphone-se".to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            width: 360,
            height: 640,
            scale_factor: 2.0,
            mobile: true,
        }
    }
}
