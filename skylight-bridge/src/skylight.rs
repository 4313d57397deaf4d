use crate::ConnectionId;
use crate::SpaceId;
use objc2_core_foundation::CFArray;
use objc2_core_foundation::CFDictionary;
use objc2_core_foundation::CFURL;
use objc2_core_graphics::CGError;

// Private SkyLight symbols, resolved against /System/Library/PrivateFrameworks/SkyLight.framework
unsafe extern "C" {
    /// Returns a +1 retained array of per-display space descriptors, or null
    pub fn CGSCopyManagedDisplaySpaces(cid: ConnectionId) -> *mut CFArray;
    pub fn CGSSetDesktopImageURL(
        cid: ConnectionId,
        space_id: SpaceId,
        url: &CFURL,
        options: &CFDictionary,
    ) -> CGError;
    pub fn CGSMainConnectionID() -> ConnectionId;
}
