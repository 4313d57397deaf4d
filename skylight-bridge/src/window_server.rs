use crate::ConnectionId;
use crate::LibraryError;
use crate::SpaceId;
use crate::desktop_image::DesktopImage;
use crate::desktop_image::DesktopImageOptions;
use crate::error::SkyLightError;
use crate::skylight::CGSCopyManagedDisplaySpaces;
use crate::skylight::CGSMainConnectionID;
use crate::skylight::CGSSetDesktopImageURL;
use crate::space::DisplaySpaces;
use crate::space::SpaceSelector;
use objc2_core_foundation::CFRetained;
use std::ptr::NonNull;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WindowServer {
    pub connection: ConnectionId,
}

impl WindowServer {
    /// The main connection of this process, established lazily by the window server
    pub fn main() -> Self {
        Self {
            connection: unsafe { CGSMainConnectionID() },
        }
    }

    #[tracing::instrument]
    pub fn managed_display_spaces(&self) -> Result<DisplaySpaces, LibraryError> {
        let array = NonNull::new(unsafe { CGSCopyManagedDisplaySpaces(self.connection) })
            .ok_or(LibraryError::NoDisplaySpaces(self.connection))?;

        // Copy rule: we own the +1 reference and release it when this drops
        let array = unsafe { CFRetained::from_raw(array) };
        let spaces = DisplaySpaces::try_from(array.as_ref())?;

        tracing::debug!(
            "window server reported {} displays with {} spaces",
            spaces.displays().len(),
            spaces.spaces().count()
        );

        Ok(spaces)
    }

    #[tracing::instrument(skip(self, image), fields(image = %image.path().display()))]
    pub fn set_desktop_image(
        &self,
        space_id: SpaceId,
        image: &DesktopImage,
        options: &DesktopImageOptions,
    ) -> Result<(), LibraryError> {
        let url = image.url()?;
        let dictionary = options.to_dictionary();

        SkyLightError::check(unsafe {
            CGSSetDesktopImageURL(self.connection, space_id, &url, &dictionary)
        })?;

        tracing::info!("set desktop image for space {space_id}");

        Ok(())
    }

    /// Resolves the selector against a fresh snapshot and returns the space id that was changed
    pub fn set_desktop_image_for(
        &self,
        selector: &SpaceSelector,
        image: &DesktopImage,
        options: &DesktopImageOptions,
    ) -> Result<SpaceId, LibraryError> {
        let spaces = self.managed_display_spaces()?;
        let (display, space) = spaces
            .find(selector)
            .ok_or_else(|| LibraryError::SpaceNotFound(selector.to_string()))?;

        tracing::debug!(
            "resolved space selector '{selector}' to space {} on display {}",
            space.id,
            display.identifier
        );

        self.set_desktop_image(space.id, image, options)?;

        Ok(space.id)
    }

    /// Applies the image to every regular desktop, stopping at the first failure
    pub fn set_desktop_image_for_desktops(
        &self,
        image: &DesktopImage,
        options: &DesktopImageOptions,
    ) -> Result<Vec<SpaceId>, LibraryError> {
        let spaces = self.managed_display_spaces()?;
        let mut updated = vec![];

        for (_, space) in spaces.desktops() {
            self.set_desktop_image(space.id, image, options)?;
            updated.push(space.id);
        }

        Ok(updated)
    }
}
