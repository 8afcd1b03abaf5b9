//! Remote plugin metadata.

use crate::Result;
use crate::metadata::PluginMetadata;

/// A catalog of plugin metadata documents.
///
/// Implementations must report a missing plugin as
/// [`Error::NotFoundRemote`](crate::Error::NotFoundRemote) so callers can tell
/// it apart from transport failures.
pub trait MetadataSource: Send + Sync {
    /// Human readable location, used in log and error messages.
    fn location(&self) -> String;

    /// Names of all plugins in the catalog.
    fn list_plugins(&self) -> Result<Vec<String>>;

    /// Metadata for the plugin called `name`.
    fn fetch_metadata(&self, name: &str) -> Result<PluginMetadata>;
}
