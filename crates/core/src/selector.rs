//! Version and platform selection.

use crate::metadata::{MatchLabels, PlatformArtifact, PluginMetadata, PluginVersion};
use crate::platform::Platform;
use crate::{Error, Result};

impl MatchLabels {
    /// Whether these labels accept `platform`. Empty labels are wildcards.
    #[must_use]
    pub fn matches(&self, platform: &Platform) -> bool {
        (self.os.is_empty() || self.os == platform.os)
            && (self.arch.is_empty() || self.arch == platform.arch)
    }
}

/// Pick the first version, in declared order, that has a build for `platform`.
///
/// Within that version the first matching build wins. Versions are never
/// ranked or compared.
pub fn select<'a>(
    metadata: &'a PluginMetadata,
    platform: &Platform,
) -> Result<(&'a PluginVersion, &'a PlatformArtifact)> {
    let name = metadata.name();
    let versions = &metadata.spec.versions;
    if versions.is_empty() {
        return Err(Error::NoVersions {
            name: name.to_string(),
        });
    }

    for version in versions {
        if let Some(artifact) = version
            .platforms
            .iter()
            .find(|a| a.selector.match_labels.matches(platform))
        {
            tracing::debug!(
                plugin = name,
                version = %version.version,
                uri = %artifact.uri,
                "selected plugin build"
            );
            return Ok((version, artifact));
        }
        tracing::warn!(
            plugin = name,
            version = %version.version,
            platform = %platform,
            "no build of this version supports the current platform"
        );
    }

    Err(Error::NoSupportedPlatform {
        name: name.to_string(),
        platform: platform.to_string(),
    })
}
