use std::sync::LazyLock;

use regex::Regex;

// Tried in order; each is more specific than the ones after it.
static FABRIC_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:fabric|quilt)(?:-loader)?-(\d+(?:\.\d+)+)-\d[\w.\-]*$")
        .expect("fabric pattern is valid")
});
static FORGE_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:loader-)?(?:neo)?forge-(\S+)$").expect("forge pattern is valid")
});
static MC_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+(?:\.\d+)*-(?:neoforge|forge|fabric|quilt)-(\S+)$")
        .expect("minecraft prefixed pattern is valid")
});
static VERSION_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)+-\d+(?:\.\d+)+").expect("pair pattern is valid"));

/// Extracts the bare loader version from a loader build name.
///
/// Build names embed the loader and Minecraft version in a handful of
/// layouts, e.g. `fabric-0.18.4-1.21.10`, `forge-47.2.0`,
/// `1.20.1-forge-47.2.0` or `47.2.0-1.20.1`. Anything unrecognised is
/// returned unchanged.
pub fn extract_loader_version(raw: &str) -> String {
    let raw = raw.trim();

    for pattern in [&FABRIC_STYLE, &FORGE_STYLE, &MC_PREFIXED] {
        if let Some(version) = pattern.captures(raw).and_then(|caps| caps.get(1)) {
            return version.as_str().to_string();
        }
    }

    if VERSION_PAIR.is_match(raw)
        && let Some((version, _)) = raw.split_once('-')
    {
        return version.to_string();
    }

    raw.to_string()
}

/// Compares two loader build names after stripping loader and Minecraft
/// decorations.
pub fn loader_versions_match(a: &str, b: &str) -> bool {
    extract_loader_version(a) == extract_loader_version(b)
}
