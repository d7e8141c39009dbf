//! Site configuration of a snapshot.
//!
//! The effective configuration is three layers merged by priority:
//! engine defaults (0), the repository's `config.yaml` (10) and, in
//! interactive mode, authoring overrides (100).

use tracing::debug;
use vellum_core::content::ContentOptions;
use vellum_core::template::CONFIG_FILE;
use vellum_core::{ChangeCtx, ConfigLayer, ConfigLayerList, ConfigMap, Result, VellumError};

/// Keys owned by the engine; a repository cannot set them.
pub const RESERVED_KEYS: &[&str] = &["REVISION", "CHANGECTX"];

/// Keys removed in interactive mode.
pub const INTERACTIVE_REMOVED: &[&str] = &["GOOGLE_ANALYTICS"];

pub const DEFAULTS_PRIORITY: i32 = 0;
pub const REPOSITORY_PRIORITY: i32 = 10;
pub const INTERACTIVE_PRIORITY: i32 = 100;

/// Engine defaults.
pub fn defaults() -> ConfigMap {
    let mut map = ConfigMap::new();
    map.insert("TITLE", "Vellum");
    map.insert("TAGLINE", "");
    map.insert("CONTENT_DIR", "content");
    map.insert("POST_EXT", ".rst");
    map.insert("RST_HEADER_LEVEL", 3i64);
    map.insert("TEMPLATES_DIR", "templates");
    map.insert("STATIC_DIR", "static");
    map.insert("ATTACHMENT_DIR", "content/attachments");
    map.insert("POSTS_PER_PAGE", 10i64);
    map
}

/// Reads `config.yaml` from `ctx` and merges it over the defaults.
///
/// # Errors
///
/// `ConfigMissing` when the snapshot has no `config.yaml`, or a parse error
/// when it is not valid YAML.
pub fn load(ctx: &dyn ChangeCtx, interactive: bool) -> Result<ConfigMap> {
    if !ctx.contains(CONFIG_FILE) {
        return Err(VellumError::config_missing(CONFIG_FILE, ctx.revision_id().as_str()));
    }
    let file = ctx.filectx(CONFIG_FILE)?;
    let repository = ConfigMap::from_yaml(file.content()?)?;
    Ok(layer(repository, interactive))
}

/// Merges a repository configuration over the defaults.
pub fn layer(repository: ConfigMap, interactive: bool) -> ConfigMap {
    let mut layers = ConfigLayerList::new()
        .with(ConfigLayer::new("defaults", defaults()).with_priority(DEFAULTS_PRIORITY))
        .with(
            ConfigLayer::new(CONFIG_FILE, repository)
                .with_priority(REPOSITORY_PRIORITY)
                .without_keys(RESERVED_KEYS),
        );

    if interactive {
        let mut overrides = ConfigMap::new();
        overrides.insert("DISQUS_DEVELOPER", true);
        layers.add(
            ConfigLayer::new("interactive", overrides)
                .with_priority(INTERACTIVE_PRIORITY)
                .with_origin("engine"),
        );
    }

    let mut merged = layers.merge();
    if interactive {
        for key in INTERACTIVE_REMOVED {
            merged.remove(key);
        }
    }

    debug!("Merged site configuration with {} keys", merged.len());
    merged
}

/// Content layout described by a merged configuration.
pub fn content_options(config: &ConfigMap, debug: bool) -> ContentOptions {
    let header_level = config
        .get_i64("RST_HEADER_LEVEL")
        .and_then(|level| u32::try_from(level).ok())
        .unwrap_or(3);

    ContentOptions::new(
        config.get_str_or("CONTENT_DIR", "content"),
        config.get_str_or("POST_EXT", ".rst"),
    )
    .with_header_level(header_level)
    .with_debug(debug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> ConfigMap {
        ConfigMap::from_yaml(text).unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = layer(yaml("TITLE: Mine\n"), false);

        assert_eq!(config.get_str("TITLE"), Some("Mine"));
        assert_eq!(config.get_str("CONTENT_DIR"), Some("content"));
        assert_eq!(config.get_i64("POSTS_PER_PAGE"), Some(10));
    }

    #[test]
    fn test_reserved_keys_stripped() {
        let config = layer(yaml("REVISION: working_dir\nCHANGECTX: x\n"), false);

        assert!(!config.contains_key("REVISION"));
        assert!(!config.contains_key("CHANGECTX"));
    }

    #[test]
    fn test_interactive_overrides() {
        let repository = yaml("GOOGLE_ANALYTICS: UA-1\nDISQUS_DEVELOPER: false\n");

        let public = layer(repository.clone(), false);
        assert_eq!(public.get_str("GOOGLE_ANALYTICS"), Some("UA-1"));

        let authoring = layer(repository, true);
        assert!(!authoring.contains_key("GOOGLE_ANALYTICS"));
        assert_eq!(authoring.get_bool("DISQUS_DEVELOPER"), Some(true));
    }

    #[test]
    fn test_content_options() {
        let config = layer(yaml("CONTENT_DIR: pages\nPOST_EXT: .txt\nRST_HEADER_LEVEL: 2\n"), false);
        let options = content_options(&config, true);

        assert_eq!(options.content_dir, "pages");
        assert_eq!(options.post_ext, ".txt");
        assert_eq!(options.header_level, 2);
        assert!(options.debug);
    }
}
