//! Merging of global and step-level value maps.
//!
//! # Merge Rules
//!
//! - Keys present only in the base are kept
//! - Keys present in the overlay replace the base value wholesale
//! - Neither input is modified; a new map is returned

use crate::config::schema::ValueMap;

/// Merge two value maps, overlay wins on key collision.
///
/// # Arguments
///
/// * `base` - The global map
/// * `overlay` - The step-level map (takes precedence)
pub fn merge_maps(base: &ValueMap, overlay: &ValueMap) -> ValueMap {
    let mut result = base.clone();
    for (key, value) in overlay {
        result.insert(key.clone(), value.clone());
    }
    result
}

/// Merge a global map with an optional step-level map.
pub fn merge_step_map(global: &ValueMap, step: Option<&ValueMap>) -> ValueMap {
    match step {
        Some(step) => merge_maps(global, step),
        None => global.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn map(yaml: &str) -> ValueMap {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn overlay_wins_on_collision() {
        let base = map("owner: ops\nregion: us-east-1");
        let overlay = map("owner: platform");

        let result = merge_maps(&base, &overlay);

        assert_eq!(result["owner"], "platform");
        assert_eq!(result["region"], "us-east-1");
    }

    #[test]
    fn nested_maps_are_replaced_not_merged() {
        let base = map("tags:\n  a: 1\n  b: 2");
        let overlay = map("tags:\n  c: 3");

        let result = merge_maps(&base, &overlay);
        let tags = result["tags"].as_mapping().unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get(Value::from("c")), Some(&Value::from(3)));
    }

    #[test]
    fn inputs_are_untouched() {
        let base = map("k: base");
        let overlay = map("k: overlay\nextra: 1");

        let _ = merge_maps(&base, &overlay);

        assert_eq!(base.len(), 1);
        assert_eq!(base["k"], "base");
        assert_eq!(overlay.len(), 2);
    }

    #[test]
    fn missing_step_map_yields_global() {
        let global = map("k: v");
        assert_eq!(merge_step_map(&global, None), global);
    }

    #[test]
    fn step_map_merged_over_global() {
        let global = map("k: v\nother: 1");
        let step = map("k: step");
        let merged = merge_step_map(&global, Some(&step));
        assert_eq!(merged["k"], "step");
        assert_eq!(merged["other"], 1);
    }
}
