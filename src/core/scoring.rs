// Comment scoring: importance weight × commonality weight.
//
// Labels outside high/medium/low (or 高/中/低) fall back to weight 1, the
// same as "low". Strict validation is available through `Level::from_str`.

use super::model::Level;

/// Weight for a label, defaulting unknown labels to 1.
pub fn label_weight(label: &str) -> u32 {
    match label.parse::<Level>() {
        Ok(level) => level.weight(),
        Err(err) => {
            log::warn!("{}; using weight 1", err);
            Level::Low.weight()
        }
    }
}

/// Score in [1, 9].
pub fn score(importance: &str, commonality: &str) -> u32 {
    label_weight(importance) * label_weight(commonality)
}
