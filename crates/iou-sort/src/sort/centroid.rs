use nalgebra::Vector2;

use super::filter::ValidSet;
use super::types::Candidates;

/// Mean of the valid candidates (summed in slot order), or `None` when none are valid.
pub fn centroid(c: &Candidates<'_>, valid: &ValidSet) -> Option<Vector2<f64>> {
    if valid.is_empty() {
        return None;
    }
    let sum = valid
        .as_slice()
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, &k| acc + c.point(k));
    Some(sum / valid.len() as f64)
}
