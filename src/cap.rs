use crate::config::CapPolicy;
use crate::errors::SampleError;

/// Resolve the shared per-group row cap for one sampling pass.
///
/// An explicit cap is returned unchanged (zero is rejected rather than
/// silently emptying every group). A percentile cap is the given percentile
/// of the observed group-size distribution, truncated to an integer and
/// clamped to at least 1.
pub fn resolve_cap(group_sizes: &[usize], policy: CapPolicy) -> Result<usize, SampleError> {
    match policy {
        CapPolicy::Explicit(cap) => {
            if cap == 0 {
                return Err(SampleError::Configuration(
                    "explicit cap must be at least 1".to_string(),
                ));
            }
            Ok(cap)
        }
        CapPolicy::Percentile(fraction) => {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(SampleError::Configuration(format!(
                    "cap percentile {fraction} is outside [0, 1]"
                )));
            }
            if group_sizes.is_empty() {
                return Err(SampleError::EmptyTable);
            }
            let mut sizes: Vec<f64> = group_sizes.iter().map(|&size| size as f64).collect();
            sizes.sort_by(f64::total_cmp);
            let cap = percentile(&sizes, fraction * 100.0).trunc() as usize;
            Ok(cap.max(1))
        }
    }
}

/// Linear-interpolation percentile over pre-sorted values, `p` on the 0-100 scale.
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    sorted[below] + (sorted[above] - sorted[below]) * (rank - below as f64)
}
