/// Min/max/sum/count accumulator for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl RunningStats {
    /// Stats for a station's first observation.
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    pub fn add(&mut self, value: f64) {
        self.min = lower(self.min, value);
        self.max = upper(self.max, value);
        self.sum += value;
        self.count += 1;
    }

    /// Fold another table's stats for the same station into this one.
    pub fn merge(&mut self, other: &RunningStats) {
        self.min = lower(self.min, other.min);
        self.max = upper(self.max, other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

// `f64::min`/`max` may return either zero for `0.0` vs `-0.0`; order -0.0 below 0.0
// so the result is independent of argument order.
fn lower(current: f64, value: f64) -> f64 {
    if value < current || (value == current && value.is_sign_negative()) {
        value
    } else {
        current
    }
}

fn upper(current: f64, value: f64) -> f64 {
    if value > current || (value == current && value.is_sign_positive()) {
        value
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tightens_extremes() {
        let mut stats = RunningStats::new(5.0);
        stats.add(7.0);
        stats.add(3.0);

        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 7.0);
        assert_eq!(stats.sum, 15.0);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean(), 5.0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let values = [-12.5, 4.0, 30.25, 0.0, -0.5, 18.75];

        let mut single = RunningStats::new(values[0]);
        for value in &values[1..] {
            single.add(*value);
        }

        let mut left = RunningStats::new(values[0]);
        for value in &values[1..3] {
            left.add(*value);
        }
        let mut right = RunningStats::new(values[3]);
        for value in &values[4..] {
            right.add(*value);
        }

        let mut merged_lr = left;
        merged_lr.merge(&right);
        let mut merged_rl = right;
        merged_rl.merge(&left);

        assert_eq!(merged_lr, single);
        assert_eq!(merged_rl, single);
    }

    #[test]
    fn test_signed_zeros_are_order_independent() {
        let mut positive_first = RunningStats::new(0.0);
        positive_first.add(-0.0);
        let mut negative_first = RunningStats::new(-0.0);
        negative_first.add(0.0);

        for stats in [positive_first, negative_first] {
            assert!(stats.min == 0.0 && stats.min.is_sign_negative());
            assert!(stats.max == 0.0 && stats.max.is_sign_positive());
        }

        let mut merged_forward = RunningStats::new(0.0);
        merged_forward.merge(&RunningStats::new(-0.0));
        let mut merged_reverse = RunningStats::new(-0.0);
        merged_reverse.merge(&RunningStats::new(0.0));

        assert_eq!(merged_forward.min.to_bits(), merged_reverse.min.to_bits());
        assert_eq!(merged_forward.max.to_bits(), merged_reverse.max.to_bits());
        assert!(merged_forward.min.is_sign_negative());
        assert!(merged_forward.max.is_sign_positive());
    }

    #[test]
    fn test_mean_between_extremes() {
        let mut stats = RunningStats::new(-99.9);
        stats.add(99.9);
        stats.add(0.1);

        let mean = stats.mean();
        assert!(stats.min <= mean && mean <= stats.max);
    }
}
