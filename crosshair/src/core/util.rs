use ahash::RandomState;
use std::collections::HashMap as StdHashMap;

pub type HashMap<K, V> = StdHashMap<K, V, RandomState>;

/// `ternary!(cond, true_case, false_case)`
#[macro_export]
macro_rules! ternary {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition { $_true } else { $_false }
    };
}

/// True when `value` is an odd whole number. Fractions and non-finite values
/// are never odd.
pub fn is_odd(value: f32) -> bool {
    value.rem_euclid(2.0) == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_odd() {
        assert!(is_odd(5.0));
        assert!(is_odd(1.0));
        assert!(is_odd(-3.0));
        assert!(!is_odd(4.0));
        assert!(!is_odd(0.0));
        assert!(!is_odd(5.5));
        assert!(!is_odd(f32::NAN));
        assert!(!is_odd(f32::INFINITY));
    }
}
