/**
Assert that two bounds, ULP widths or other doubles differ by at most
`eps`. The optional last argument is printed with the failure, usually the
interval the values came from.
*/
#[macro_export]
macro_rules! assert_float_eq {
    ($a:expr, $b:expr, $eps:expr, $context:expr) => {{
        let (a, b, eps): (f64, f64, f64) = ($a, $b, $eps);
        let diff = f64::abs(a - b);
        assert!(
            diff <= eps,
            "{} and {} differ by {:e}, more than {:e} ({})",
            a,
            b,
            diff,
            eps,
            $context
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::assert_float_eq!($a, $b, $eps, "no context")
    };
    ($a:expr, $b:expr) => {
        $crate::assert_float_eq!($a, $b, f64::EPSILON)
    };
}

/// Assert that the bounds of the interval are equal to `begin` and `end`
/// within the given epsilon. Infinite bounds must match exactly.
#[macro_export]
macro_rules! assert_interval_eq {
    ($interval:expr, $begin:expr, $end:expr, $eps:expr) => {{
        let interval = $interval;
        let expected: (f64, f64) = ($begin, $end);
        let eps = $eps;
        for (actual, expected) in [
            (interval.begin(), expected.0),
            (interval.end(), expected.1),
        ] {
            if actual.is_infinite() || expected.is_infinite() {
                assert_eq!(actual, expected, "Bounds differ in {}", interval);
            } else {
                $crate::assert_float_eq!(actual, expected, eps, interval);
            }
        }
    }};
    ($interval:expr, $begin:expr, $end:expr) => {
        $crate::assert_interval_eq!($interval, $begin, $end, 0.0)
    };
}
