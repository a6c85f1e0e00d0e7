/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// Keys must be string literals; any other element is converted with
/// [`to_value`](crate::to_value), falling back to `Null` if that fails.
///
/// ```rust
/// use yamlet::{yaml, Value};
///
/// let value = yaml!({
///     "name": "web",
///     "replicas": 3,
///     "ports": [80, 443],
///     "tls": null
/// });
/// assert_eq!(value.get("replicas"), Some(&Value::Int(3)));
/// assert_eq!(value.get("tls"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! yaml {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Sequence($crate::Sequence::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(
            ::std::vec![$($crate::yaml!($elem)),*].into()
        )
    };

    ({}) => {
        $crate::Value::Mapping($crate::Mapping::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::Mapping::new();
        $(
            mapping.insert($key.to_string(), $crate::yaml!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}
