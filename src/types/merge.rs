use super::{text, MERGE_TAG};
use crate::Type;

/// `!!merge`: the `<<` key.
pub fn merge() -> Type {
    Type::scalar(MERGE_TAG).with_resolve(|data| data.is_null() || text(data) == Some("<<"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_resolve() {
        assert!(merge().resolve(&Value::from("<<")));
        assert!(merge().resolve(&Value::Null));
        assert!(!merge().resolve(&Value::from("<")));
    }
}
