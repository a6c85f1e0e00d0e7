use super::{MAP_TAG, SEQ_TAG, STR_TAG};
use crate::{Type, Value};

/// `!!str`: any scalar, an empty node becomes `""`.
pub fn string() -> Type {
    Type::scalar(STR_TAG).with_construct(|data| match data {
        Value::Null => Value::Str(String::new()),
        other => other,
    })
}

/// `!!seq`: any sequence, an empty node becomes `[]`.
pub fn seq() -> Type {
    Type::sequence(SEQ_TAG).with_construct(|data| match data {
        Value::Null => Value::Sequence(Default::default()),
        other => other,
    })
}

/// `!!map`: any mapping, an empty node becomes `{}`.
pub fn map() -> Type {
    Type::mapping(MAP_TAG).with_construct(|data| match data {
        Value::Null => Value::Mapping(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_nodes() {
        assert_eq!(string().construct(Value::Null), Value::from(""));
        assert_eq!(seq().construct(Value::Null), Value::Sequence(Default::default()));
        assert_eq!(map().construct(Value::Null), Value::Mapping(Default::default()));
        assert_eq!(string().construct(Value::from("x")), Value::from("x"));
    }
}
