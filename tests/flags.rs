use redirect_policy::flags::{any, PostRedirectFlags};

const POST_301: PostRedirectFlags = PostRedirectFlags::POST_301;
const POST_302: PostRedirectFlags = PostRedirectFlags::POST_302;
const POST_303: PostRedirectFlags = PostRedirectFlags::POST_303;
const POST_ALL: PostRedirectFlags = PostRedirectFlags::POST_ALL;
const NONE: PostRedirectFlags = PostRedirectFlags::NONE;

fn every_value() -> impl Iterator<Item = PostRedirectFlags> {
    (0..=POST_ALL.bits()).map(PostRedirectFlags::from_bits_truncate)
}

#[test]
fn preserve_301_and_303_but_not_302() {
    let flags = POST_301 | POST_303;

    assert!(any(flags & POST_301));
    assert!(!any(flags & POST_302));
    assert!(any(flags & POST_303));
    assert_eq!(flags, POST_ALL ^ POST_302);
    assert_eq!(flags, POST_ALL & !POST_302);
}

#[test]
fn in_place_operators() {
    let mut flags = NONE;
    flags |= POST_302;
    flags |= POST_303;
    assert_eq!(flags, POST_302 | POST_303);

    flags &= POST_303 | POST_301;
    assert_eq!(flags, POST_303);

    flags ^= POST_ALL;
    assert_eq!(flags, POST_301 | POST_302);
}

#[test]
fn named_operations_match_operators() {
    for a in every_value() {
        assert_eq!(a.complement(), !a);
        assert_eq!(a.is_empty(), !any(a));
        for b in every_value() {
            assert_eq!(a.union(b), a | b);
            assert_eq!(a.intersection(b), a & b);
            assert_eq!(a.symmetric_difference(b), a ^ b);
            assert_eq!(a.intersects(b), any(a & b));
            assert_eq!(a.contains(b), a & b == b);
        }
    }
}

#[test]
fn every_value_is_distinct() {
    let values: Vec<_> = every_value().collect();
    assert_eq!(values.len(), 8);
    for (i, a) in values.iter().enumerate() {
        assert_eq!(a.bits() as usize, i);
        assert_eq!(any(*a), i != 0);
    }
}

#[test]
fn bits_conversions() {
    assert_eq!(u8::from(POST_ALL), 0x7);
    assert_eq!(PostRedirectFlags::try_from(0x3u8).unwrap(), POST_301 | POST_302);

    let err = PostRedirectFlags::try_from(0x9u8).unwrap_err();
    assert!(err.is_parse());
}

#[test]
fn parse_config_strings() {
    let parsed: PostRedirectFlags = " POST_302 |post_303 ".parse().unwrap();
    assert_eq!(parsed, POST_302 | POST_303);
    assert_eq!("none".parse::<PostRedirectFlags>().unwrap(), NONE);
    assert_eq!("301 | all".parse::<PostRedirectFlags>().unwrap(), POST_ALL);

    let err = "POST_308".parse::<PostRedirectFlags>().unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("post-redirect flags"));
}
