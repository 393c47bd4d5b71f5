use pretty_assertions::assert_eq;

use super::*;

#[test]
fn deep_escape_style_recursion_does_not_overflow() {
    // Mirrors a `\C-\C-\C-...x` chain: each level masks the inner result.
    fn control(depth: u32) -> u8 {
        ensure_sufficient_stack(|| {
            if depth == 0 {
                b'a'
            } else {
                control(depth - 1) & 0x9f
            }
        })
    }

    assert_eq!(control(100_000), b'a' & 0x9f);
}

#[test]
fn returns_closure_result() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}

#[test]
fn nesting_limit_counts_levels() {
    let mut limit = NestingLimit::new(3);
    assert_eq!(limit.enter(), Ok(()));
    assert_eq!(limit.enter(), Ok(()));
    assert_eq!(limit.depth(), 2);
    limit.exit();
    assert_eq!(limit.depth(), 1);
}

#[test]
fn nesting_limit_rejects_past_ceiling() {
    let mut limit = NestingLimit::new(1);
    assert_eq!(limit.enter(), Ok(()));
    assert_eq!(
        limit.enter(),
        Err(NestingExceeded { depth: 2, limit: 1 })
    );
    assert_eq!(limit.depth(), 1);
}

#[test]
fn exit_at_zero_is_noop() {
    let mut limit = NestingLimit::default();
    limit.exit();
    assert_eq!(limit.depth(), 0);
}
