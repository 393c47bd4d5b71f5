use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn push_and_pop_in_lifo_order() {
    let mut stack = BitStack::new();
    stack.push(true);
    stack.push(false);
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.pop(), Ok(false));
    assert_eq!(stack.pop(), Ok(true));
    assert!(stack.is_empty());
}

#[test]
fn pop_of_empty_stack_is_an_error() {
    let mut stack = BitStack::new();
    assert_eq!(stack.pop(), Err(BitStackUnderflow));
}

#[test]
fn pop_if_any_ignores_empty_stack() {
    let mut stack = BitStack::new();
    stack.pop_if_any();
    assert_eq!(stack, BitStack::new());
}

#[test]
fn set_top_rewrites_only_the_top() {
    let mut stack = BitStack::new();
    stack.push(true);
    stack.push(false);
    stack.set_top(true);
    assert!(stack.top());
    assert_eq!(stack.pop(), Ok(true));
    assert_eq!(stack.pop(), Ok(true));
}

#[test]
fn set_top_at_depth_zero_marks_the_base_level() {
    let mut stack = BitStack::new();
    stack.set_top(true);
    assert!(stack.top());
    assert_eq!(stack.depth(), 0);
}

proptest! {
    #[test]
    fn balanced_push_pop_restores_state(
        prefix in proptest::collection::vec(any::<bool>(), 0..40),
        nested in proptest::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut stack = BitStack::new();
        for bit in &prefix {
            stack.push(*bit);
        }
        let before = stack;
        for bit in &nested {
            stack.push(*bit);
        }
        for bit in nested.iter().rev() {
            prop_assert_eq!(stack.pop(), Ok(*bit));
        }
        prop_assert_eq!(stack, before);
    }
}
