use super::*;

#[test]
fn test_single_rating_is_its_own_median() {
    assert_eq!(aggregate("[3]").unwrap(), 3.0);
    assert_eq!(aggregate("[2.5]").unwrap(), 2.5);
}

#[test]
fn test_two_ratings_average() {
    assert_eq!(aggregate("[4,5]").unwrap(), 4.5);
    assert_eq!(aggregate("[1, 2]").unwrap(), 1.5);
}

#[test]
fn test_odd_and_even_lengths() {
    assert_eq!(aggregate("[3,4,4]").unwrap(), 4.0);
    assert_eq!(aggregate("[3,4,4,5]").unwrap(), 4.0);
    assert_eq!(aggregate("[1,5,2,8]").unwrap(), 3.5);
}

#[test]
fn test_permutation_invariance() {
    let a = aggregate("[5,1,4,2,3]").unwrap();
    let b = aggregate("[1,2,3,4,5]").unwrap();
    let c = aggregate("[3,5,2,1,4]").unwrap();
    assert_eq!(a, 3.0);
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_malformed_cells_rejected() {
    assert!(matches!(aggregate("3,4"), Err(AnnotationError::Malformed(_))));
    assert!(matches!(aggregate("[3,\"x\"]"), Err(AnnotationError::Malformed(_))));
    assert!(matches!(aggregate(""), Err(AnnotationError::Malformed(_))));
    assert_eq!(aggregate("[]"), Err(AnnotationError::Empty));
}

#[test]
fn test_whitespace_around_cell_is_accepted() {
    assert_eq!(parse_ratings(" [1, 2, 3] ").unwrap(), vec![1.0, 2.0, 3.0]);
}
